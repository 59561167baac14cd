//! Comments on shout-outs. Immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CommentId, ShoutOutId, UserId, user::User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id:          CommentId,
  pub shoutout_id: ShoutOutId,
  pub user_id:     UserId,
  pub content:     String,
  pub created_at:  DateTime<Utc>,
  /// The author.
  pub user:        User,
}

impl Comment {
  pub fn can_be_deleted_by(&self, user: &User) -> bool {
    self.user_id == user.id || user.is_admin()
  }
}
