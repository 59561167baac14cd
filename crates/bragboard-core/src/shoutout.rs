//! Shout-outs: a message from one sender recognising one or more recipients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  ShoutOutId, UserId,
  comment::Comment,
  reaction::{ReactionCount, ReactionKind},
  user::User,
};

// ─── Stored shape ────────────────────────────────────────────────────────────

/// A shout-out with its sender and full recipient list loaded.
///
/// This is what the fan-out engine works from; nothing is loaded lazily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoutOut {
  pub id:         ShoutOutId,
  pub sender:     User,
  pub message:    String,
  pub created_at: DateTime<Utc>,
  pub recipients: Vec<User>,
}

impl ShoutOut {
  pub fn recipient_ids(&self) -> Vec<UserId> {
    self.recipients.iter().map(|r| r.id).collect()
  }

  /// Only the sender or an admin may delete a shout-out.
  pub fn can_be_deleted_by(&self, user: &User) -> bool {
    self.sender.id == user.id || user.is_admin()
  }
}

/// Input to [`crate::store::BoardStore::create_shoutout`].
#[derive(Debug, Clone)]
pub struct NewShoutOut {
  pub message:       String,
  /// Duplicates collapse to a single recipient link.
  pub recipient_ids: Vec<UserId>,
}

impl NewShoutOut {
  /// Recipient ids with duplicates removed, first occurrence wins.
  pub fn distinct_recipients(&self) -> Vec<UserId> {
    let mut seen = Vec::with_capacity(self.recipient_ids.len());
    for id in &self.recipient_ids {
      if !seen.contains(id) {
        seen.push(*id);
      }
    }
    seen
  }
}

// ─── Query type ──────────────────────────────────────────────────────────────

/// Filters for [`crate::store::BoardStore::list_shoutouts`]. Results are
/// always newest first.
#[derive(Debug, Clone, Default)]
pub struct ShoutOutQuery {
  /// Only shout-outs whose sender belongs to this department.
  pub department:   Option<String>,
  pub sender_id:    Option<UserId>,
  /// Only shout-outs that name this user as a recipient.
  pub recipient_id: Option<UserId>,
  /// Only shout-outs created at or after this instant.
  pub start_date:   Option<DateTime<Utc>>,
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// The contact details of a recipient as embedded in a shout-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
  pub id:                  UserId,
  pub name:                String,
  pub email:               String,
  pub department:          String,
  pub profile_picture_url: Option<String>,
}

impl From<User> for Recipient {
  fn from(u: User) -> Self {
    Self {
      id:                  u.id,
      name:                u.name,
      email:               u.email,
      department:          u.department,
      profile_picture_url: u.profile_picture_url,
    }
  }
}

/// A shout-out as returned to a particular viewer: comments, reaction totals
/// and the viewer's own reaction included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoutOutView {
  pub id:              ShoutOutId,
  pub sender_id:       UserId,
  pub message:         String,
  pub created_at:      DateTime<Utc>,
  pub sender:          User,
  pub recipients:      Vec<Recipient>,
  pub comments:        Vec<Comment>,
  pub reaction_counts: Vec<ReactionCount>,
  pub user_reaction:   Option<ReactionKind>,
}
