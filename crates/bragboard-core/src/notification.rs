//! Notifications delivered to a single user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{NotificationId, ShoutOutId, UserId};

/// The event that produced a notification.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
  Tag,
  Comment,
  Reaction,
  Report,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
  pub id:          NotificationId,
  #[serde(skip)]
  pub user_id:     UserId,
  #[serde(rename = "type")]
  pub kind:        NotificationKind,
  pub message:     String,
  pub shoutout_id: Option<ShoutOutId>,
  pub is_read:     bool,
  pub created_at:  DateTime<Utc>,
}

/// A notification queued for insertion. Produced only by [`crate::fanout`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
  pub user_id:     UserId,
  pub kind:        NotificationKind,
  pub message:     String,
  pub shoutout_id: Option<ShoutOutId>,
}
