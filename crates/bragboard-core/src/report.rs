//! Moderation reports against a shout-out or a comment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  CommentId, Error, ReportId, Result, ShoutOutId, UserId, user::UserRef,
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
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
pub enum ReportStatus {
  #[default]
  Pending,
  Reviewed,
  Resolved,
}

/// Input to [`crate::store::BoardStore::create_report`].
#[derive(Debug, Clone, Default)]
pub struct NewReport {
  pub shoutout_id: Option<ShoutOutId>,
  pub comment_id:  Option<CommentId>,
  pub reason:      Option<String>,
}

impl NewReport {
  /// Reject a report that names neither a shout-out nor a comment. Runs
  /// before anything is written.
  pub fn validate(&self) -> Result<()> {
    if self.shoutout_id.is_none() && self.comment_id.is_none() {
      return Err(Error::MissingReportTarget);
    }
    Ok(())
  }
}

/// What a report points at, once the store has resolved a comment to the
/// shout-out it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTarget {
  ShoutOut(ShoutOutId),
  Comment {
    comment_id:  CommentId,
    shoutout_id: ShoutOutId,
  },
}

impl ReportTarget {
  /// The shout-out the reported content lives on.
  pub fn shoutout_id(self) -> ShoutOutId {
    match self {
      Self::ShoutOut(id) => id,
      Self::Comment { shoutout_id, .. } => shoutout_id,
    }
  }

  pub fn comment_id(self) -> Option<CommentId> {
    match self {
      Self::ShoutOut(_) => None,
      Self::Comment { comment_id, .. } => Some(comment_id),
    }
  }

  pub fn target_type(self) -> TargetType {
    match self {
      Self::ShoutOut(_) => TargetType::Shoutout,
      Self::Comment { .. } => TargetType::Comment,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
  Shoutout,
  Comment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
  pub id:          ReportId,
  pub shoutout_id: Option<ShoutOutId>,
  pub comment_id:  Option<CommentId>,
  /// `None` once the reporter's account has been deleted.
  pub reporter_id: Option<UserId>,
  pub reason:      Option<String>,
  pub status:      ReportStatus,
  pub created_at:  DateTime<Utc>,
}

impl Report {
  pub fn target_type(&self) -> TargetType {
    if self.comment_id.is_some() {
      TargetType::Comment
    } else {
      TargetType::Shoutout
    }
  }
}

/// A report as listed on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportView {
  pub id:               ReportId,
  pub shoutout_id:      Option<ShoutOutId>,
  pub comment_id:       Option<CommentId>,
  pub reporter:         Option<UserRef>,
  pub reason:           Option<String>,
  pub created_at:       DateTime<Utc>,
  pub status:           ReportStatus,
  pub target_type:      TargetType,
  /// Author of the reported shout-out or comment.
  pub target_user_name: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn report_without_target_is_rejected() {
    let err = NewReport::default().validate().unwrap_err();
    assert!(matches!(err, Error::MissingReportTarget));
  }

  #[test]
  fn report_with_either_target_is_accepted() {
    let on_shoutout = NewReport { shoutout_id: Some(1), ..Default::default() };
    let on_comment = NewReport { comment_id: Some(9), ..Default::default() };
    assert!(on_shoutout.validate().is_ok());
    assert!(on_comment.validate().is_ok());
  }

  #[test]
  fn comment_target_resolves_to_its_shoutout() {
    let t = ReportTarget::Comment { comment_id: 4, shoutout_id: 2 };
    assert_eq!(t.shoutout_id(), 2);
    assert_eq!(t.comment_id(), Some(4));
    assert_eq!(t.target_type(), TargetType::Comment);
  }
}
