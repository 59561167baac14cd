//! Error types for `bragboard-core`.

use thiserror::Error;

use crate::{CommentId, NotificationId, ReportId, ShoutOutId, UserId};

/// Domain-level failures. Storage backends wrap these so that the HTTP layer
/// can tell a missing row from a broken database.
#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(UserId),

  #[error("shout-out not found: {0}")]
  ShoutOutNotFound(ShoutOutId),

  #[error("comment not found: {0}")]
  CommentNotFound(CommentId),

  #[error("report not found: {0}")]
  ReportNotFound(ReportId),

  #[error("notification not found: {0}")]
  NotificationNotFound(NotificationId),

  #[error("at least one recipient is required")]
  NoRecipients,

  #[error("either shoutout_id or comment_id must be provided")]
  MissingReportTarget,

  #[error("email already registered: {0}")]
  EmailTaken(String),

  #[error("unknown {kind} value: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },
}

impl Error {
  /// Broad classification used when surfacing the error to a caller.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::UserNotFound(_)
      | Self::ShoutOutNotFound(_)
      | Self::CommentNotFound(_)
      | Self::ReportNotFound(_)
      | Self::NotificationNotFound(_) => ErrorKind::NotFound,
      Self::NoRecipients | Self::MissingReportTarget | Self::EmailTaken(_) => {
        ErrorKind::Validation
      }
      Self::UnknownVariant { .. } => ErrorKind::Internal,
    }
  }
}

/// The caller-visible category of a domain error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Validation,
  Internal,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
