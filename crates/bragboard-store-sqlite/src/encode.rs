//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 UTC strings with a fixed microsecond
//! precision so that they sort lexically. Enumerations are stored as their
//! lowercase names.

use std::str::FromStr;

use bragboard_core::{
  comment::Comment,
  notification::Notification,
  reaction::{ReactionCount, ReactionEntry},
  report::{Report, ReportView},
  shoutout::{ShoutOut, ShoutOutView},
  user::{Credentials, User, UserRef},
};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Enumerations ────────────────────────────────────────────────────────────

/// Decode any of the core enums from the lowercase name stored in a column.
pub fn decode_enum<T: FromStr>(kind: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| {
    Error::Core(bragboard_core::Error::UnknownVariant {
      kind,
      value: s.to_owned(),
    })
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
#[derive(Debug, Clone)]
pub struct RawUser {
  pub id:                  i64,
  pub email:               String,
  pub name:                String,
  pub department:          String,
  pub role:                String,
  pub joined_at:           String,
  pub profile_picture_url: Option<String>,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:                  self.id,
      email:               self.email,
      name:                self.name,
      department:          self.department,
      role:                decode_enum("role", &self.role)?,
      joined_at:           decode_dt(&self.joined_at)?,
      profile_picture_url: self.profile_picture_url,
    })
  }
}

/// A `users` row plus its password hash.
pub struct RawCredentials {
  pub user:          RawUser,
  pub password_hash: String,
}

impl RawCredentials {
  pub fn into_credentials(self) -> Result<Credentials> {
    Ok(Credentials {
      user:          self.user.into_user()?,
      password_hash: self.password_hash,
    })
  }
}

/// A `shoutouts` row with its sender and recipients.
pub struct RawShoutOut {
  pub id:         i64,
  pub message:    String,
  pub created_at: String,
  pub sender:     RawUser,
  pub recipients: Vec<RawUser>,
}

impl RawShoutOut {
  pub fn into_shoutout(self) -> Result<ShoutOut> {
    Ok(ShoutOut {
      id:         self.id,
      sender:     self.sender.into_user()?,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
      recipients: self
        .recipients
        .into_iter()
        .map(RawUser::into_user)
        .collect::<Result<_>>()?,
    })
  }
}

/// A `comments` row joined with its author.
pub struct RawComment {
  pub id:          i64,
  pub shoutout_id: i64,
  pub content:     String,
  pub created_at:  String,
  pub user:        RawUser,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:          self.id,
      shoutout_id: self.shoutout_id,
      user_id:     self.user.id,
      content:     self.content,
      created_at:  decode_dt(&self.created_at)?,
      user:        self.user.into_user()?,
    })
  }
}

/// Everything needed to build a [`ShoutOutView`].
pub struct RawShoutOutView {
  pub shoutout:        RawShoutOut,
  pub comments:        Vec<RawComment>,
  /// `(type, count)` pairs.
  pub reaction_counts: Vec<(String, i64)>,
  pub user_reaction:   Option<String>,
}

impl RawShoutOutView {
  pub fn into_view(self) -> Result<ShoutOutView> {
    let shoutout = self.shoutout.into_shoutout()?;

    let comments = self
      .comments
      .into_iter()
      .map(RawComment::into_comment)
      .collect::<Result<_>>()?;

    let reaction_counts = self
      .reaction_counts
      .into_iter()
      .map(|(kind, count)| {
        Ok(ReactionCount {
          kind:  decode_enum("reaction type", &kind)?,
          count: count.max(0) as u64,
        })
      })
      .collect::<Result<_>>()?;

    let user_reaction = self
      .user_reaction
      .as_deref()
      .map(|s| decode_enum("reaction type", s))
      .transpose()?;

    Ok(ShoutOutView {
      id: shoutout.id,
      sender_id: shoutout.sender.id,
      message: shoutout.message,
      created_at: shoutout.created_at,
      sender: shoutout.sender,
      recipients: shoutout.recipients.into_iter().map(Into::into).collect(),
      comments,
      reaction_counts,
      user_reaction,
    })
  }
}

/// A `reactions` row joined with the reacting user.
pub struct RawReaction {
  pub user: RawUser,
  pub kind: String,
}

impl RawReaction {
  pub fn into_entry(self) -> Result<ReactionEntry> {
    Ok(ReactionEntry {
      user: self.user.into_user()?,
      kind: decode_enum("reaction type", &self.kind)?,
    })
  }
}

/// Raw values read directly from a `notifications` row.
pub struct RawNotification {
  pub id:          i64,
  pub user_id:     i64,
  pub kind:        String,
  pub message:     String,
  pub shoutout_id: Option<i64>,
  pub is_read:     bool,
  pub created_at:  String,
}

impl RawNotification {
  pub fn into_notification(self) -> Result<Notification> {
    Ok(Notification {
      id:          self.id,
      user_id:     self.user_id,
      kind:        decode_enum("notification type", &self.kind)?,
      message:     self.message,
      shoutout_id: self.shoutout_id,
      is_read:     self.is_read,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `reports` row.
pub struct RawReport {
  pub id:          i64,
  pub shoutout_id: Option<i64>,
  pub comment_id:  Option<i64>,
  pub reporter_id: Option<i64>,
  pub reason:      Option<String>,
  pub status:      String,
  pub created_at:  String,
}

impl RawReport {
  pub fn into_report(self) -> Result<Report> {
    Ok(Report {
      id:          self.id,
      shoutout_id: self.shoutout_id,
      comment_id:  self.comment_id,
      reporter_id: self.reporter_id,
      reason:      self.reason,
      status:      decode_enum("report status", &self.status)?,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// A `reports` row joined with its reporter and the author of the reported
/// content.
pub struct RawReportView {
  pub report:           RawReport,
  pub reporter_name:    Option<String>,
  pub target_user_name: Option<String>,
}

impl RawReportView {
  pub fn into_view(self) -> Result<ReportView> {
    let report = self.report.into_report()?;
    let reporter = match (report.reporter_id, self.reporter_name) {
      (Some(id), Some(name)) => Some(UserRef { id, name }),
      _ => None,
    };

    Ok(ReportView {
      id: report.id,
      shoutout_id: report.shoutout_id,
      comment_id: report.comment_id,
      reporter,
      reason: report.reason.clone(),
      created_at: report.created_at,
      status: report.status,
      target_type: report.target_type(),
      target_user_name: self.target_user_name,
    })
  }
}
