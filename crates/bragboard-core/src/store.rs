//! The `BoardStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `bragboard-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.
//!
//! Every write is a single transaction. Writes that notify somebody (new
//! shout-outs, comments, first reactions, reports) insert the notifications
//! produced by [`crate::fanout`] in that same transaction, so either the
//! triggering row and all its notifications land, or none of them do.

use std::future::Future;

use crate::{
  CommentId, NotificationId, ReportId, ShoutOutId, UserId,
  comment::Comment,
  notification::Notification,
  reaction::{ReactionEntry, ReactionKind, ReactionQuery, ToggleOutcome},
  report::{NewReport, Report, ReportStatus, ReportView},
  shoutout::{NewShoutOut, ShoutOut, ShoutOutQuery, ShoutOutView},
  user::{Credentials, NewUser, Role, User, UserUpdate},
};

/// Errors produced by a [`BoardStore`] backend.
///
/// Backends wrap domain failures (a missing row, a validation failure) as
/// well as their own infrastructure failures; `as_domain` lets callers tell
/// the two apart without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn as_domain(&self) -> Option<&crate::Error>;
}

/// Abstraction over a BragBoard storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait BoardStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new user. Fails with [`crate::Error::EmailTaken`] if the
  /// email is already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up a user and their password hash by email, for login.
  fn get_credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  /// Same as [`Self::get_credentials`], by id.
  fn get_credentials_by_id(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + '_;

  /// List users, optionally restricted to one department.
  fn list_users(
    &self,
    department: Option<String>,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Apply a self-service profile update. Changing the email to one that
  /// another user holds fails with [`crate::Error::EmailTaken`].
  fn update_user(
    &self,
    id: UserId,
    update: UserUpdate,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn set_role(
    &self,
    id: UserId,
    role: Role,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Delete a user together with everything they authored and every
  /// notification addressed to them. Reports they filed survive with no
  /// reporter.
  fn delete_user(
    &self,
    id: UserId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Shout-outs ────────────────────────────────────────────────────────

  /// Create a shout-out from `sender` and tag every recipient other than the
  /// sender. Fails with [`crate::Error::NoRecipients`] for an empty
  /// recipient list and [`crate::Error::UserNotFound`] for an unknown one.
  fn create_shoutout<'a>(
    &'a self,
    sender: &'a User,
    input: NewShoutOut,
  ) -> impl Future<Output = Result<ShoutOut, Self::Error>> + Send + 'a;

  /// Load a shout-out with its sender and recipients.
  fn get_shoutout(
    &self,
    id: ShoutOutId,
  ) -> impl Future<Output = Result<Option<ShoutOut>, Self::Error>> + Send + '_;

  /// Materialise the read model of one shout-out for `viewer_id`.
  fn view_shoutout(
    &self,
    id: ShoutOutId,
    viewer_id: UserId,
  ) -> impl Future<Output = Result<Option<ShoutOutView>, Self::Error>> + Send + '_;

  /// List shout-outs newest first, as seen by `viewer_id`.
  fn list_shoutouts<'a>(
    &'a self,
    query: &'a ShoutOutQuery,
    viewer_id: UserId,
  ) -> impl Future<Output = Result<Vec<ShoutOutView>, Self::Error>> + Send + 'a;

  /// Delete a shout-out and everything hanging off it: recipients,
  /// comments, reactions, notifications and reports.
  fn delete_shoutout(
    &self,
    id: ShoutOutId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Add a comment by `author` and notify the shout-out's other
  /// participants.
  fn add_comment<'a>(
    &'a self,
    shoutout_id: ShoutOutId,
    author: &'a User,
    content: String,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + 'a;

  fn get_comment(
    &self,
    id: CommentId,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Delete a comment and any reports filed against it.
  fn delete_comment(
    &self,
    id: CommentId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reactions ─────────────────────────────────────────────────────────

  /// Apply the toggle state machine for `actor` on a shout-out. Only an
  /// `added` transition notifies the other participants.
  fn toggle_reaction<'a>(
    &'a self,
    shoutout_id: ShoutOutId,
    actor: &'a User,
    kind: ReactionKind,
  ) -> impl Future<Output = Result<ToggleOutcome, Self::Error>> + Send + 'a;

  fn list_reactions(
    &self,
    shoutout_id: ShoutOutId,
    query: ReactionQuery,
  ) -> impl Future<Output = Result<Vec<ReactionEntry>, Self::Error>> + Send + '_;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Validate and file a report, then notify every admin.
  fn create_report<'a>(
    &'a self,
    reporter: &'a User,
    input: NewReport,
  ) -> impl Future<Output = Result<Report, Self::Error>> + Send + 'a;

  /// List reports newest first, optionally restricted to one status.
  fn list_reports(
    &self,
    status: Option<ReportStatus>,
  ) -> impl Future<Output = Result<Vec<ReportView>, Self::Error>> + Send + '_;

  fn set_report_status(
    &self,
    id: ReportId,
    status: ReportStatus,
  ) -> impl Future<Output = Result<ReportView, Self::Error>> + Send + '_;

  // ── Notifications ─────────────────────────────────────────────────────

  /// A user's notifications, unread first then newest first, at most
  /// `limit` of them.
  fn list_notifications(
    &self,
    user_id: UserId,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Notification>, Self::Error>> + Send + '_;

  /// Mark one of `user_id`'s notifications read. Someone else's
  /// notification is reported as not found.
  fn mark_notification_read(
    &self,
    user_id: UserId,
    id: NotificationId,
  ) -> impl Future<Output = Result<Notification, Self::Error>> + Send + '_;

  /// Mark all of a user's notifications read; returns how many changed.
  fn mark_all_notifications_read(
    &self,
    user_id: UserId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
