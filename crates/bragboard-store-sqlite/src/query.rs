//! Row loaders and writers shared by the [`crate::SqliteStore`] methods.
//!
//! Everything here runs on the connection thread, usually inside an open
//! transaction, and returns raw rows; decoding happens back on the async side.

use bragboard_core::notification::NewNotification;
use rusqlite::{Connection, OptionalExtension as _, Row, params};

use crate::encode::{
  RawComment, RawNotification, RawReport, RawReportView, RawShoutOut,
  RawShoutOutView, RawUser,
};

// ─── Users ───────────────────────────────────────────────────────────────────

/// The `users` columns in the order [`read_user`] expects, prefixed with a
/// table alias.
pub fn user_cols(alias: &str) -> String {
  format!(
    "{alias}.id, {alias}.email, {alias}.name, {alias}.department, \
     {alias}.role, {alias}.joined_at, {alias}.profile_picture_url"
  )
}

/// Number of columns produced by [`user_cols`].
pub const USER_COL_COUNT: usize = 7;

pub fn read_user(row: &Row<'_>, start: usize) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    id:                  row.get(start)?,
    email:               row.get(start + 1)?,
    name:                row.get(start + 2)?,
    department:          row.get(start + 3)?,
    role:                row.get(start + 4)?,
    joined_at:           row.get(start + 5)?,
    profile_picture_url: row.get(start + 6)?,
  })
}

pub fn find_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawUser>> {
  conn
    .query_row(
      &format!("SELECT {} FROM users u WHERE u.id = ?1", user_cols("u")),
      params![id],
      |row| read_user(row, 0),
    )
    .optional()
}

pub fn user_exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row("SELECT 1 FROM users WHERE id = ?1", params![id], |_| Ok(()))
      .optional()?
      .is_some(),
  )
}

pub fn email_owner(conn: &Connection, email: &str) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row("SELECT id FROM users WHERE email = ?1", params![email], |r| {
      r.get(0)
    })
    .optional()
}

pub fn admin_ids(conn: &Connection) -> rusqlite::Result<Vec<i64>> {
  let mut stmt =
    conn.prepare("SELECT id FROM users WHERE role = 'admin' ORDER BY id")?;
  stmt
    .query_map([], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()
}

// ─── Shout-outs ──────────────────────────────────────────────────────────────

pub fn recipients(conn: &Connection, shoutout_id: i64) -> rusqlite::Result<Vec<RawUser>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {}
     FROM shoutout_recipients r
     JOIN users u ON u.id = r.recipient_id
     WHERE r.shoutout_id = ?1
     ORDER BY u.id",
    user_cols("u")
  ))?;
  stmt
    .query_map(params![shoutout_id], |row| read_user(row, 0))?
    .collect::<rusqlite::Result<Vec<_>>>()
}

pub fn find_shoutout(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawShoutOut>> {
  let head = conn
    .query_row(
      &format!(
        "SELECT s.id, s.message, s.created_at, {}
         FROM shoutouts s
         JOIN users u ON u.id = s.sender_id
         WHERE s.id = ?1",
        user_cols("u")
      ),
      params![id],
      |row| {
        Ok((
          row.get::<_, i64>(0)?,
          row.get::<_, String>(1)?,
          row.get::<_, String>(2)?,
          read_user(row, 3)?,
        ))
      },
    )
    .optional()?;

  let Some((id, message, created_at, sender)) = head else {
    return Ok(None);
  };

  Ok(Some(RawShoutOut {
    id,
    message,
    created_at,
    sender,
    recipients: recipients(conn, id)?,
  }))
}

pub fn shoutout_view(
  conn: &Connection,
  id: i64,
  viewer_id: i64,
) -> rusqlite::Result<Option<RawShoutOutView>> {
  let Some(shoutout) = find_shoutout(conn, id)? else {
    return Ok(None);
  };

  let comments = comments_for(conn, id)?;

  let mut stmt = conn.prepare(
    "SELECT type, COUNT(*) FROM reactions
     WHERE shoutout_id = ?1
     GROUP BY type
     ORDER BY type",
  )?;
  let reaction_counts = stmt
    .query_map(params![id], |r| Ok((r.get(0)?, r.get(1)?)))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let user_reaction = current_reaction(conn, id, viewer_id)?;

  Ok(Some(RawShoutOutView {
    shoutout,
    comments,
    reaction_counts,
    user_reaction,
  }))
}

// ─── Comments ────────────────────────────────────────────────────────────────

fn comment_select(filter: &str) -> String {
  format!(
    "SELECT c.id, c.shoutout_id, c.content, c.created_at, {}
     FROM comments c
     JOIN users u ON u.id = c.user_id
     WHERE {filter}
     ORDER BY c.created_at, c.id",
    user_cols("u")
  )
}

fn read_comment(row: &Row<'_>) -> rusqlite::Result<RawComment> {
  Ok(RawComment {
    id:          row.get(0)?,
    shoutout_id: row.get(1)?,
    content:     row.get(2)?,
    created_at:  row.get(3)?,
    user:        read_user(row, 4)?,
  })
}

pub fn comments_for(conn: &Connection, shoutout_id: i64) -> rusqlite::Result<Vec<RawComment>> {
  let mut stmt = conn.prepare(&comment_select("c.shoutout_id = ?1"))?;
  stmt
    .query_map(params![shoutout_id], read_comment)?
    .collect::<rusqlite::Result<Vec<_>>>()
}

pub fn find_comment(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawComment>> {
  conn
    .query_row(&comment_select("c.id = ?1"), params![id], read_comment)
    .optional()
}

// ─── Reactions ───────────────────────────────────────────────────────────────

pub fn current_reaction(
  conn: &Connection,
  shoutout_id: i64,
  user_id: i64,
) -> rusqlite::Result<Option<String>> {
  conn
    .query_row(
      "SELECT type FROM reactions WHERE shoutout_id = ?1 AND user_id = ?2",
      params![shoutout_id, user_id],
      |r| r.get(0),
    )
    .optional()
}

// ─── Notifications ───────────────────────────────────────────────────────────

pub fn insert_notifications(
  conn: &Connection,
  notifications: &[NewNotification],
  created_at: &str,
) -> rusqlite::Result<()> {
  let mut stmt = conn.prepare(
    "INSERT INTO notifications (user_id, type, message, shoutout_id, is_read, created_at)
     VALUES (?1, ?2, ?3, ?4, 0, ?5)",
  )?;
  for n in notifications {
    stmt.execute(params![
      n.user_id,
      n.kind.as_ref(),
      n.message,
      n.shoutout_id,
      created_at,
    ])?;
  }
  Ok(())
}

pub fn read_notification(row: &Row<'_>) -> rusqlite::Result<RawNotification> {
  Ok(RawNotification {
    id:          row.get(0)?,
    user_id:     row.get(1)?,
    kind:        row.get(2)?,
    message:     row.get(3)?,
    shoutout_id: row.get(4)?,
    is_read:     row.get(5)?,
    created_at:  row.get(6)?,
  })
}

pub const NOTIFICATION_COLS: &str =
  "id, user_id, type, message, shoutout_id, is_read, created_at";

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Selects a report, its reporter's name, and the name of whoever wrote the
/// reported comment (or, failing that, the reported shout-out).
fn report_view_select(filter: &str) -> String {
  format!(
    "SELECT r.id, r.shoutout_id, r.comment_id, r.reporter_id, r.reason,
            r.status, r.created_at,
            reporter.name,
            COALESCE(comment_author.name, shoutout_sender.name)
     FROM reports r
     LEFT JOIN users     reporter        ON reporter.id        = r.reporter_id
     LEFT JOIN comments  c               ON c.id               = r.comment_id
     LEFT JOIN users     comment_author  ON comment_author.id  = c.user_id
     LEFT JOIN shoutouts s               ON s.id               = r.shoutout_id
     LEFT JOIN users     shoutout_sender ON shoutout_sender.id = s.sender_id
     {filter}
     ORDER BY r.created_at DESC, r.id DESC"
  )
}

fn read_report_view(row: &Row<'_>) -> rusqlite::Result<RawReportView> {
  Ok(RawReportView {
    report:           RawReport {
      id:          row.get(0)?,
      shoutout_id: row.get(1)?,
      comment_id:  row.get(2)?,
      reporter_id: row.get(3)?,
      reason:      row.get(4)?,
      status:      row.get(5)?,
      created_at:  row.get(6)?,
    },
    reporter_name:    row.get(7)?,
    target_user_name: row.get(8)?,
  })
}

pub fn report_views(
  conn: &Connection,
  status: Option<&str>,
) -> rusqlite::Result<Vec<RawReportView>> {
  let mut stmt =
    conn.prepare(&report_view_select("WHERE (?1 IS NULL OR r.status = ?1)"))?;
  stmt
    .query_map(params![status], read_report_view)?
    .collect::<rusqlite::Result<Vec<_>>>()
}

pub fn find_report_view(conn: &Connection, id: i64) -> rusqlite::Result<Option<RawReportView>> {
  conn
    .query_row(
      &report_view_select("WHERE r.id = ?1"),
      params![id],
      read_report_view,
    )
    .optional()
}
