//! [`SqliteStore`], the SQLite implementation of [`BoardStore`].

use std::path::Path;

use bragboard_core::{
  CommentId, Error as CoreError, NotificationId, ReportId, ShoutOutId, UserId,
  comment::Comment,
  fanout::{self, Engagement},
  notification::Notification,
  reaction::{
    ReactionEntry, ReactionKind, ReactionQuery, ReactionState, ToggleAction,
    ToggleOutcome,
  },
  report::{NewReport, Report, ReportStatus, ReportTarget, ReportView},
  shoutout::{NewShoutOut, ShoutOut, ShoutOutQuery, ShoutOutView},
  store::BoardStore,
  user::{Credentials, NewUser, Role, User, UserUpdate},
};
use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior, params};

use crate::{
  Result,
  encode::{
    RawCredentials, RawNotification, RawReaction, RawReport, RawReportView,
    RawShoutOutView, encode_dt,
  },
  error::domain,
  query::{self, NOTIFICATION_COLS, USER_COL_COUNT, read_user, user_cols},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A BragBoard store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. All calls
/// are serialised on the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(crate::schema::SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the connection.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn credentials_where(
    &self,
    filter: &'static str,
    value: rusqlite::types::Value,
  ) -> Result<Option<Credentials>> {
    let raw: Option<RawCredentials> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {}, u.password_hash FROM users u WHERE {filter}",
                user_cols("u")
              ),
              params![value],
              |row| {
                Ok(RawCredentials {
                  user:          read_user(row, 0)?,
                  password_hash: row.get(USER_COL_COUNT)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCredentials::into_credentials).transpose()
  }
}

fn parse_reaction(s: String) -> tokio_rusqlite::Result<ReactionKind> {
  s.parse().map_err(|_| {
    domain(CoreError::UnknownVariant {
      kind:  "reaction type",
      value: s,
    })
  })
}

// ─── BoardStore impl ─────────────────────────────────────────────────────────

impl BoardStore for SqliteStore {
  type Error = crate::Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let joined_at = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if query::email_owner(&tx, &input.email)?.is_some() {
          return Err(domain(CoreError::EmailTaken(input.email)));
        }
        tx.execute(
          "INSERT INTO users (email, name, department, password_hash, role, joined_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![
            input.email,
            input.name,
            input.department,
            input.password_hash,
            input.role.as_ref(),
            joined_at,
          ],
        )?;
        let user = query::find_user(&tx, tx.last_insert_rowid())?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(user)
      })
      .await?;

    tracing::debug!(user_id = raw.id, "created user");
    raw.into_user()
  }

  async fn get_user(&self, id: UserId) -> Result<Option<User>> {
    let raw = self.conn.call(move |conn| Ok(query::find_user(conn, id)?)).await?;
    raw.map(|r| r.into_user()).transpose()
  }

  async fn get_credentials<'a>(&'a self, email: &'a str) -> Result<Option<Credentials>> {
    self
      .credentials_where("u.email = ?1", email.to_owned().into())
      .await
  }

  async fn get_credentials_by_id(&self, id: UserId) -> Result<Option<Credentials>> {
    self.credentials_where("u.id = ?1", id.into()).await
  }

  async fn list_users(&self, department: Option<String>) -> Result<Vec<User>> {
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM users u
           WHERE (?1 IS NULL OR u.department = ?1)
           ORDER BY u.name, u.id",
          user_cols("u")
        ))?;
        let rows = stmt
          .query_map(params![department], |row| read_user(row, 0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(|r| r.into_user()).collect()
  }

  async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !query::user_exists(&tx, id)? {
          return Err(domain(CoreError::UserNotFound(id)));
        }
        if let Some(email) = &update.email {
          match query::email_owner(&tx, email)? {
            Some(owner) if owner != id => {
              return Err(domain(CoreError::EmailTaken(email.clone())));
            }
            _ => {}
          }
        }
        tx.execute(
          "UPDATE users SET
             name          = COALESCE(?2, name),
             email         = COALESCE(?3, email),
             password_hash = COALESCE(?4, password_hash)
           WHERE id = ?1",
          params![id, update.name, update.email, update.password_hash],
        )?;
        let user = query::find_user(&tx, id)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(user)
      })
      .await?;

    raw.into_user()
  }

  async fn set_role(&self, id: UserId, role: Role) -> Result<User> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE users SET role = ?2 WHERE id = ?1",
          params![id, role.as_ref()],
        )?;
        if changed == 0 {
          return Err(domain(CoreError::UserNotFound(id)));
        }
        let user = query::find_user(&tx, id)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(user)
      })
      .await?;

    tracing::info!(user_id = id, %role, "changed role");
    raw.into_user()
  }

  async fn delete_user(&self, id: UserId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if deleted == 0 {
          return Err(domain(CoreError::UserNotFound(id)));
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(user_id = id, "deleted user");
    Ok(())
  }

  // ── Shout-outs ────────────────────────────────────────────────────────────

  async fn create_shoutout<'a>(
    &'a self,
    sender: &'a User,
    input: NewShoutOut,
  ) -> Result<ShoutOut> {
    let recipient_ids = input.distinct_recipients();
    if recipient_ids.is_empty() {
      return Err(CoreError::NoRecipients.into());
    }

    let sender = sender.clone();
    let message = input.message;
    let created_at = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // An unknown recipient fails the whole shout-out.
        for &rid in &recipient_ids {
          if !query::user_exists(&tx, rid)? {
            return Err(domain(CoreError::UserNotFound(rid)));
          }
        }

        tx.execute(
          "INSERT INTO shoutouts (sender_id, message, created_at) VALUES (?1, ?2, ?3)",
          params![sender.id, message, created_at],
        )?;
        let id = tx.last_insert_rowid();

        {
          let mut stmt = tx.prepare(
            "INSERT INTO shoutout_recipients (shoutout_id, recipient_id) VALUES (?1, ?2)",
          )?;
          for &rid in &recipient_ids {
            stmt.execute(params![id, rid])?;
          }
        }

        let tags = fanout::tags(id, &sender, &recipient_ids);
        query::insert_notifications(&tx, &tags, &created_at)?;

        let shoutout = query::find_shoutout(&tx, id)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok((shoutout, tags.len()))
      })
      .await?;

    let (raw, tagged) = raw;
    tracing::info!(shoutout_id = raw.id, tagged, "created shout-out");
    raw.into_shoutout()
  }

  async fn get_shoutout(&self, id: ShoutOutId) -> Result<Option<ShoutOut>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query::find_shoutout(conn, id)?))
      .await?;
    raw.map(|r| r.into_shoutout()).transpose()
  }

  async fn view_shoutout(
    &self,
    id: ShoutOutId,
    viewer_id: UserId,
  ) -> Result<Option<ShoutOutView>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query::shoutout_view(conn, id, viewer_id)?))
      .await?;
    raw.map(RawShoutOutView::into_view).transpose()
  }

  async fn list_shoutouts<'a>(
    &'a self,
    query: &'a ShoutOutQuery,
    viewer_id: UserId,
  ) -> Result<Vec<ShoutOutView>> {
    let department = query.department.clone();
    let sender_id = query.sender_id;
    let recipient_id = query.recipient_id;
    let start_date = query.start_date.map(encode_dt);

    let raws = self
      .conn
      .call(move |conn| {
        let ids = {
          let mut stmt = conn.prepare(
            "SELECT s.id
             FROM shoutouts s
             JOIN users u ON u.id = s.sender_id
             WHERE (?1 IS NULL OR u.department = ?1)
               AND (?2 IS NULL OR s.sender_id = ?2)
               AND (?3 IS NULL OR EXISTS (
                     SELECT 1 FROM shoutout_recipients r
                     WHERE r.shoutout_id = s.id AND r.recipient_id = ?3))
               AND (?4 IS NULL OR s.created_at >= ?4)
             ORDER BY s.created_at DESC, s.id DESC",
          )?;
          stmt
            .query_map(
              params![department, sender_id, recipient_id, start_date],
              |r| r.get::<_, i64>(0),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut views = Vec::with_capacity(ids.len());
        for id in ids {
          if let Some(view) = query::shoutout_view(conn, id, viewer_id)? {
            views.push(view);
          }
        }
        Ok(views)
      })
      .await?;

    raws.into_iter().map(RawShoutOutView::into_view).collect()
  }

  async fn delete_shoutout(&self, id: ShoutOutId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Recipients, comments, reactions, notifications and reports go with
        // it through ON DELETE CASCADE.
        let deleted = tx.execute("DELETE FROM shoutouts WHERE id = ?1", params![id])?;
        if deleted == 0 {
          return Err(domain(CoreError::ShoutOutNotFound(id)));
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(shoutout_id = id, "deleted shout-out");
    Ok(())
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment<'a>(
    &'a self,
    shoutout_id: ShoutOutId,
    author: &'a User,
    content: String,
  ) -> Result<Comment> {
    let author = author.clone();
    let created_at = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let shoutout = query::find_shoutout(&tx, shoutout_id)?
          .ok_or_else(|| domain(CoreError::ShoutOutNotFound(shoutout_id)))?;

        tx.execute(
          "INSERT INTO comments (shoutout_id, user_id, content, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          params![shoutout_id, author.id, content, created_at],
        )?;
        let comment_id = tx.last_insert_rowid();

        let recipient_ids: Vec<UserId> =
          shoutout.recipients.iter().map(|r| r.id).collect();
        let notes = fanout::engagement(
          shoutout_id,
          shoutout.sender.id,
          &recipient_ids,
          &author,
          Engagement::Comment,
        );
        query::insert_notifications(&tx, &notes, &created_at)?;

        let comment = query::find_comment(&tx, comment_id)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(comment)
      })
      .await?;

    tracing::debug!(comment_id = raw.id, shoutout_id, "added comment");
    raw.into_comment()
  }

  async fn get_comment(&self, id: CommentId) -> Result<Option<Comment>> {
    let raw = self
      .conn
      .call(move |conn| Ok(query::find_comment(conn, id)?))
      .await?;
    raw.map(|r| r.into_comment()).transpose()
  }

  async fn delete_comment(&self, id: CommentId) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let deleted = tx.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
        if deleted == 0 {
          return Err(domain(CoreError::CommentNotFound(id)));
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::debug!(comment_id = id, "deleted comment");
    Ok(())
  }

  // ── Reactions ─────────────────────────────────────────────────────────────

  async fn toggle_reaction<'a>(
    &'a self,
    shoutout_id: ShoutOutId,
    actor: &'a User,
    kind: ReactionKind,
  ) -> Result<ToggleOutcome> {
    let actor = actor.clone();
    let created_at = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        // IMMEDIATE takes the write lock before the read, so the toggle
        // decision cannot be based on a stale row.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let shoutout = query::find_shoutout(&tx, shoutout_id)?
          .ok_or_else(|| domain(CoreError::ShoutOutNotFound(shoutout_id)))?;

        let current = query::current_reaction(&tx, shoutout_id, actor.id)?
          .map(parse_reaction)
          .transpose()?;
        let transition = ReactionState::from(current).toggle(kind);

        match transition.action {
          ToggleAction::Added => {
            tx.execute(
              "INSERT INTO reactions (shoutout_id, user_id, type) VALUES (?1, ?2, ?3)",
              params![shoutout_id, actor.id, kind.as_ref()],
            )?;
          }
          ToggleAction::Updated => {
            tx.execute(
              "UPDATE reactions SET type = ?3 WHERE shoutout_id = ?1 AND user_id = ?2",
              params![shoutout_id, actor.id, kind.as_ref()],
            )?;
          }
          ToggleAction::Removed => {
            tx.execute(
              "DELETE FROM reactions WHERE shoutout_id = ?1 AND user_id = ?2",
              params![shoutout_id, actor.id],
            )?;
          }
        }

        if transition.action.notifies() {
          let recipient_ids: Vec<UserId> =
            shoutout.recipients.iter().map(|r| r.id).collect();
          let notes = fanout::engagement(
            shoutout_id,
            shoutout.sender.id,
            &recipient_ids,
            &actor,
            Engagement::Reaction,
          );
          query::insert_notifications(&tx, &notes, &created_at)?;
        }

        tx.commit()?;
        Ok(ToggleOutcome {
          action:   transition.action,
          reaction: transition.next.kind(),
        })
      })
      .await?;

    tracing::debug!(shoutout_id, action = %outcome.action, "toggled reaction");
    Ok(outcome)
  }

  async fn list_reactions(
    &self,
    shoutout_id: ShoutOutId,
    query: ReactionQuery,
  ) -> Result<Vec<ReactionEntry>> {
    let kind = query.kind.map(|k| k.as_ref().to_owned());
    let limit = i64::from(query.limit);
    let offset = query.offset() as i64;

    let raws = self
      .conn
      .call(move |conn| {
        if conn
          .query_row(
            "SELECT 1 FROM shoutouts WHERE id = ?1",
            params![shoutout_id],
            |_| Ok(()),
          )
          .optional()?
          .is_none()
        {
          return Err(domain(CoreError::ShoutOutNotFound(shoutout_id)));
        }

        let mut stmt = conn.prepare(&format!(
          "SELECT {}, r.type
           FROM reactions r
           JOIN users u ON u.id = r.user_id
           WHERE r.shoutout_id = ?1 AND (?2 IS NULL OR r.type = ?2)
           ORDER BY r.id
           LIMIT ?3 OFFSET ?4",
          user_cols("u")
        ))?;
        let rows = stmt
          .query_map(params![shoutout_id, kind, limit, offset], |row| {
            Ok(RawReaction {
              user: read_user(row, 0)?,
              kind: row.get(USER_COL_COUNT)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReaction::into_entry).collect()
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  async fn create_report<'a>(
    &'a self,
    reporter: &'a User,
    input: NewReport,
  ) -> Result<Report> {
    input.validate()?;

    let reporter = reporter.clone();
    let created_at = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let target = match (input.comment_id, input.shoutout_id) {
          (Some(comment_id), _) => {
            let comment = query::find_comment(&tx, comment_id)?
              .ok_or_else(|| domain(CoreError::CommentNotFound(comment_id)))?;
            ReportTarget::Comment {
              comment_id,
              shoutout_id: comment.shoutout_id,
            }
          }
          (None, Some(shoutout_id)) => {
            if query::find_shoutout(&tx, shoutout_id)?.is_none() {
              return Err(domain(CoreError::ShoutOutNotFound(shoutout_id)));
            }
            ReportTarget::ShoutOut(shoutout_id)
          }
          (None, None) => return Err(domain(CoreError::MissingReportTarget)),
        };

        tx.execute(
          "INSERT INTO reports (shoutout_id, comment_id, reporter_id, reason, status, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![
            target.shoutout_id(),
            target.comment_id(),
            reporter.id,
            input.reason,
            ReportStatus::Pending.as_ref(),
            created_at,
          ],
        )?;
        let report_id = tx.last_insert_rowid();

        let admins = query::admin_ids(&tx)?;
        let notes = fanout::report(&reporter, &admins, target);
        query::insert_notifications(&tx, &notes, &created_at)?;

        let report = tx.query_row(
          "SELECT id, shoutout_id, comment_id, reporter_id, reason, status, created_at
           FROM reports WHERE id = ?1",
          params![report_id],
          |row| {
            Ok(RawReport {
              id:          row.get(0)?,
              shoutout_id: row.get(1)?,
              comment_id:  row.get(2)?,
              reporter_id: row.get(3)?,
              reason:      row.get(4)?,
              status:      row.get(5)?,
              created_at:  row.get(6)?,
            })
          },
        )?;
        tx.commit()?;
        Ok((report, admins.len()))
      })
      .await?;

    let (raw, admins) = raw;
    tracing::info!(report_id = raw.id, admins, "filed report");
    raw.into_report()
  }

  async fn list_reports(&self, status: Option<ReportStatus>) -> Result<Vec<ReportView>> {
    let status = status.map(|s| s.as_ref().to_owned());
    let raws = self
      .conn
      .call(move |conn| Ok(query::report_views(conn, status.as_deref())?))
      .await?;
    raws.into_iter().map(RawReportView::into_view).collect()
  }

  async fn set_report_status(
    &self,
    id: ReportId,
    status: ReportStatus,
  ) -> Result<ReportView> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE reports SET status = ?2 WHERE id = ?1",
          params![id, status.as_ref()],
        )?;
        if changed == 0 {
          return Err(domain(CoreError::ReportNotFound(id)));
        }
        let view = query::find_report_view(&tx, id)?
          .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        tx.commit()?;
        Ok(view)
      })
      .await?;

    tracing::info!(report_id = id, %status, "updated report status");
    raw.into_view()
  }

  // ── Notifications ─────────────────────────────────────────────────────────

  async fn list_notifications(
    &self,
    user_id: UserId,
    limit: usize,
  ) -> Result<Vec<Notification>> {
    let limit = limit as i64;
    let raws = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {NOTIFICATION_COLS} FROM notifications
           WHERE user_id = ?1
           ORDER BY is_read ASC, created_at DESC, id DESC
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(params![user_id, limit], query::read_notification)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_notification).collect()
  }

  async fn mark_notification_read(
    &self,
    user_id: UserId,
    id: NotificationId,
  ) -> Result<Notification> {
    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
          params![id, user_id],
        )?;
        if changed == 0 {
          return Err(domain(CoreError::NotificationNotFound(id)));
        }
        let row = tx.query_row(
          &format!("SELECT {NOTIFICATION_COLS} FROM notifications WHERE id = ?1"),
          params![id],
          query::read_notification,
        )?;
        tx.commit()?;
        Ok(row)
      })
      .await?;

    raw.into_notification()
  }

  async fn mark_all_notifications_read(&self, user_id: UserId) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE notifications SET is_read = 1 WHERE user_id = ?1 AND is_read = 0",
          params![user_id],
        )?)
      })
      .await?;
    Ok(changed)
  }
}
