//! SQL schema for the BragBoard SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Ownership is expressed with `ON DELETE CASCADE`: deleting a shout-out
/// takes its recipients, comments, reactions, notifications and reports with
/// it; deleting a user takes everything they authored.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    email               TEXT NOT NULL UNIQUE,
    name                TEXT NOT NULL,
    department          TEXT NOT NULL,
    password_hash       TEXT NOT NULL,   -- argon2 PHC string
    role                TEXT NOT NULL DEFAULT 'employee'
                        CHECK (role IN ('employee', 'admin')),
    joined_at           TEXT NOT NULL,   -- RFC 3339 UTC
    profile_picture_url TEXT
);

CREATE TABLE IF NOT EXISTS shoutouts (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shoutout_recipients (
    shoutout_id  INTEGER NOT NULL REFERENCES shoutouts(id) ON DELETE CASCADE,
    recipient_id INTEGER NOT NULL REFERENCES users(id)     ON DELETE CASCADE,
    PRIMARY KEY (shoutout_id, recipient_id)
);

CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    shoutout_id INTEGER NOT NULL REFERENCES shoutouts(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id)     ON DELETE CASCADE,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- At most one reaction per (shout-out, user).
CREATE TABLE IF NOT EXISTS reactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    shoutout_id INTEGER NOT NULL REFERENCES shoutouts(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id)     ON DELETE CASCADE,
    type        TEXT NOT NULL CHECK (type IN ('like', 'clap', 'star')),
    UNIQUE (shoutout_id, user_id)
);

CREATE TABLE IF NOT EXISTS notifications (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id)     ON DELETE CASCADE,
    type        TEXT NOT NULL
                CHECK (type IN ('tag', 'comment', 'reaction', 'report')),
    message     TEXT NOT NULL,
    shoutout_id INTEGER          REFERENCES shoutouts(id) ON DELETE CASCADE,
    is_read     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reports (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    shoutout_id INTEGER REFERENCES shoutouts(id) ON DELETE CASCADE,
    comment_id  INTEGER REFERENCES comments(id)  ON DELETE CASCADE,
    reporter_id INTEGER REFERENCES users(id)     ON DELETE SET NULL,
    reason      TEXT,
    status      TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'reviewed', 'resolved')),
    created_at  TEXT NOT NULL,
    CHECK (shoutout_id IS NOT NULL OR comment_id IS NOT NULL)
);

CREATE INDEX IF NOT EXISTS users_department_idx      ON users(department);
CREATE INDEX IF NOT EXISTS shoutouts_sender_idx      ON shoutouts(sender_id);
CREATE INDEX IF NOT EXISTS shoutouts_created_idx     ON shoutouts(created_at);
CREATE INDEX IF NOT EXISTS recipients_recipient_idx  ON shoutout_recipients(recipient_id);
CREATE INDEX IF NOT EXISTS comments_shoutout_idx     ON comments(shoutout_id);
CREATE INDEX IF NOT EXISTS notifications_user_idx    ON notifications(user_id);
CREATE INDEX IF NOT EXISTS notifications_shoutout_idx ON notifications(shoutout_id);
CREATE INDEX IF NOT EXISTS reports_shoutout_idx      ON reports(shoutout_id);
CREATE INDEX IF NOT EXISTS reports_comment_idx       ON reports(comment_id);

PRAGMA user_version = 1;
";
