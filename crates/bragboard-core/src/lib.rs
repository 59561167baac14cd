//! Core types and trait definitions for BragBoard.
//!
//! This crate has no HTTP or database dependencies. It holds
//! the domain model, the notification fan-out engine, the reaction toggle
//! state machine, and the [`store::BoardStore`] abstraction that storage
//! backends implement.

pub mod comment;
pub mod error;
pub mod fanout;
pub mod notification;
pub mod reaction;
pub mod report;
pub mod shoutout;
pub mod store;
pub mod user;

pub use error::{Error, ErrorKind, Result};

pub type UserId = i64;
pub type ShoutOutId = i64;
pub type CommentId = i64;
pub type NotificationId = i64;
pub type ReportId = i64;
