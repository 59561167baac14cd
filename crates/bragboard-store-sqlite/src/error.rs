//! Error type for `bragboard-store-sqlite`.

use bragboard_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] bragboard_core::Error),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

/// Domain failures raised inside a `call` closure travel through
/// `tokio_rusqlite::Error::Other`; unwrap them back into [`Error::Core`].
impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Other(inner) => {
        match inner.downcast::<bragboard_core::Error>() {
          Ok(core) => Self::Core(*core),
          Err(other) => Self::Database(tokio_rusqlite::Error::Other(other)),
        }
      }
      other => Self::Database(other),
    }
  }
}

impl StoreError for Error {
  fn as_domain(&self) -> Option<&bragboard_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

/// Abort the current transaction with a domain error.
pub(crate) fn domain(e: bragboard_core::Error) -> tokio_rusqlite::Error {
  tokio_rusqlite::Error::Other(Box::new(e))
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
