//! Route handlers, one module per resource.

pub mod accounts;
pub mod comments;
pub mod notifications;
pub mod reactions;
pub mod reports;
pub mod shoutouts;
pub mod users;

use serde::Serialize;

use crate::error::ApiError;

/// `{"message": "..."}`, returned by deletes and other writes with nothing
/// else to say.
#[derive(Debug, Serialize)]
pub struct Message {
  pub message: String,
}

impl Message {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}

/// Trim a required text field, rejecting it if nothing is left.
pub(crate) fn required(value: &str, field: &str) -> Result<String, ApiError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(ApiError::Validation(format!("{field} must not be empty")));
  }
  Ok(trimmed.to_owned())
}

pub(crate) fn valid_email(value: &str) -> Result<String, ApiError> {
  let email = required(value, "email")?;
  match email.split_once('@') {
    Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
      Ok(email.to_lowercase())
    }
    _ => Err(ApiError::Validation(format!("invalid email address: {email}"))),
  }
}
