//! Password hashing, bearer tokens, and the extractors that resolve a token to
//! a stored user.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use bragboard_core::{UserId, store::BoardStore, user::User};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// Token signing settings for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  pub jwt_secret: String,
  pub token_ttl:  Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// The user id, as a string.
  pub sub: String,
  pub exp: usize,
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::internal(format!("argon2 error: {e}")))
}

/// Check a password against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(password: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

pub fn issue_token(config: &AuthConfig, user_id: UserId) -> Result<String, ApiError> {
  let expires = Utc::now()
    .checked_add_signed(config.token_ttl)
    .ok_or_else(|| ApiError::internal("token expiry out of range"))?;
  let claims = Claims {
    sub: user_id.to_string(),
    exp: expires.timestamp().max(0) as usize,
  };
  encode(
    &Header::default(),
    &claims,
    &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
  )
  .map_err(|e| ApiError::internal(format!("jwt error: {e}")))
}

/// Validate a token's signature and expiry and return the user id it names.
pub fn verify_token(config: &AuthConfig, token: &str) -> Result<UserId, ApiError> {
  let data = decode::<Claims>(
    token,
    &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
    &Validation::default(),
  )
  .map_err(|_| ApiError::Unauthorized)?;
  data.claims.sub.parse().map_err(|_| ApiError::Unauthorized)
}

fn bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(ApiError::Unauthorized)
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The authenticated caller. Rejects with 401 when the token is missing,
/// invalid, expired, or names a user that no longer exists.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentUser
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user_id = verify_token(&state.auth, bearer(&parts.headers)?)?;
    let user = state
      .store
      .get_user(user_id)
      .await
      .map_err(ApiError::store)?
      .ok_or(ApiError::Unauthorized)?;
    Ok(CurrentUser(user))
  }
}

/// An authenticated caller with the admin role; 403 for everybody else.
pub struct CurrentAdmin(pub User);

impl<S> FromRequestParts<AppState<S>> for CurrentAdmin
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
    if !user.is_admin() {
      return Err(ApiError::Forbidden("Admin access required".into()));
    }
    Ok(CurrentAdmin(user))
  }
}
