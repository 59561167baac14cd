//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Creates an employee; 400 on a taken email |
//! | `POST` | `/auth/login` | 401 on bad credentials |
//! | `GET`  | `/auth/me` | The caller |

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use bragboard_core::{
  store::BoardStore,
  user::{NewUser, Role, User},
};
use serde::{Deserialize, Serialize};

use super::{required, valid_email};
use crate::{
  AppState,
  auth::{CurrentUser, hash_password, issue_token, verify_password},
  error::ApiError,
};

/// Returned by both register and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub token_type:   &'static str,
  pub user:         User,
}

fn token_response<S: BoardStore>(
  state: &AppState<S>,
  user: User,
) -> Result<TokenResponse, ApiError> {
  Ok(TokenResponse {
    access_token: issue_token(&state.auth, user.id)?,
    token_type: "bearer",
    user,
  })
}

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:      String,
  pub name:       String,
  pub department: String,
  pub password:   String,
}

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let email = valid_email(&body.email)?;
  let name = required(&body.name, "name")?;
  let department = required(&body.department, "department")?;
  if body.password.is_empty() {
    return Err(ApiError::Validation("password must not be empty".into()));
  }

  let user = state
    .store
    .create_user(NewUser {
      email,
      name,
      department,
      password_hash: hash_password(&body.password)?,
      role: Role::Employee,
    })
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = user.id, "registered user");
  Ok((StatusCode::CREATED, Json(token_response(&state, user)?)))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<TokenResponse>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let email = body.email.trim().to_lowercase();
  let creds = state
    .store
    .get_credentials(&email)
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;

  if !verify_password(&body.password, &creds.password_hash) {
    return Err(ApiError::Unauthorized);
  }

  Ok(Json(token_response(&state, creds.user)?))
}

// ─── Me ───────────────────────────────────────────────────────────────────────

/// `GET /auth/me`
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> { Json(user) }
