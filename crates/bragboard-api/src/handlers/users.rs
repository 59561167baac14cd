//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | Optional `?department=` |
//! | `GET`    | `/users/{id}` | 404 if not found |
//! | `PATCH`  | `/users/me` | Name, email, password change |
//! | `GET`    | `/users/me/shoutouts` | Sent by the caller |
//! | `GET`    | `/users/me/tagged` | Naming the caller as a recipient |
//! | `PATCH`  | `/users/{id}/role` | Admin only |
//! | `DELETE` | `/users/{id}` | Admin only |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use bragboard_core::{
  UserId,
  shoutout::{ShoutOutQuery, ShoutOutView},
  store::BoardStore,
  user::{Role, User, UserUpdate},
};
use serde::Deserialize;

use super::{Message, required, valid_email};
use crate::{
  AppState,
  auth::{CurrentAdmin, CurrentUser, hash_password, verify_password},
  error::ApiError,
};

// ─── Directory ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub department: Option<String>,
}

/// `GET /users[?department=<name>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_): CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let users = state
    .store
    .list_users(params.department)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(users))
}

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_): CurrentUser,
  Path(id): Path<UserId>,
) -> Result<Json<User>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("User not found".into()))
}

// ─── Self-service ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMeBody {
  pub name:             Option<String>,
  pub email:            Option<String>,
  pub current_password: Option<String>,
  pub new_password:     Option<String>,
}

/// `PATCH /users/me`
///
/// A password change needs both `current_password` and a non-empty
/// `new_password`; a wrong current password is a validation error, not a 401.
pub async fn update_me<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Json(body): Json<UpdateMeBody>,
) -> Result<Json<User>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let mut update = UserUpdate {
    name: body.name.as_deref().map(|n| required(n, "name")).transpose()?,
    email: body.email.as_deref().map(valid_email).transpose()?,
    password_hash: None,
  };

  match (body.current_password, body.new_password) {
    (None, None) => {}
    (Some(_), Some(new)) if new.is_empty() => {
      return Err(ApiError::Validation("new_password must not be empty".into()));
    }
    (Some(current), Some(new)) => {
      let creds = state
        .store
        .get_credentials_by_id(me.id)
        .await
        .map_err(ApiError::store)?
        .ok_or(ApiError::Unauthorized)?;
      if !verify_password(&current, &creds.password_hash) {
        return Err(ApiError::Validation("Incorrect current password".into()));
      }
      update.password_hash = Some(hash_password(&new)?);
    }
    (None, Some(_)) => {
      return Err(ApiError::Validation(
        "current_password is required to change the password".into(),
      ));
    }
    (Some(_), None) => {
      return Err(ApiError::Validation(
        "new_password is required to change the password".into(),
      ));
    }
  }

  let user = state
    .store
    .update_user(me.id, update)
    .await
    .map_err(ApiError::store)?;
  tracing::debug!(user_id = me.id, "updated profile");
  Ok(Json(user))
}

/// `GET /users/me/shoutouts`
pub async fn my_shoutouts<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
) -> Result<Json<Vec<ShoutOutView>>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let query = ShoutOutQuery {
    sender_id: Some(me.id),
    ..Default::default()
  };
  let views = state
    .store
    .list_shoutouts(&query, me.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(views))
}

/// `GET /users/me/tagged`
pub async fn tagged<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
) -> Result<Json<Vec<ShoutOutView>>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let query = ShoutOutQuery {
    recipient_id: Some(me.id),
    ..Default::default()
  };
  let views = state
    .store
    .list_shoutouts(&query, me.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(views))
}

// ─── Administration ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RoleBody {
  pub role: Role,
}

/// `PATCH /users/{id}/role`, body: `{"role":"admin"}`
pub async fn set_role<S>(
  State(state): State<AppState<S>>,
  CurrentAdmin(admin): CurrentAdmin,
  Path(id): Path<UserId>,
  Json(body): Json<RoleBody>,
) -> Result<Json<User>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let user = state
    .store
    .set_role(id, body.role)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(admin_id = admin.id, user_id = id, role = %body.role, "role changed");
  Ok(Json(user))
}

/// `DELETE /users/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  CurrentAdmin(admin): CurrentAdmin,
  Path(id): Path<UserId>,
) -> Result<Json<Message>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  state.store.delete_user(id).await.map_err(ApiError::store)?;
  tracing::info!(admin_id = admin.id, user_id = id, "user deleted");
  Ok(Json(Message::new("User deleted successfully")))
}
