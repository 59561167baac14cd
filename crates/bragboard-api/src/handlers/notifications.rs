//! Handlers for `/notifications` endpoints. Callers only ever see their own.

use axum::{
  Json,
  extract::{Path, State},
};
use bragboard_core::{
  NotificationId, notification::Notification, store::BoardStore,
};
use serde::Serialize;

use crate::{AppState, auth::CurrentUser, error::ApiError};

/// How many notifications the list endpoint returns.
const LIST_LIMIT: usize = 50;

/// `GET /notifications`: unread first, then newest first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
) -> Result<Json<Vec<Notification>>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let notes = state
    .store
    .list_notifications(me.id, LIST_LIMIT)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(notes))
}

/// `POST /notifications/{id}/read`
pub async fn mark_read<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Path(id): Path<NotificationId>,
) -> Result<Json<Notification>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let note = state
    .store
    .mark_notification_read(me.id, id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(note))
}

#[derive(Debug, Serialize)]
pub struct MarkAllResponse {
  pub status:  &'static str,
  pub updated: usize,
}

/// `POST /notifications/mark-all-read`
pub async fn mark_all_read<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
) -> Result<Json<MarkAllResponse>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let updated = state
    .store
    .mark_all_notifications_read(me.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(MarkAllResponse {
    status: "ok",
    updated,
  }))
}
