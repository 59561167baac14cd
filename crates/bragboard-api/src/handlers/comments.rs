//! Handlers for comments.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/shoutouts/{id}/comments` | Body: `{"content":"…"}` |
//! | `DELETE` | `/comments/{id}` | Author or admin |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bragboard_core::{CommentId, ShoutOutId, store::BoardStore};
use serde::Deserialize;

use super::{Message, required};
use crate::{AppState, auth::CurrentUser, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub content: String,
}

/// `POST /shoutouts/{id}/comments`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Path(shoutout_id): Path<ShoutOutId>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let content = required(&body.content, "content")?;
  let comment = state
    .store
    .add_comment(shoutout_id, &me, content)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(comment)))
}

/// `DELETE /comments/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Path(id): Path<CommentId>,
) -> Result<Json<Message>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let comment = state
    .store
    .get_comment(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Comment not found".into()))?;

  if !comment.can_be_deleted_by(&me) {
    return Err(ApiError::Forbidden(
      "Not authorized to delete this comment".into(),
    ));
  }

  state.store.delete_comment(id).await.map_err(ApiError::store)?;
  Ok(Json(Message::new("Comment deleted successfully")))
}
