//! Handlers for `/shoutouts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/shoutouts` | `?department=&sender_id=&start_date=` |
//! | `POST`   | `/shoutouts` | Body: `{"message":"…","recipient_ids":[1,2]}` |
//! | `GET`    | `/shoutouts/{id}` | 404 if not found |
//! | `DELETE` | `/shoutouts/{id}` | Sender or admin |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bragboard_core::{
  ShoutOutId, UserId,
  shoutout::{NewShoutOut, ShoutOutQuery, ShoutOutView},
  store::BoardStore,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use super::{Message, required};
use crate::{AppState, auth::CurrentUser, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Department of the sender.
  pub department: Option<String>,
  pub sender_id:  Option<UserId>,
  /// RFC 3339 instant or a bare `YYYY-MM-DD` date (midnight UTC).
  pub start_date: Option<String>,
}

fn parse_start_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc())
    .ok_or_else(|| ApiError::Validation(format!("invalid start_date: {raw}")))
}

/// `GET /shoutouts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ShoutOutView>>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let query = ShoutOutQuery {
    department:   params.department.filter(|d| !d.is_empty()),
    sender_id:    params.sender_id,
    recipient_id: None,
    start_date:   params
      .start_date
      .as_deref()
      .filter(|s| !s.is_empty())
      .map(parse_start_date)
      .transpose()?,
  };

  let views = state
    .store
    .list_shoutouts(&query, me.id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(views))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub message:       String,
  pub recipient_ids: Vec<UserId>,
}

/// `POST /shoutouts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let input = NewShoutOut {
    message:       required(&body.message, "message")?,
    recipient_ids: body.recipient_ids,
  };

  let shoutout = state
    .store
    .create_shoutout(&me, input)
    .await
    .map_err(ApiError::store)?;

  let view = state
    .store
    .view_shoutout(shoutout.id, me.id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::internal("shout-out vanished after insert"))?;

  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /shoutouts/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Path(id): Path<ShoutOutId>,
) -> Result<Json<ShoutOutView>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .view_shoutout(id, me.id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("Shout-out not found".into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /shoutouts/{id}`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Path(id): Path<ShoutOutId>,
) -> Result<Json<Message>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let shoutout = state
    .store
    .get_shoutout(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Shout-out not found".into()))?;

  if !shoutout.can_be_deleted_by(&me) {
    return Err(ApiError::Forbidden(
      "Not authorized to delete this shout-out".into(),
    ));
  }

  state.store.delete_shoutout(id).await.map_err(ApiError::store)?;
  Ok(Json(Message::new("Shout-out deleted successfully")))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone as _;

  use super::*;

  #[test]
  fn start_date_accepts_instants_and_dates() {
    let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    assert_eq!(parse_start_date("2024-05-01").unwrap(), midnight);
    assert_eq!(parse_start_date("2024-05-01T02:00:00+02:00").unwrap(), midnight);
    assert!(matches!(
      parse_start_date("yesterday"),
      Err(ApiError::Validation(_))
    ));
  }
}
