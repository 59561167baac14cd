//! Handlers for moderation reports.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/reports` | Body needs `shoutout_id` or `comment_id` |
//! | `GET`   | `/admin/reports` | Admin only; `?status=` |
//! | `PATCH` | `/admin/reports/{id}/status` | Admin only |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use bragboard_core::{
  CommentId, ReportId, ShoutOutId,
  report::{NewReport, Report, ReportStatus, ReportView},
  store::BoardStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  auth::{CurrentAdmin, CurrentUser},
  error::ApiError,
};

// ─── File a report ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateBody {
  pub shoutout_id: Option<ShoutOutId>,
  pub comment_id:  Option<CommentId>,
  pub reason:      Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateResponse {
  pub message: &'static str,
  pub report:  Report,
}

/// `POST /reports`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let input = NewReport {
    shoutout_id: body.shoutout_id,
    comment_id:  body.comment_id,
    reason:      body
      .reason
      .map(|r| r.trim().to_owned())
      .filter(|r| !r.is_empty()),
  };

  let report = state
    .store
    .create_report(&me, input)
    .await
    .map_err(ApiError::store)?;

  Ok((
    StatusCode::CREATED,
    Json(CreateResponse {
      message: "Your report has been submitted and sent to the admin.",
      report,
    }),
  ))
}

// ─── Admin ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<ReportStatus>,
}

/// `GET /admin/reports[?status=<status>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentAdmin(_): CurrentAdmin,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ReportView>>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let reports = state
    .store
    .list_reports(params.status)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(reports))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: ReportStatus,
}

/// `PATCH /admin/reports/{id}/status`, body: `{"status":"resolved"}`
pub async fn set_status<S>(
  State(state): State<AppState<S>>,
  CurrentAdmin(admin): CurrentAdmin,
  Path(id): Path<ReportId>,
  Json(body): Json<StatusBody>,
) -> Result<Json<ReportView>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let view = state
    .store
    .set_report_status(id, body.status)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(admin_id = admin.id, report_id = id, status = %body.status, "report reviewed");
  Ok(Json(view))
}
