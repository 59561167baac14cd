//! Handlers for `/shoutouts/{id}/reactions`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/shoutouts/{id}/reactions` | Body: `{"type":"like"}`; toggles |
//! | `GET`  | `/shoutouts/{id}/reactions` | `?type=&page=&limit=` |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use bragboard_core::{
  ShoutOutId,
  reaction::{ReactionEntry, ReactionKind, ReactionQuery, ToggleAction},
  store::BoardStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, auth::CurrentUser, error::ApiError};

const MAX_LIMIT: u32 = 100;

// ─── Toggle ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ToggleBody {
  #[serde(rename = "type")]
  pub kind: ReactionKind,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
  pub message: String,
  pub action:  ToggleAction,
}

/// `POST /shoutouts/{id}/reactions`
pub async fn toggle<S>(
  State(state): State<AppState<S>>,
  CurrentUser(me): CurrentUser,
  Path(shoutout_id): Path<ShoutOutId>,
  Json(body): Json<ToggleBody>,
) -> Result<Json<ToggleResponse>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let outcome = state
    .store
    .toggle_reaction(shoutout_id, &me, body.kind)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(ToggleResponse {
    message: format!("Reaction {}", outcome.action),
    action:  outcome.action,
  }))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  #[serde(rename = "type")]
  pub kind:  Option<ReactionKind>,
  pub page:  Option<u32>,
  pub limit: Option<u32>,
}

impl ListParams {
  fn into_query(self) -> Result<ReactionQuery, ApiError> {
    let defaults = ReactionQuery::default();
    let page = self.page.unwrap_or(defaults.page);
    let limit = self.limit.unwrap_or(defaults.limit);
    if page == 0 {
      return Err(ApiError::Validation("page must be at least 1".into()));
    }
    if !(1..=MAX_LIMIT).contains(&limit) {
      return Err(ApiError::Validation(format!(
        "limit must be between 1 and {MAX_LIMIT}"
      )));
    }
    Ok(ReactionQuery {
      kind: self.kind,
      page,
      limit,
    })
  }
}

/// `GET /shoutouts/{id}/reactions`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  CurrentUser(_): CurrentUser,
  Path(shoutout_id): Path<ShoutOutId>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ReactionEntry>>, ApiError>
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let entries = state
    .store
    .list_reactions(shoutout_id, params.into_query()?)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn paging_defaults_and_bounds() {
    let q = ListParams::default().into_query().unwrap();
    assert_eq!((q.page, q.limit), (1, 10));

    let bad_page = ListParams {
      page: Some(0),
      ..Default::default()
    };
    assert!(bad_page.into_query().is_err());

    for limit in [0, MAX_LIMIT + 1] {
      let bad = ListParams {
        limit: Some(limit),
        ..Default::default()
      };
      assert!(bad.into_query().is_err());
    }
  }
}
