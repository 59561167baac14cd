//! JSON REST API for BragBoard.
//!
//! Exposes an axum [`Router`] backed by any [`BoardStore`]. Every route lives
//! under `/api` and, apart from registration and login, requires a bearer
//! token.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = bragboard_api::router(AppState::new(store, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod error;
pub mod handlers;

pub use error::ApiError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  http::{HeaderValue, Method, header},
  routing::{delete, get, patch, post},
};
use bragboard_core::store::BoardStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use auth::AuthConfig;
use handlers::{
  accounts, comments, notifications, reactions, reports, shoutouts, users,
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BRAGBOARD_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:              String,
  pub port:              u16,
  pub database_path:     PathBuf,
  pub jwt_secret:        String,
  #[serde(default = "default_token_ttl")]
  pub token_ttl_minutes: i64,
  /// Origins allowed to call the API from a browser. Empty disables CORS.
  #[serde(default)]
  pub allowed_origins:   Vec<String>,
}

fn default_token_ttl() -> i64 { 24 * 60 }

impl ServerConfig {
  /// The token lifetime, or `None` when `token_ttl_minutes` is not positive
  /// or does not fit a [`chrono::Duration`].
  pub fn token_ttl(&self) -> Option<chrono::Duration> {
    if self.token_ttl_minutes <= 0 {
      return None;
    }
    chrono::Duration::try_minutes(self.token_ttl_minutes)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: BoardStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

impl<S: BoardStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig) -> Self {
    let token_ttl = config.token_ttl().unwrap_or_else(|| {
      tracing::warn!(
        minutes = config.token_ttl_minutes,
        "invalid token lifetime, using one day"
      );
      chrono::Duration::days(1)
    });
    let auth = AuthConfig {
      jwt_secret: config.jwt_secret.clone(),
      token_ttl,
    };
    Self {
      store:  Arc::new(store),
      config: Arc::new(config),
      auth:   Arc::new(auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router, with every endpoint nested under
/// `/api`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: BoardStore + Clone + Send + Sync + 'static,
{
  let cors = cors_layer(&state.config.allowed_origins);

  let api = Router::new()
    // Accounts
    .route("/auth/register", post(accounts::register::<S>))
    .route("/auth/login", post(accounts::login::<S>))
    .route("/auth/me", get(accounts::me))
    // Users
    .route("/users", get(users::list::<S>))
    .route("/users/me", patch(users::update_me::<S>))
    .route("/users/me/shoutouts", get(users::my_shoutouts::<S>))
    .route("/users/me/tagged", get(users::tagged::<S>))
    .route("/users/{id}", get(users::get_one::<S>).delete(users::delete_one::<S>))
    .route("/users/{id}/role", patch(users::set_role::<S>))
    // Shout-outs
    .route("/shoutouts", get(shoutouts::list::<S>).post(shoutouts::create::<S>))
    .route(
      "/shoutouts/{id}",
      get(shoutouts::get_one::<S>).delete(shoutouts::delete_one::<S>),
    )
    .route("/shoutouts/{id}/comments", post(comments::create::<S>))
    .route(
      "/shoutouts/{id}/reactions",
      get(reactions::list::<S>).post(reactions::toggle::<S>),
    )
    .route("/comments/{id}", delete(comments::delete_one::<S>))
    // Moderation
    .route("/reports", post(reports::create::<S>))
    .route("/admin/reports", get(reports::list::<S>))
    .route("/admin/reports/{id}/status", patch(reports::set_status::<S>))
    // Notifications
    .route("/notifications", get(notifications::list::<S>))
    .route("/notifications/mark-all-read", post(notifications::mark_all_read::<S>))
    .route("/notifications/{id}/read", post(notifications::mark_read::<S>))
    .with_state(state);

  let app = Router::new().nest("/api", api).layer(TraceLayer::new_for_http());
  match cors {
    Some(cors) => app.layer(cors),
    None => app,
  }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
  if origins.is_empty() {
    return None;
  }
  let origins: Vec<HeaderValue> = origins
    .iter()
    .filter_map(|o| match HeaderValue::from_str(o) {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(origin = %o, "ignoring invalid CORS origin");
        None
      }
    })
    .collect();

  Some(
    CorsLayer::new()
      .allow_origin(origins)
      .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
      .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
      .allow_credentials(true),
  )
}

#[cfg(test)]
mod tests;
