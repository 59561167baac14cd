//! bragboard server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), overlays any
//! `BRAGBOARD_*` environment variables, opens the SQLite store, and then
//! serves the API, seeds demo data, or promotes a user.
//!
//! ```text
//! BRAGBOARD_JWT_SECRET=change-me bragboard serve
//! bragboard seed
//! bragboard promote alice@bragboard.com
//! ```

mod seed;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bragboard_api::{AppState, ServerConfig};
use bragboard_core::{store::BoardStore, user::Role};
use bragboard_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "BragBoard peer-recognition server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Insert demo users, shout-outs, comments and reactions.
  Seed,
  /// Give an existing user the admin role.
  Promote {
    /// Email address of the user to promote.
    email: String,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(&cli.config)?;

  let database_path = expand_tilde(&server_cfg.database_path);
  let store = SqliteStore::open(&database_path)
    .await
    .with_context(|| format!("failed to open store at {database_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, server_cfg).await,
    Command::Seed => {
      let summary = seed::run(&store).await?;
      tracing::info!(
        users = summary.users_created,
        shoutouts = summary.shoutouts_created,
        "seeding finished (demo password: {})",
        seed::DEMO_PASSWORD
      );
      Ok(())
    }
    Command::Promote { email } => promote(&store, &email).await,
  }
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8000)?
    .set_default("database_path", "bragboard.db")?
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("BRAGBOARD")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("allowed_origins"),
    )
    .build()
    .context("failed to read config file")?;

  let config: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  anyhow::ensure!(
    config.token_ttl().is_some(),
    "token_ttl_minutes must be a positive number of minutes, got {}",
    config.token_ttl_minutes
  );
  Ok(config)
}

async fn serve(store: SqliteStore, server_cfg: ServerConfig) -> anyhow::Result<()> {
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = bragboard_api::router(AppState::new(store, server_cfg));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn promote(store: &SqliteStore, email: &str) -> anyhow::Result<()> {
  let email = email.trim().to_lowercase();
  let creds = store
    .get_credentials(&email)
    .await?
    .with_context(|| format!("no user with email {email}"))?;
  let user = store.set_role(creds.user.id, Role::Admin).await?;
  tracing::info!(user_id = user.id, email = %user.email, "promoted to admin");
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
