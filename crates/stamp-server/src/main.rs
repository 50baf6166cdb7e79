//! Personality stamp server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the local
//! SQLite store, connects the hosted service when it is configured, and
//! serves the JSON API over HTTP.

mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use stamp_api::{ApiConfig, AppState};
use stamp_core::fallback::FallbackStore;
use stamp_remote::RemoteStore;
use stamp_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Personality stamp server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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
  let server_cfg = settings::load(&cli.config)?;

  // Local store.
  let store_path = settings::expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {parent:?}"))?;
  }
  let local = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  // Hosted service, if configured.
  let remote = match server_cfg.configured_remote() {
    Some(remote_cfg) => {
      info!(url = %remote_cfg.url, bucket = %remote_cfg.bucket, "remote service configured");
      Some(RemoteStore::new(remote_cfg).context("failed to build remote client")?)
    }
    None => {
      warn!("no remote service configured; records are kept locally only");
      None
    }
  };

  let state = AppState::new(
    FallbackStore::new(remote, local),
    ApiConfig::new(server_cfg.public_url()),
  );
  let app = stamp_api::router(state).layer(TraceLayer::new_for_http());
  let address = server_cfg.address();

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
