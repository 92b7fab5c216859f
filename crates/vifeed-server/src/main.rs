//! vifeed-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered with
//! `VIFEED_*` environment variables, opens and seeds the SQLite store, and
//! serves the JSON API over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vifeed_api::ApiState;
use vifeed_predict::{PredictConfig, PredictionClient};
use vifeed_server::ServerConfig;
use vifeed_store_sqlite::{SeedOptions, SqliteStore};

#[derive(Parser)]
#[command(author, version, about = "vifeed review server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("VIFEED"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store; schema and reference data are created on first open.
  let seed = SeedOptions {
    students: server_cfg.students,
    rng_seed: server_cfg.seed,
  };
  let store = SqliteStore::open(&store_path, seed)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let predictor = PredictionClient::new(PredictConfig {
    base_url:     server_cfg.predict_url.clone(),
    timeout_secs: server_cfg.predict_timeout_secs,
  })?;
  tracing::info!(url = %server_cfg.predict_url, "using prediction service");

  let app = vifeed_server::router(ApiState::new(store, predictor));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

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
