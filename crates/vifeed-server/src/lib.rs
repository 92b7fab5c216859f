//! HTTP server assembly for vifeed.
//!
//! Holds the runtime configuration and mounts [`vifeed_api`] under `/api`
//! with request tracing. The binary in `main.rs` only wires these together.

use std::path::PathBuf;

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vifeed_api::ApiState;
use vifeed_core::{predict::Predictor, store::FeedbackStore};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `VIFEED_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// Base URL of the prediction service.
  pub predict_url:          String,
  pub predict_timeout_secs: u64,
  /// Students generated when the store is first seeded; at most
  /// `vifeed_core::roster::MAX_STUDENT_TOTAL`.
  pub students:             usize,
  /// Fixed RNG seed for the student roster.
  pub seed:                 Option<u64>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "127.0.0.1".to_string(),
      port:                 8501,
      store_path:           PathBuf::from("aspect_sa.db"),
      predict_url:          vifeed_predict::DEFAULT_BASE_URL.to_string(),
      predict_timeout_secs: 30,
      students:             vifeed_core::roster::DEFAULT_STUDENT_TOTAL,
      seed:                 None,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, with every request traced.
pub fn router<S, P>(state: ApiState<S, P>) -> Router
where
  S: FeedbackStore + 'static,
  P: Predictor + 'static,
{
  Router::new()
    .nest("/api", vifeed_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}
