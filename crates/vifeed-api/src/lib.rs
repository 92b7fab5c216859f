//! JSON REST API for vifeed.
//!
//! Exposes an axum [`Router`] backed by any [`FeedbackStore`] and
//! [`Predictor`]. Transport concerns (binding, tracing layers) are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vifeed_api::api_router(state))
//! ```

pub mod analyze;
pub mod dimensions;
pub mod error;
pub mod report;
pub mod sentences;
pub mod settings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tokio::sync::RwLock;
use vifeed_core::{predict::Predictor, session::Session, store::FeedbackStore};

pub use error::ApiError;

/// Shared handler state.
///
/// There is one [`Session`] per process: model choice, display settings and
/// the batch stop token are shared by every client.
pub struct ApiState<S, P> {
  pub store:     Arc<S>,
  pub predictor: Arc<P>,
  pub session:   Arc<RwLock<Session>>,
}

impl<S, P> ApiState<S, P> {
  pub fn new(store: S, predictor: P) -> Self {
    Self {
      store:     Arc::new(store),
      predictor: Arc::new(predictor),
      session:   Arc::new(RwLock::new(Session::default())),
    }
  }
}

impl<S, P> Clone for ApiState<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      predictor: Arc::clone(&self.predictor),
      session:   Arc::clone(&self.session),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, P>(state: ApiState<S, P>) -> Router<()>
where
  S: FeedbackStore + 'static,
  P: Predictor + 'static,
{
  Router::new()
    // Analysis
    .route("/analyze", post(analyze::single::<S, P>))
    .route("/analyze/batch", post(analyze::batch::<S, P>))
    .route("/analyze/batch/stop", post(analyze::stop::<S, P>))
    // Sentences & students
    .route(
      "/sentences",
      get(sentences::list::<S, P>).post(sentences::create::<S, P>),
    )
    .route("/students", get(sentences::students::<S, P>))
    // Reference data
    .route("/dimensions", get(dimensions::options::<S, P>))
    .route("/stats/tables", get(dimensions::table_counts::<S, P>))
    // Reports
    .route("/report/filter", post(report::filter::<S, P>))
    .route("/report/distribution", post(report::distribution::<S, P>))
    .route("/report/crosstab", get(report::crosstab::<S, P>))
    .route("/report/trend", get(report::trend::<S, P>))
    // Session
    .route("/settings", get(settings::get::<S, P>).put(settings::put::<S, P>))
    .with_state(state)
}
