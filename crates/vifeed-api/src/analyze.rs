//! Handlers for `/analyze` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/analyze` | Body: `{"text", "model"?, "context"?}` |
//! | `POST` | `/analyze/batch` | Body: `{"content", "model"?, "context"?}` |
//! | `POST` | `/analyze/batch/stop` | 202; takes effect before the next line |
//!
//! When `context` is present, every detected (aspect, sentiment) pair is
//! stored as a sentence carrying that context.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use vifeed_core::{
  batch::{self, BatchReport},
  predict::{Prediction, PredictionModel, PredictionOutcome, Predictor},
  sentence::{NewSentence, SentenceContext},
  store::FeedbackStore,
};

use crate::{ApiState, error::ApiError};

/// Store one sentence per detected pair; returns how many were stored.
async fn store_pairs<S>(
  store: &S,
  text: &str,
  predictions: &[Prediction],
  context: &SentenceContext,
) -> Result<usize, ApiError>
where
  S: FeedbackStore,
{
  for p in predictions {
    let input = NewSentence::new(text, p.aspect.as_str(), p.sentiment.as_str())
      .with_context(context.clone());
    store.insert_sentence(input).await.map_err(ApiError::store)?;
  }
  Ok(predictions.len())
}

// ─── Single sentence ──────────────────────────────────────────────────────────

/// `text` is sent and stored exactly as given; surrounding whitespace is
/// only used to reject blank input. `POST /sentences` and batch lines follow
/// the same rule.
#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
  pub text:    String,
  /// Falls back to the session's selected model.
  pub model:   Option<PredictionModel>,
  pub context: Option<SentenceContext>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
  pub outcome: PredictionOutcome,
  pub stored:  usize,
}

/// `POST /analyze`
pub async fn single<S, P>(
  State(state): State<ApiState<S, P>>,
  Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalyzeResponse>, ApiError>
where
  S: FeedbackStore,
  P: Predictor,
{
  if body.text.trim().is_empty() {
    return Err(ApiError::BadRequest("text must not be empty".into()));
  }
  let text = body.text.as_str();

  let model = match body.model {
    Some(m) => m,
    None => state.session.read().await.model,
  };
  let outcome = state.predictor.predict(text, model).await;

  let stored = match &body.context {
    Some(ctx) => store_pairs(&*state.store, text, outcome.predictions(), ctx).await?,
    None => 0,
  };
  Ok(Json(AnalyzeResponse { outcome, stored }))
}

// ─── Batch ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BatchBody {
  /// File content; one sentence per non-blank line.
  pub content: String,
  pub model:   Option<PredictionModel>,
  pub context: Option<SentenceContext>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
  #[serde(flatten)]
  pub report: BatchReport,
  pub stored: usize,
}

/// `POST /analyze/batch`
pub async fn batch<S, P>(
  State(state): State<ApiState<S, P>>,
  Json(body): Json<BatchBody>,
) -> Result<Json<BatchResponse>, ApiError>
where
  S: FeedbackStore,
  P: Predictor,
{
  let (stop, model) = {
    let session = state.session.read().await;
    (session.stop.clone(), body.model.unwrap_or(session.model))
  };
  stop.reset();

  let lines = batch::batch_lines(&body.content);
  tracing::info!(lines = lines.len(), %model, "batch started");

  let report = batch::run_batch(&*state.predictor, &lines, model, &stop, |result, progress| {
    tracing::debug!(
      line = result.index,
      processed = progress.processed,
      total = progress.total,
      failed = result.outcome.is_failed(),
      "batch line analysed"
    );
  })
  .await;

  let mut stored = 0;
  if let Some(ctx) = &body.context {
    for result in &report.results {
      stored +=
        store_pairs(&*state.store, &result.text, result.outcome.predictions(), ctx).await?;
    }
  }

  tracing::info!(
    processed = report.processed(),
    failures = report.failures(),
    stopped = report.stopped,
    stored,
    "batch finished"
  );
  Ok(Json(BatchResponse { report, stored }))
}

/// `POST /analyze/batch/stop`
pub async fn stop<S, P>(State(state): State<ApiState<S, P>>) -> impl IntoResponse {
  state.session.read().await.stop.request_stop();
  tracing::info!("batch stop requested");
  StatusCode::ACCEPTED
}
