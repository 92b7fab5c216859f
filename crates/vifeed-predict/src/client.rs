//! Async HTTP client wrapping the prediction service.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use vifeed_core::predict::{
  PredictRequest, PredictResponse, Prediction, PredictionModel, PredictionOutcome,
  Predictor,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Connection settings for the prediction service.
#[derive(Debug, Clone)]
pub struct PredictConfig {
  pub base_url:     String,
  pub timeout_secs: u64,
}

impl Default for PredictConfig {
  fn default() -> Self {
    Self { base_url: DEFAULT_BASE_URL.to_owned(), timeout_secs: 30 }
  }
}

/// Async HTTP client for the prediction service.
///
/// Cloning shares the inner [`reqwest::Client`] connection pool.
#[derive(Clone)]
pub struct PredictionClient {
  client: Client,
  config: PredictConfig,
}

impl PredictionClient {
  pub fn new(config: PredictConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  /// Full endpoint URL for `model`.
  pub fn endpoint(&self, model: PredictionModel) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), model.path())
  }

  /// `POST <endpoint>` with `{"text": ...}`; any failure is an error here
  /// and is flattened into an outcome by [`Predictor::predict`].
  async fn request(&self, text: &str, model: PredictionModel) -> Result<Vec<Prediction>> {
    let url = self.endpoint(model);
    let resp = self
      .client
      .post(&url)
      .json(&PredictRequest { text: text.to_owned() })
      .send()
      .await
      .with_context(|| format!("POST {url} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST {url} → {}", resp.status()));
    }

    let body: PredictResponse = resp.json().await.context("deserialising predictions")?;
    Ok(body.predictions)
  }
}

impl Predictor for PredictionClient {
  async fn predict(&self, text: &str, model: PredictionModel) -> PredictionOutcome {
    match self.request(text, model).await {
      Ok(predictions) => {
        tracing::debug!(%model, pairs = predictions.len(), "prediction received");
        PredictionOutcome::Success { predictions }
      }
      Err(e) => {
        tracing::warn!(%model, error = format!("{e:#}"), "prediction call failed");
        PredictionOutcome::failed(format!("{e:#}"))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::{Json, Router, http::StatusCode, routing::post};
  use serde_json::{Value, json};
  use tokio::net::TcpListener;

  use super::*;

  /// Serve `app` on an ephemeral port and return its base URL.
  async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
  }

  fn client(base_url: String) -> PredictionClient {
    PredictionClient::new(PredictConfig { base_url, timeout_secs: 5 }).unwrap()
  }

  /// Fake service: `/predict_pho` echoes the text as a single aspect,
  /// `/predict_cnn` answers with two fixed pairs.
  fn fake_service() -> Router {
    Router::new()
      .route(
        "/predict_pho",
        post(|Json(body): Json<Value>| async move {
          Json(json!({
            "predictions": [
              { "aspect": body["text"], "sentiment": "Positive" }
            ]
          }))
        }),
      )
      .route(
        "/predict_cnn",
        post(|| async {
          Json(json!({
            "predictions": [
              { "aspect": "Workload", "sentiment": "Negative" },
              { "aspect": "Teaching quality", "sentiment": "Positive" }
            ]
          }))
        }),
      )
  }

  #[test]
  fn endpoint_joins_base_and_model_path() {
    let c = client("http://localhost:5000/".into());
    assert_eq!(
      c.endpoint(PredictionModel::PhoBertCnnLstm),
      "http://localhost:5000/predict_pho"
    );
    assert_eq!(
      c.endpoint(PredictionModel::CnnLstmAttention),
      "http://localhost:5000/predict_cnn"
    );
  }

  #[tokio::test]
  async fn model_selects_endpoint() {
    let c = client(serve(fake_service()).await);

    let pho = c.predict("Thầy dạy hay", PredictionModel::PhoBertCnnLstm).await;
    assert_eq!(
      pho.predictions(),
      &[Prediction { aspect: "Thầy dạy hay".into(), sentiment: "Positive".into() }]
    );

    let cnn = c.predict("bất kỳ", PredictionModel::CnnLstmAttention).await;
    let aspects: Vec<_> = cnn.predictions().iter().map(|p| p.aspect.as_str()).collect();
    assert_eq!(aspects, ["Workload", "Teaching quality"]);
  }

  #[tokio::test]
  async fn empty_prediction_list_is_success() {
    let app = Router::new().route(
      "/predict_pho",
      post(|| async { Json(json!({ "predictions": [] })) }),
    );
    let c = client(serve(app).await);
    let outcome = c.predict("...", PredictionModel::PhoBertCnnLstm).await;
    assert_eq!(outcome, PredictionOutcome::Success { predictions: vec![] });
  }

  #[tokio::test]
  async fn server_error_is_failure() {
    let app = Router::new().route(
      "/predict_pho",
      post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model crashed") }),
    );
    let c = client(serve(app).await);
    let outcome = c.predict("câu", PredictionModel::PhoBertCnnLstm).await;
    assert!(outcome.is_failed());
    assert!(outcome.predictions().is_empty());
  }

  #[tokio::test]
  async fn malformed_body_is_failure() {
    let app = Router::new().route("/predict_pho", post(|| async { "not json" }));
    let c = client(serve(app).await);
    let outcome = c.predict("câu", PredictionModel::PhoBertCnnLstm).await;
    assert!(matches!(outcome, PredictionOutcome::Failed { ref reason } if reason.contains("deserialising")));
  }

  #[tokio::test]
  async fn unreachable_service_is_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = client(format!("http://{addr}"));
    let outcome = c.predict("câu", PredictionModel::CnnLstmAttention).await;
    assert!(outcome.is_failed());
  }
}
