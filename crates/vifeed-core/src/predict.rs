//! The external prediction service, as seen from the rest of the system.
//!
//! Predictors never fail with an error: the outcome distinguishes
//! "the service answered" (possibly with nothing detected) from "the call
//! did not succeed", and callers decide how to present each.

use std::future::Future;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::Error;

// ─── Model selector ──────────────────────────────────────────────────────────

/// The two models the prediction service exposes, each on its own endpoint.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
pub enum PredictionModel {
  #[default]
  #[serde(rename = "PhoBert_CNN_LSTM")]
  #[strum(serialize = "PhoBert_CNN_LSTM")]
  PhoBertCnnLstm,
  #[serde(rename = "CNN_LSTM_ATTENTION")]
  #[strum(serialize = "CNN_LSTM_ATTENTION")]
  CnnLstmAttention,
}

impl PredictionModel {
  /// Endpoint path relative to the service's base URL.
  pub fn path(self) -> &'static str {
    match self {
      Self::PhoBertCnnLstm => "/predict_pho",
      Self::CnnLstmAttention => "/predict_cnn",
    }
  }

  pub fn parse(s: &str) -> crate::Result<Self> {
    s.parse().map_err(|_| Error::UnknownModel(s.to_owned()))
  }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

/// One detected (aspect, sentiment) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
  pub aspect:    String,
  pub sentiment: String,
}

/// Request body sent to a model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
  pub text: String,
}

/// Response body returned by a model endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
  #[serde(default)]
  pub predictions: Vec<Prediction>,
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
  /// The service answered; `predictions` is in response order and may be
  /// empty when nothing was detected.
  Success { predictions: Vec<Prediction> },
  /// Transport failure, non-2xx status, or an unparseable body.
  Failed { reason: String },
}

impl PredictionOutcome {
  pub fn failed(reason: impl Into<String>) -> Self {
    Self::Failed { reason: reason.into() }
  }

  /// The detected pairs, or an empty slice on failure.
  pub fn predictions(&self) -> &[Prediction] {
    match self {
      Self::Success { predictions } => predictions,
      Self::Failed { .. } => &[],
    }
  }

  pub fn is_failed(&self) -> bool { matches!(self, Self::Failed { .. }) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the prediction service.
pub trait Predictor: Send + Sync {
  /// Run `text` through `model`. Must not panic on service errors.
  fn predict(
    &self,
    text: &str,
    model: PredictionModel,
  ) -> impl Future<Output = PredictionOutcome> + Send;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn model_names_match_service_identifiers() {
    assert_eq!(
      PredictionModel::parse("PhoBert_CNN_LSTM").unwrap(),
      PredictionModel::PhoBertCnnLstm
    );
    assert_eq!(
      PredictionModel::CnnLstmAttention.to_string(),
      "CNN_LSTM_ATTENTION"
    );
    assert_eq!(
      serde_json::to_string(&PredictionModel::CnnLstmAttention).unwrap(),
      "\"CNN_LSTM_ATTENTION\""
    );
    assert!(matches!(
      PredictionModel::parse("bert"),
      Err(Error::UnknownModel(_))
    ));
  }

  #[test]
  fn each_model_has_its_own_endpoint() {
    assert_eq!(PredictionModel::PhoBertCnnLstm.path(), "/predict_pho");
    assert_eq!(PredictionModel::CnnLstmAttention.path(), "/predict_cnn");
  }

  #[test]
  fn failed_outcome_has_no_predictions() {
    let outcome = PredictionOutcome::failed("connection refused");
    assert!(outcome.is_failed());
    assert!(outcome.predictions().is_empty());

    let ok = PredictionOutcome::Success { predictions: vec![] };
    assert!(!ok.is_failed());
  }

  #[test]
  fn response_without_predictions_key_is_empty() {
    let resp: PredictResponse = serde_json::from_str("{}").unwrap();
    assert!(resp.predictions.is_empty());
  }
}
