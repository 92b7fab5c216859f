//! Sequential batch analysis of a feedback file.
//!
//! Lines are sent to the predictor one at a time, in file order. A
//! [`StopToken`] is checked once per line, before that line's call, so a stop
//! request takes effect at the next line boundary and never interrupts a call
//! in flight.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::predict::{PredictionModel, PredictionOutcome, Predictor};

// ─── Stop token ──────────────────────────────────────────────────────────────

/// Cooperative stop request shared between a running batch and whoever may
/// want to stop it. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
  pub fn new() -> Self { Self::default() }

  pub fn request_stop(&self) { self.0.store(true, Ordering::SeqCst); }

  pub fn is_stop_requested(&self) -> bool { self.0.load(Ordering::SeqCst) }

  /// Clear a previous request before starting a new batch.
  pub fn reset(&self) { self.0.store(false, Ordering::SeqCst); }
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// The non-blank lines of `content`, in order.
pub fn batch_lines(content: &str) -> Vec<&str> {
  content.lines().filter(|l| !l.trim().is_empty()).collect()
}

// ─── Results ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResult {
  /// 1-based position among the non-blank lines.
  pub index:   usize,
  pub text:    String,
  pub outcome: PredictionOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
  pub processed: usize,
  pub total:     usize,
}

impl BatchProgress {
  pub fn fraction(&self) -> f64 {
    if self.total == 0 {
      1.0
    } else {
      self.processed as f64 / self.total as f64
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
  pub total:   usize,
  pub results: Vec<LineResult>,
  /// `true` if a stop request ended the batch before the last line.
  pub stopped: bool,
}

impl BatchReport {
  pub fn processed(&self) -> usize { self.results.len() }

  pub fn failures(&self) -> usize {
    self.results.iter().filter(|r| r.outcome.is_failed()).count()
  }
}

// ─── Runner ──────────────────────────────────────────────────────────────────

/// Analyse `lines` in order, calling `on_line` after each one.
pub async fn run_batch<P, F>(
  predictor: &P,
  lines: &[&str],
  model: PredictionModel,
  stop: &StopToken,
  mut on_line: F,
) -> BatchReport
where
  P: Predictor,
  F: FnMut(&LineResult, BatchProgress),
{
  let total = lines.len();
  let mut report = BatchReport { total, ..Default::default() };

  for (idx, line) in lines.iter().enumerate() {
    if stop.is_stop_requested() {
      tracing::info!(processed = idx, total, "batch stopped on request");
      report.stopped = true;
      break;
    }

    let outcome = predictor.predict(line, model).await;
    let result = LineResult {
      index: idx + 1,
      text: (*line).to_owned(),
      outcome,
    };
    on_line(&result, BatchProgress { processed: idx + 1, total });
    report.results.push(result);
  }

  report
}
