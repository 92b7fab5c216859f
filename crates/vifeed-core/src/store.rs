//! The `FeedbackStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `vifeed-store-sqlite`).
//! Higher layers (`vifeed-api`, `vifeed-cli`) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  catalog::Student,
  report::DimensionOptions,
  sentence::{NewSentence, Sentence, SentenceRow},
};

/// Row counts of every table, used to check seeding and for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCounts {
  pub aspects:        u64,
  pub sentiments:     u64,
  pub semesters:      u64,
  pub courses:        u64,
  pub academic_years: u64,
  pub classes:        u64,
  pub students:       u64,
  pub sentences:      u64,
}

/// Abstraction over a feedback store backend.
///
/// Dimension tables are written only by seeding. Sentences are append-only:
/// there is no update or delete.
pub trait FeedbackStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Create every table that does not exist yet. Safe to call repeatedly.
  fn ensure_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert the reference catalog and synthetic students, ignoring rows
  /// whose unique key is already present. Re-running changes nothing.
  fn seed_reference_data(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Sentences ─────────────────────────────────────────────────────────

  /// Store a sentence under a fresh id. Dimension values that do not
  /// resolve to an existing row are stored as null references.
  fn insert_sentence(
    &self,
    input: NewSentence,
  ) -> impl Future<Output = Result<Sentence, Self::Error>> + Send + '_;

  /// Every stored sentence with its dimension labels.
  fn sentence_view(
    &self,
  ) -> impl Future<Output = Result<Vec<SentenceRow>, Self::Error>> + Send + '_;

  // ── Reference reads ───────────────────────────────────────────────────

  /// All selectable dimension values, in table order.
  fn dimension_options(
    &self,
  ) -> impl Future<Output = Result<DimensionOptions, Self::Error>> + Send + '_;

  /// Students, optionally restricted to one class by name.
  fn list_students(
    &self,
    class_name: Option<String>,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  fn table_counts(
    &self,
  ) -> impl Future<Output = Result<TableCounts, Self::Error>> + Send + '_;
}
