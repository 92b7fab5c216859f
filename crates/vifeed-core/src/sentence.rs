//! Sentence types — the append-only fact table of the feedback store.
//!
//! A sentence is one analysed piece of feedback tagged with an aspect, a
//! sentiment and its academic context. Sentences are never updated.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Input ───────────────────────────────────────────────────────────────────

/// Human-readable academic context for a sentence.
///
/// Every field is resolved by exact match against its dimension table when
/// the sentence is stored. Absent or unknown values become null references
/// rather than errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceContext {
  /// Semester name, e.g. `2024HK1`.
  pub semester:      Option<String>,
  /// Course code, e.g. `CS101`.
  pub course_code:   Option<String>,
  /// Academic year name, e.g. `2023-2024`.
  pub academic_year: Option<String>,
  /// Class name, e.g. `K47A`.
  pub class_name:    Option<String>,
  /// Student code, e.g. `SVK47A001`.
  pub student_code:  Option<String>,
}

/// Input to [`crate::store::FeedbackStore::insert_sentence`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSentence {
  pub text:      String,
  pub aspect:    Option<String>,
  pub sentiment: Option<String>,
  #[serde(default, flatten)]
  pub context:   SentenceContext,
}

impl NewSentence {
  pub fn new(
    text: impl Into<String>,
    aspect: impl Into<String>,
    sentiment: impl Into<String>,
  ) -> Self {
    Self {
      text:      text.into(),
      aspect:    Some(aspect.into()),
      sentiment: Some(sentiment.into()),
      context:   SentenceContext::default(),
    }
  }

  pub fn with_context(mut self, context: SentenceContext) -> Self {
    self.context = context;
    self
  }
}

// ─── Stored row ──────────────────────────────────────────────────────────────

/// A persisted sentence with its resolved foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
  /// Generated at insert time; never reused.
  pub id:               Uuid,
  pub text:             String,
  pub aspect_id:        Option<i64>,
  pub sentiment_id:     Option<i64>,
  pub semester_id:      Option<i64>,
  pub course_id:        Option<i64>,
  pub academic_year_id: Option<i64>,
  pub class_id:         Option<i64>,
  pub student_id:       Option<i64>,
}

// ─── Denormalized view ───────────────────────────────────────────────────────

/// One row of the denormalized sentence view: ids replaced by labels.
///
/// A label is `None` when the sentence's reference was null. Such rows stay
/// in the view; they only drop out once a filter asks for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRow {
  pub id:            String,
  pub text:          String,
  pub aspect:        Option<String>,
  pub sentiment:     Option<String>,
  pub semester:      Option<String>,
  /// Course code; the display name lives in `course_name`.
  pub course:        Option<String>,
  pub course_name:   Option<String>,
  pub academic_year: Option<String>,
  pub class:         Option<String>,
  pub student_code:  Option<String>,
}

impl SentenceRow {
  /// `"CODE – Name"`, or just the code when the name is unknown.
  pub fn course_label(&self) -> Option<String> {
    let code = self.course.as_deref()?;
    Some(course_label(code, self.course_name.as_deref()))
  }
}

pub fn course_label(code: &str, name: Option<&str>) -> String {
  match name {
    Some(name) => format!("{code} – {name}"),
    None => code.to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn course_label_joins_code_and_name() {
    let row = SentenceRow {
      course: Some("CS101".into()),
      course_name: Some("Nhập môn Khoa học Máy tính".into()),
      ..Default::default()
    };
    assert_eq!(
      row.course_label().as_deref(),
      Some("CS101 – Nhập môn Khoa học Máy tính")
    );
    assert_eq!(SentenceRow::default().course_label(), None);
  }

  #[test]
  fn new_sentence_body_flattens_context() {
    let body = serde_json::json!({
      "text": "Thầy dạy rất hay",
      "aspect": "Teaching quality",
      "sentiment": "Positive",
      "semester": "2024HK1",
      "class_name": "K47A"
    });
    let input: NewSentence = serde_json::from_value(body).unwrap();
    assert_eq!(input.context.semester.as_deref(), Some("2024HK1"));
    assert_eq!(input.context.class_name.as_deref(), Some("K47A"));
    assert_eq!(input.context.course_code, None);
  }
}
