//! Encoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns, plus the dimension lookups used
//! to resolve human-readable values to row ids.
//!
//! Dates are stored as `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::NaiveDate;
use uuid::Uuid;

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format("%Y-%m-%d").to_string() }

// ─── Dimension lookups ───────────────────────────────────────────────────────

/// The unique column a human-readable dimension value is matched against.
#[derive(Debug, Clone, Copy)]
pub struct Lookup {
  pub table:  &'static str,
  pub column: &'static str,
}

impl Lookup {
  pub const ACADEMIC_YEAR: Self = Self::new("AcademicYear", "name");
  pub const ASPECT: Self = Self::new("Aspect", "name");
  pub const CLASS: Self = Self::new("Class", "name");
  pub const COURSE: Self = Self::new("Course", "code");
  pub const SEMESTER: Self = Self::new("Semester", "name");
  pub const SENTIMENT: Self = Self::new("Sentiment", "name");
  pub const STUDENT: Self = Self::new("Student", "student_code");

  const fn new(table: &'static str, column: &'static str) -> Self {
    Self { table, column }
  }

  /// `Class.name` is only unique per academic year; the oldest match wins.
  pub fn sql(self) -> String {
    format!(
      "SELECT id FROM {} WHERE {} = ?1 ORDER BY id LIMIT 1",
      self.table, self.column
    )
  }
}
