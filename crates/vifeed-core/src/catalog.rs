//! Reference dimensions and the fixed catalog used to seed them.
//!
//! Dimension rows are created once and never change afterwards. The seed
//! values here are the single source of truth; storage backends insert them
//! with insert-or-ignore semantics keyed on each table's unique column.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Stored rows ─────────────────────────────────────────────────────────────

/// A seeded student, as listed by class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub id:           i64,
  pub student_code: String,
  pub name:         String,
  pub class_id:     Option<i64>,
}

// ─── Fixed catalog ───────────────────────────────────────────────────────────

/// Aspect ids are fixed so predictions and stored rows agree across installs.
pub const ASPECTS: [(i64, &str); 8] = [
  (1, "Teaching quality"),
  (2, "Support from lecturers"),
  (3, "Learning environment"),
  (4, "Course information"),
  (5, "Organization and management"),
  (6, "Workload"),
  (7, "Test and evaluation"),
  (8, "General review"),
];

pub const SENTIMENTS: [(i64, &str); 3] =
  [(0, "Negative"), (1, "Neutral"), (2, "Positive")];

/// `(code, name)` pairs.
pub const COURSES: [(&str, &str); 6] = [
  ("CS101", "Nhập môn Khoa học Máy tính"),
  ("ML202", "Machine Learning nâng cao"),
  ("DB303", "Cơ sở Dữ liệu"),
  ("AI404", "Trí tuệ Nhân tạo"),
  ("WEB505", "Phát triển Ứng dụng Web"),
  ("NET606", "Mạng Máy tính"),
];

pub const FIRST_YEAR: i32 = 2020;
pub const LAST_SEMESTER_YEAR: i32 = 2025;
pub const LAST_ACADEMIC_START_YEAR: i32 = 2024;

/// Cohort numbers count from this year: the 2023 intake is `K47`.
pub const COHORT_BASE_YEAR: i32 = 1976;

/// Class suffixes created for every academic year.
pub const CLASS_SECTIONS: [char; 2] = ['A', 'B'];

// ─── Seed rows ───────────────────────────────────────────────────────────────

/// A semester row prior to insertion (no id yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemesterSeed {
  pub name:       String,
  pub start_date: NaiveDate,
  pub end_date:   NaiveDate,
}

/// An academic-year row prior to insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcademicYearSeed {
  pub name:       String,
  pub start_year: i32,
  pub end_year:   i32,
}

/// Two semesters per calendar year: `HK1` runs January to May, `HK2` August
/// to December.
pub fn semesters() -> Vec<SemesterSeed> {
  (FIRST_YEAR..=LAST_SEMESTER_YEAR)
    .flat_map(|year| {
      [
        semester(format!("{year}HK1"), (year, 1, 1), (year, 5, 31)),
        semester(format!("{year}HK2"), (year, 8, 1), (year, 12, 31)),
      ]
    })
    .flatten()
    .collect()
}

fn semester(
  name: String,
  (sy, sm, sd): (i32, u32, u32),
  (ey, em, ed): (i32, u32, u32),
) -> Option<SemesterSeed> {
  Some(SemesterSeed {
    name,
    start_date: NaiveDate::from_ymd_opt(sy, sm, sd)?,
    end_date:   NaiveDate::from_ymd_opt(ey, em, ed)?,
  })
}

pub fn academic_years() -> Vec<AcademicYearSeed> {
  (FIRST_YEAR..=LAST_ACADEMIC_START_YEAR)
    .map(|start| AcademicYearSeed {
      name:       format!("{start}-{}", start + 1),
      start_year: start,
      end_year:   start + 1,
    })
    .collect()
}

/// Class names for the cohort that starts in `start_year`, e.g. `K47A`.
pub fn class_names(start_year: i32) -> Vec<String> {
  let cohort = start_year - COHORT_BASE_YEAR;
  CLASS_SECTIONS
    .iter()
    .map(|section| format!("K{cohort}{section}"))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn two_semesters_per_year() {
    let all = semesters();
    let years = (LAST_SEMESTER_YEAR - FIRST_YEAR + 1) as usize;
    assert_eq!(all.len(), years * 2);
    assert_eq!(all[0].name, "2020HK1");
    assert_eq!(all[1].name, "2020HK2");
    assert_eq!(all[1].start_date, NaiveDate::from_ymd_opt(2020, 8, 1).unwrap());
    assert_eq!(all.last().unwrap().name, "2025HK2");
  }

  #[test]
  fn academic_year_names_span_two_years() {
    let years = academic_years();
    assert_eq!(years.len(), 5);
    assert_eq!(years[3].name, "2023-2024");
    assert_eq!(years[3].end_year, 2024);
  }

  #[test]
  fn class_names_follow_cohort_numbering() {
    assert_eq!(class_names(2023), vec!["K47A", "K47B"]);
    assert_eq!(class_names(2020), vec!["K44A", "K44B"]);
  }
}
