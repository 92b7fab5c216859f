//! [`SqliteStore`] — the SQLite implementation of [`FeedbackStore`].

use std::path::Path;

use rusqlite::{Connection, OptionalExtension as _};
use uuid::Uuid;

use vifeed_core::{
  catalog::Student,
  report::{CourseOption, DimensionOptions},
  roster::{DEFAULT_STUDENT_TOTAL, MAX_STUDENT_TOTAL},
  sentence::{NewSentence, Sentence, SentenceRow},
  store::{FeedbackStore, TableCounts},
};

use crate::{
  Error, Result,
  encode::{Lookup, encode_uuid},
  schema::{PRAGMAS, SCHEMA},
  seed::seed_all,
};

// ─── Seed options ────────────────────────────────────────────────────────────

/// How the synthetic student roster is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedOptions {
  /// Number of students spread across all classes.
  pub students: usize,
  /// Fixed RNG seed for reproducible names; entropy when `None`.
  pub rng_seed: Option<u64>,
}

impl Default for SeedOptions {
  fn default() -> Self {
    Self { students: DEFAULT_STUDENT_TOTAL, rng_seed: None }
  }
}

impl SeedOptions {
  /// Reject rosters the name generator could not fill.
  pub fn validate(&self) -> Result<()> {
    if self.students > MAX_STUDENT_TOTAL {
      return Err(Error::RosterTooLarge {
        requested: self.students,
        max:       MAX_STUDENT_TOTAL,
      });
    }
    Ok(())
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A feedback store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
  seed: SeedOptions,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, then create the schema and seed the
  /// reference data in one transaction.
  pub async fn open(path: impl AsRef<Path>, seed: SeedOptions) -> Result<Self> {
    seed.validate()?;
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, seed).await
  }

  /// Open an in-memory store, as the tests do.
  pub async fn open_in_memory(seed: SeedOptions) -> Result<Self> {
    seed.validate()?;
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, seed).await
  }

  async fn init(conn: tokio_rusqlite::Connection, seed: SeedOptions) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(())
      })
      .await?;
    let store = Self { conn, seed };
    store.bootstrap().await?;
    Ok(store)
  }

  /// Schema creation plus seeding as a single all-or-nothing transaction.
  pub async fn bootstrap(&self) -> Result<()> {
    let options = self.seed;
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        let inserted = seed_all(&tx, &options)?;
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    tracing::info!(inserted, "feedback store ready");
    Ok(())
  }
}

// ─── Query helpers ───────────────────────────────────────────────────────────

/// Resolve `value` through `lookup`; absent or unknown values give `None`.
fn resolve(
  conn: &Connection,
  lookup: Lookup,
  value: Option<&str>,
) -> rusqlite::Result<Option<i64>> {
  let Some(value) = value else { return Ok(None) };
  let id = conn
    .prepare_cached(&lookup.sql())?
    .query_row([value], |row| row.get(0))
    .optional()?;
  if id.is_none() {
    tracing::debug!(table = lookup.table, value, "unresolved dimension value");
  }
  Ok(id)
}

fn names(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<String>> {
  let mut stmt = conn.prepare(sql)?;
  let names = stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(names)
}

fn count(conn: &Connection, table: &str) -> rusqlite::Result<u64> {
  conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
}

// ─── FeedbackStore impl ──────────────────────────────────────────────────────

impl FeedbackStore for SqliteStore {
  type Error = crate::Error;

  // ── Schema ────────────────────────────────────────────────────────────────

  async fn ensure_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn seed_reference_data(&self) -> Result<()> {
    let options = self.seed;
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let inserted = seed_all(&tx, &options)?;
        tx.commit()?;
        Ok(inserted)
      })
      .await?;
    tracing::debug!(inserted, "reference data seeded");
    Ok(())
  }

  // ── Sentences ─────────────────────────────────────────────────────────────

  async fn insert_sentence(&self, input: NewSentence) -> Result<Sentence> {
    let id = Uuid::new_v4();
    let id_str = encode_uuid(id);

    let sentence = self
      .conn
      .call(move |conn| {
        let ctx = &input.context;
        let sentence = Sentence {
          id,
          aspect_id: resolve(conn, Lookup::ASPECT, input.aspect.as_deref())?,
          sentiment_id: resolve(conn, Lookup::SENTIMENT, input.sentiment.as_deref())?,
          semester_id: resolve(conn, Lookup::SEMESTER, ctx.semester.as_deref())?,
          course_id: resolve(conn, Lookup::COURSE, ctx.course_code.as_deref())?,
          academic_year_id: resolve(
            conn,
            Lookup::ACADEMIC_YEAR,
            ctx.academic_year.as_deref(),
          )?,
          class_id: resolve(conn, Lookup::CLASS, ctx.class_name.as_deref())?,
          student_id: resolve(conn, Lookup::STUDENT, ctx.student_code.as_deref())?,
          text: input.text,
        };

        conn.execute(
          "INSERT INTO Sentence (
             id, text, aspect_id, sentiment_id, semester_id,
             course_id, academic_year_id, class_id, student_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str,
            sentence.text,
            sentence.aspect_id,
            sentence.sentiment_id,
            sentence.semester_id,
            sentence.course_id,
            sentence.academic_year_id,
            sentence.class_id,
            sentence.student_id,
          ],
        )?;
        Ok(sentence)
      })
      .await?;

    tracing::debug!(id = %sentence.id, "sentence stored");
    Ok(sentence)
  }

  async fn sentence_view(&self) -> Result<Vec<SentenceRow>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT
             s.id, s.text,
             a.name, sen.name, sem.name,
             c.code, c.name,
             y.name, cl.name, st.student_code
           FROM Sentence s
           LEFT JOIN Aspect       a   ON s.aspect_id        = a.id
           LEFT JOIN Sentiment    sen ON s.sentiment_id     = sen.id
           LEFT JOIN Semester     sem ON s.semester_id      = sem.id
           LEFT JOIN Course       c   ON s.course_id        = c.id
           LEFT JOIN AcademicYear y   ON s.academic_year_id = y.id
           LEFT JOIN Class        cl  ON s.class_id         = cl.id
           LEFT JOIN Student      st  ON s.student_id       = st.id
           ORDER BY s.rowid",
        )?;

        let rows = stmt
          .query_map([], |row| {
            Ok(SentenceRow {
              id:            row.get(0)?,
              text:          row.get(1)?,
              aspect:        row.get(2)?,
              sentiment:     row.get(3)?,
              semester:      row.get(4)?,
              course:        row.get(5)?,
              course_name:   row.get(6)?,
              academic_year: row.get(7)?,
              class:         row.get(8)?,
              student_code:  row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Reference reads ───────────────────────────────────────────────────────

  async fn dimension_options(&self) -> Result<DimensionOptions> {
    let options = self
      .conn
      .call(|conn| {
        let courses = {
          let mut stmt = conn.prepare("SELECT code, name FROM Course ORDER BY id")?;
          let rows = stmt
            .query_map([], |row| {
              Ok(CourseOption { code: row.get(0)?, name: row.get(1)? })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          rows
        };

        Ok(DimensionOptions {
          aspects: names(conn, "SELECT name FROM Aspect ORDER BY id")?,
          sentiments: names(conn, "SELECT name FROM Sentiment ORDER BY id")?,
          semesters: names(conn, "SELECT name FROM Semester ORDER BY id")?,
          courses,
          classes: names(conn, "SELECT name FROM Class ORDER BY id")?,
        })
      })
      .await?;
    Ok(options)
  }

  async fn list_students(&self, class_name: Option<String>) -> Result<Vec<Student>> {
    let students = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT st.id, st.student_code, st.name, st.class_id
           FROM Student st
           LEFT JOIN Class cl ON st.class_id = cl.id
           WHERE ?1 IS NULL OR cl.name = ?1
           ORDER BY st.id",
        )?;
        let rows = stmt
          .query_map([class_name.as_deref()], |row| {
            Ok(Student {
              id:           row.get(0)?,
              student_code: row.get(1)?,
              name:         row.get(2)?,
              class_id:     row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(students)
  }

  async fn table_counts(&self) -> Result<TableCounts> {
    let counts = self
      .conn
      .call(|conn| {
        Ok(TableCounts {
          aspects:        count(conn, "Aspect")?,
          sentiments:     count(conn, "Sentiment")?,
          semesters:      count(conn, "Semester")?,
          courses:        count(conn, "Course")?,
          academic_years: count(conn, "AcademicYear")?,
          classes:        count(conn, "Class")?,
          students:       count(conn, "Student")?,
          sentences:      count(conn, "Sentence")?,
        })
      })
      .await?;
    Ok(counts)
  }
}
