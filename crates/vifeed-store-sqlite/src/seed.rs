//! Reference-data seeding.
//!
//! Every insert uses `INSERT OR IGNORE` keyed on the table's unique
//! constraint, so seeding an already-seeded database is a no-op. Callers run
//! this inside a transaction.

use rand::{SeedableRng, rngs::StdRng};
use rusqlite::{Connection, params};
use vifeed_core::{catalog, roster};

use crate::{encode::encode_date, store::SeedOptions};

/// Seed every reference table. Returns the number of rows actually inserted.
pub fn seed_all(conn: &Connection, options: &SeedOptions) -> rusqlite::Result<usize> {
  let mut inserted = 0;
  inserted += seed_aspects(conn)?;
  inserted += seed_sentiments(conn)?;
  inserted += seed_semesters(conn)?;
  inserted += seed_courses(conn)?;
  inserted += seed_academic_years(conn)?;
  inserted += seed_classes(conn)?;
  inserted += seed_students(conn, options)?;
  Ok(inserted)
}

fn seed_aspects(conn: &Connection) -> rusqlite::Result<usize> {
  let mut stmt = conn.prepare("INSERT OR IGNORE INTO Aspect (id, name) VALUES (?1, ?2)")?;
  let mut n = 0;
  for (id, name) in catalog::ASPECTS {
    n += stmt.execute(params![id, name])?;
  }
  Ok(n)
}

fn seed_sentiments(conn: &Connection) -> rusqlite::Result<usize> {
  let mut stmt =
    conn.prepare("INSERT OR IGNORE INTO Sentiment (id, name) VALUES (?1, ?2)")?;
  let mut n = 0;
  for (id, name) in catalog::SENTIMENTS {
    n += stmt.execute(params![id, name])?;
  }
  Ok(n)
}

fn seed_semesters(conn: &Connection) -> rusqlite::Result<usize> {
  let mut stmt = conn.prepare(
    "INSERT OR IGNORE INTO Semester (name, start_date, end_date) VALUES (?1, ?2, ?3)",
  )?;
  let mut n = 0;
  for sem in catalog::semesters() {
    n += stmt.execute(params![
      sem.name,
      encode_date(sem.start_date),
      encode_date(sem.end_date),
    ])?;
  }
  Ok(n)
}

fn seed_courses(conn: &Connection) -> rusqlite::Result<usize> {
  let mut stmt =
    conn.prepare("INSERT OR IGNORE INTO Course (code, name) VALUES (?1, ?2)")?;
  let mut n = 0;
  for (code, name) in catalog::COURSES {
    n += stmt.execute(params![code, name])?;
  }
  Ok(n)
}

fn seed_academic_years(conn: &Connection) -> rusqlite::Result<usize> {
  let mut stmt = conn.prepare(
    "INSERT OR IGNORE INTO AcademicYear (name, start_year, end_year) VALUES (?1, ?2, ?3)",
  )?;
  let mut n = 0;
  for year in catalog::academic_years() {
    n += stmt.execute(params![year.name, year.start_year, year.end_year])?;
  }
  Ok(n)
}

/// Two classes per stored academic year, named after the cohort.
fn seed_classes(conn: &Connection) -> rusqlite::Result<usize> {
  let years: Vec<(i64, i32)> = {
    let mut stmt = conn.prepare(
      "SELECT id, start_year FROM AcademicYear
       WHERE start_year IS NOT NULL
       ORDER BY id ASC",
    )?;
    let rows = stmt
      .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
      .collect::<rusqlite::Result<_>>()?;
    rows
  };

  let mut stmt = conn
    .prepare("INSERT OR IGNORE INTO Class (name, academic_year_id) VALUES (?1, ?2)")?;
  let mut n = 0;
  for (year_id, start_year) in years {
    for name in catalog::class_names(start_year) {
      n += stmt.execute(params![name, year_id])?;
    }
  }
  Ok(n)
}

/// Spread `options.students` synthetic students over all classes.
fn seed_students(conn: &Connection, options: &SeedOptions) -> rusqlite::Result<usize> {
  let classes: Vec<(i64, String)> = {
    let mut stmt = conn.prepare("SELECT id, name FROM Class ORDER BY id ASC")?;
    let rows = stmt
      .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
      .collect::<rusqlite::Result<_>>()?;
    rows
  };

  let mut rng = match options.rng_seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };
  let plan = roster::plan_students(&classes, options.students, &mut rng);

  let mut stmt = conn.prepare(
    "INSERT OR IGNORE INTO Student (student_code, name, class_id) VALUES (?1, ?2, ?3)",
  )?;
  let mut n = 0;
  for student in plan {
    n += stmt.execute(params![student.student_code, student.name, student.class_id])?;
  }
  Ok(n)
}
