//! SQL schema for the vifeed SQLite store.
//!
//! Table and column names are shared with existing `aspect_sa.db` files, so
//! an old database opens without migration.

/// Connection-level settings. Run outside any transaction; SQLite ignores
/// these pragmas inside one.
pub const PRAGMAS: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
/// Tables are listed in dependency order.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS Aspect (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS Sentiment (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS Semester (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE,
    start_date TEXT,                 -- YYYY-MM-DD
    end_date   TEXT
);

CREATE TABLE IF NOT EXISTS Course (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS AcademicYear (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    name       TEXT NOT NULL UNIQUE,
    start_year INTEGER,
    end_year   INTEGER
);

CREATE TABLE IF NOT EXISTS Class (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT NOT NULL,
    academic_year_id INTEGER REFERENCES AcademicYear(id),
    UNIQUE (name, academic_year_id)
);

CREATE TABLE IF NOT EXISTS Student (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    student_code TEXT NOT NULL UNIQUE,
    name         TEXT NOT NULL,
    class_id     INTEGER REFERENCES Class(id)
);

-- Sentences are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS Sentence (
    id               TEXT PRIMARY KEY,  -- UUID v4, assigned at insert
    text             TEXT NOT NULL,
    aspect_id        INTEGER REFERENCES Aspect(id),
    sentiment_id     INTEGER REFERENCES Sentiment(id),
    semester_id      INTEGER REFERENCES Semester(id),
    course_id        INTEGER REFERENCES Course(id),
    academic_year_id INTEGER REFERENCES AcademicYear(id),
    class_id         INTEGER REFERENCES Class(id),
    student_id       INTEGER REFERENCES Student(id)
);

CREATE INDEX IF NOT EXISTS sentence_aspect_idx   ON Sentence(aspect_id);
CREATE INDEX IF NOT EXISTS sentence_semester_idx ON Sentence(semester_id);
CREATE INDEX IF NOT EXISTS sentence_course_idx   ON Sentence(course_id);
CREATE INDEX IF NOT EXISTS sentence_class_idx    ON Sentence(class_id);
";
