//! Error type for `vifeed-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("cannot seed {requested} students; at most {max} unique names are available")]
  RosterTooLarge { requested: usize, max: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
