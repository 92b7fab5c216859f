//! Error types for `vifeed-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown dimension: {0:?}")]
  UnknownDimension(String),

  #[error("cannot group by {0:?}; expected aspect, semester, course or class")]
  UnsupportedGrouping(String),

  #[error("unknown prediction model: {0:?}")]
  UnknownModel(String),

  #[error("invalid colour {0:?}; expected #RRGGBB")]
  InvalidColor(String),

  #[error("unsupported font: {0:?}")]
  UnknownFont(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
