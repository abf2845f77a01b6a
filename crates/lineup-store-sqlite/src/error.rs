//! Error type for `lineup-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A rejected command; see [`lineup_core::Error::kind`].
  #[error("{0}")]
  Core(#[from] lineup_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value outside its domain.
  #[error("cannot decode {column}: {value:?}")]
  Decode { column: &'static str, value: String },
}

impl lineup_core::store::StoreError for Error {
  fn domain(&self) -> Option<&lineup_core::Error> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
