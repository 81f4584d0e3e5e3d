//! Error type for `agency-store-sqlite`.

use agency_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rule refused the operation; nothing was written.
  #[error("{0}")]
  Core(#[from] agency_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),
}

impl StoreError for Error {
  fn rule(&self) -> Option<&agency_core::Error> {
    match self {
      Error::Core(e) => Some(e),
      Error::Database(_) => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
