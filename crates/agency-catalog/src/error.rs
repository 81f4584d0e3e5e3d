//! Error type for `agency-catalog`.
//!
//! Lookup failures are domain errors ([`agency_core::Error`]); this type only
//! covers setting a client up.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
