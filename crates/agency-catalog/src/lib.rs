//! Breed catalog clients.
//!
//! [`HttpBreedCatalog`] asks the remote catalog on every call; there is no
//! cache and no retry. [`StaticBreedCatalog`] answers from a fixed list and is
//! used by tests and offline deployments.

mod fixed;
mod http;

pub mod error;

use serde::{Deserialize, Serialize};

pub use error::{Error, Result};
pub use fixed::StaticBreedCatalog;
pub use http::HttpBreedCatalog;

/// Catalog settings, nested under `[catalog]` in the server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
  /// Scheme and host of the catalog; `/v1/breeds` is appended.
  #[serde(default = "default_base_url")]
  pub base_url:       String,
  /// Upper bound on one catalog request, connection and body included.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs:   u64,
  /// When set, breeds are checked against this list and the remote catalog
  /// is never contacted.
  #[serde(default)]
  pub offline_breeds: Option<Vec<String>>,
}

fn default_base_url() -> String { "https://api.thecatapi.com".to_string() }

fn default_timeout_secs() -> u64 { 10 }

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      base_url:       default_base_url(),
      timeout_secs:   default_timeout_secs(),
      offline_breeds: None,
    }
  }
}

/// Shared membership test: accept `breed` if `valid` lists it exactly.
fn lookup(breed: &str, valid: Vec<String>) -> agency_core::Result<()> {
  if valid.iter().any(|name| name == breed) {
    Ok(())
  } else {
    Err(agency_core::Error::UnknownBreed { breed: breed.to_string(), valid })
  }
}
