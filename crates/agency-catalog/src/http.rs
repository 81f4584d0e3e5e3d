//! A breed catalog served over HTTP (`GET <base>/v1/breeds`).

use std::time::Duration;

use agency_core::{Error as CoreError, catalog::BreedCatalog};
use reqwest::Client;
use serde::Deserialize;

use crate::{CatalogConfig, Result};

/// One element of the catalog response. Only the name is used.
#[derive(Debug, Deserialize)]
struct BreedEntry {
  name: String,
}

/// Remote breed catalog client.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpBreedCatalog {
  client: Client,
  url:    String,
}

impl HttpBreedCatalog {
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      url: format!("{}/v1/breeds", base_url.trim_end_matches('/')),
    })
  }

  pub fn from_config(config: &CatalogConfig) -> Result<Self> {
    Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
  }

  /// Fetch the current list of valid breed names.
  pub async fn breeds(&self) -> agency_core::Result<Vec<String>> {
    let resp = self.client.get(&self.url).send().await.map_err(|e| {
      tracing::warn!(url = %self.url, error = %e, "breed catalog unreachable");
      CoreError::CatalogUnreachable
    })?;

    if !resp.status().is_success() {
      tracing::warn!(url = %self.url, status = %resp.status(), "breed catalog returned an error");
      return Err(CoreError::CatalogUnavailable);
    }

    let entries: Vec<BreedEntry> = resp.json().await.map_err(|e| {
      tracing::warn!(url = %self.url, error = %e, "unreadable breed catalog response");
      if e.is_timeout() {
        CoreError::CatalogUnreachable
      } else {
        CoreError::CatalogUnavailable
      }
    })?;

    Ok(entries.into_iter().map(|b| b.name).collect())
  }
}

impl BreedCatalog for HttpBreedCatalog {
  async fn check_breed(&self, breed: &str) -> agency_core::Result<()> {
    crate::lookup(breed, self.breeds().await?)
  }
}
