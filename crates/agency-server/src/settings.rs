//! Server configuration: an optional TOML file layered under `AGENCY_*`
//! environment variables.

use std::path::{Path, PathBuf};

use agency_catalog::CatalogConfig;
use anyhow::Context as _;
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::{Deserialize, Serialize};

/// Runtime server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  /// SQLite database file; a leading `~/` is expanded at startup.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub catalog:    CatalogConfig,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("agency.sqlite3") }

impl ServerConfig {
  /// Read `path` (if it exists), then apply environment overrides such as
  /// `AGENCY_PORT=9000` or `AGENCY_CATALOG__TIMEOUT_SECS=5`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    Self::build(
      Config::builder()
        .add_source(File::from(path.to_path_buf()).required(false))
        .add_source(
          Environment::with_prefix("AGENCY")
            .prefix_separator("_")
            .separator("__"),
        ),
    )
  }

  fn build(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<Self> {
    builder
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use config::FileFormat;

  use super::*;

  fn from_toml(text: &str) -> ServerConfig {
    ServerConfig::build(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
      .unwrap()
  }

  #[test]
  fn empty_file_gives_defaults() {
    let cfg = from_toml("");
    assert_eq!(cfg.address(), "127.0.0.1:8000");
    assert_eq!(cfg.store_path, PathBuf::from("agency.sqlite3"));
    assert_eq!(cfg.catalog.base_url, "https://api.thecatapi.com");
    assert_eq!(cfg.catalog.timeout_secs, 10);
  }

  #[test]
  fn nested_catalog_settings() {
    let cfg = from_toml(
      r#"
      port = 9001
      store_path = "/var/lib/agency/db.sqlite3"

      [catalog]
      timeout_secs   = 3
      offline_breeds = ["Bengal", "Siamese"]
      "#,
    );
    assert_eq!(cfg.port, 9001);
    assert_eq!(cfg.catalog.timeout_secs, 3);
    assert_eq!(cfg.catalog.base_url, "https://api.thecatapi.com");
    assert_eq!(
      cfg.catalog.offline_breeds.as_deref(),
      Some(&["Bengal".to_string(), "Siamese".to_string()][..])
    );
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    let plain = Path::new("data/agency.sqlite3");
    assert_eq!(expand_tilde(plain), plain);

    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/agency.sqlite3")),
        PathBuf::from(home).join("agency.sqlite3")
      );
    }
  }
}
