//! agency server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the JSON API over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc};

use agency_catalog::{HttpBreedCatalog, StaticBreedCatalog};
use agency_store_sqlite::SqliteStore;
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "Agency mission server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the resolved configuration as JSON and exit.
  #[arg(long)]
  print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  if cli.print_config {
    println!("{}", serde_json::to_string_pretty(&server_cfg)?);
    return Ok(());
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = Arc::new(
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))?,
  );

  let app = match &server_cfg.catalog.offline_breeds {
    Some(names) => {
      tracing::info!(breeds = names.len(), "using offline breed list");
      agency_api::api_router(store, Arc::new(StaticBreedCatalog::new(names.clone())))
    }
    None => {
      let catalog = HttpBreedCatalog::from_config(&server_cfg.catalog)
        .context("failed to set up breed catalog client")?;
      tracing::info!(url = %server_cfg.catalog.base_url, "using remote breed catalog");
      agency_api::api_router(store, Arc::new(catalog))
    }
  }
  .layer(TraceLayer::new_for_http());

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
