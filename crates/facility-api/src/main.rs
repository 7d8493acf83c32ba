//! facility-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), overlays
//! `FACILITY__*` environment variables, binds the configured backend, and
//! serves the catalog over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use facility_api::{
  Catalog, ServerConfig,
  config::Backend,
  memory_table_store,
};
use facility_core::memory::MemoryObjectStore;
use facility_store_aws::{DynamoTableStore, S3ObjectStore};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Facility catalog server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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
  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;
  let limits = cfg.limits();

  let app: Router = match cfg.backend {
    Backend::Aws => {
      let sdk_config = facility_store_aws::load_sdk_config(&cfg.aws.region).await;
      let endpoint_url = cfg.aws.endpoint_url.as_deref();
      let tables = DynamoTableStore::from_sdk_config(&sdk_config, endpoint_url);
      let objects = S3ObjectStore::from_sdk_config(
        &sdk_config,
        cfg.assets.bucket.clone(),
        endpoint_url,
        cfg.aws.force_path_style,
      );
      tracing::info!(
        region = %cfg.aws.region,
        bucket = %cfg.assets.bucket,
        "using AWS backend"
      );
      let catalog = Catalog::new(
        Arc::new(tables),
        Arc::new(objects),
        cfg.tables.clone(),
        cfg.assets.locator(),
        cfg.upload_concurrency,
      );
      facility_api::router(catalog, limits)
    }
    Backend::Memory => {
      tracing::warn!("using in-memory backend; data is lost on exit");
      let catalog = Catalog::new(
        Arc::new(memory_table_store(&cfg.tables)),
        Arc::new(MemoryObjectStore::new()),
        cfg.tables.clone(),
        cfg.assets.locator(),
        cfg.upload_concurrency,
      );
      facility_api::router(catalog, limits)
    }
  };

  let address = format!("{}:{}", cfg.host, cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
