//! Server configuration, read from a TOML file layered with `FACILITY__*`
//! environment variables.

use std::{path::Path, time::Duration};

use facility_core::{ingest::AssetLocator, resource::ResourceKind};
use serde::Deserialize;

use crate::Limits;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// Deadline applied to each request, store calls included.
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
  /// Maximum uploads in flight for one record.
  #[serde(default = "default_upload_concurrency")]
  pub upload_concurrency:   usize,
  /// Largest accepted request body. Inline binaries count towards it.
  #[serde(default = "default_max_body_bytes")]
  pub max_body_bytes:       usize,
  #[serde(default)]
  pub backend:              Backend,
  #[serde(default)]
  pub aws:                  AwsConfig,
  #[serde(default)]
  pub tables:               TableNames,
  #[serde(default)]
  pub assets:               AssetConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Aws,
  /// Process-local tables and objects; nothing survives a restart.
  Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AwsConfig {
  #[serde(default = "default_region")]
  pub region:           String,
  /// Custom endpoint for LocalStack, MinIO or DynamoDB Local.
  #[serde(default)]
  pub endpoint_url:     Option<String>,
  #[serde(default)]
  pub force_path_style: bool,
}

impl Default for AwsConfig {
  fn default() -> Self {
    Self {
      region:           default_region(),
      endpoint_url:     None,
      force_path_style: false,
    }
  }
}

/// Table name per resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TableNames {
  pub factory:     String,
  pub floorplan:   String,
  pub asset:       String,
  pub measurement: String,
  pub property:    String,
  pub model:       String,
}

impl Default for TableNames {
  fn default() -> Self {
    Self {
      factory:     "Factory".into(),
      floorplan:   "Floorplan".into(),
      asset:       "Asset".into(),
      measurement: "Measurement".into(),
      property:    "Property".into(),
      model:       "Model".into(),
    }
  }
}

impl TableNames {
  pub fn get(&self, kind: ResourceKind) -> &str {
    match kind {
      ResourceKind::Factory => &self.factory,
      ResourceKind::Floorplan => &self.floorplan,
      ResourceKind::Asset => &self.asset,
      ResourceKind::Measurement => &self.measurement,
      ResourceKind::Property => &self.property,
      ResourceKind::Model => &self.model,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
  #[serde(default = "default_bucket")]
  pub bucket:          String,
  /// Root of stored object URLs. Defaults to the bucket's S3 address.
  #[serde(default)]
  pub public_base_url: Option<String>,
}

impl Default for AssetConfig {
  fn default() -> Self {
    Self {
      bucket:          default_bucket(),
      public_base_url: None,
    }
  }
}

impl AssetConfig {
  pub fn locator(&self) -> AssetLocator {
    match &self.public_base_url {
      Some(base_url) => AssetLocator::with_base_url(base_url),
      None => AssetLocator::for_bucket(&self.bucket),
    }
  }
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 8080 }

fn default_request_timeout_secs() -> u64 { 30 }

fn default_upload_concurrency() -> usize { 4 }

fn default_max_body_bytes() -> usize { 10 * 1024 * 1024 }

fn default_region() -> String { "us-east-2".to_string() }

fn default_bucket() -> String { "facility-assets".to_string() }

impl ServerConfig {
  /// Read `path` (optional) and overlay `FACILITY__*` variables, e.g.
  /// `FACILITY__AWS__REGION` or `FACILITY__TABLES__ASSET`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("FACILITY")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn limits(&self) -> Limits {
    Limits {
      request_timeout: Duration::from_secs(self.request_timeout_secs),
      max_body_bytes:  self.max_body_bytes,
    }
  }
}
