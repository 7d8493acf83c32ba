//! [`ObjectStore`] on S3.

use aws_config::SdkConfig;
use aws_sdk_s3::{Client, error::DisplayErrorContext, primitives::ByteStream};
use bytes::Bytes;
use facility_core::store::ObjectStore;
use tracing::{info, instrument};

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
  client: Client,
  bucket: String,
}

impl S3ObjectStore {
  pub fn new(client: Client, bucket: impl Into<String>) -> Self {
    Self {
      client,
      bucket: bucket.into(),
    }
  }

  /// Build a client from shared AWS config. `endpoint_url` and
  /// `force_path_style` are for MinIO and LocalStack.
  pub fn from_sdk_config(
    sdk_config: &SdkConfig,
    bucket: impl Into<String>,
    endpoint_url: Option<&str>,
    force_path_style: bool,
  ) -> Self {
    let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);
    if let Some(endpoint_url) = endpoint_url {
      builder = builder.endpoint_url(endpoint_url);
    }
    if force_path_style {
      builder = builder.force_path_style(true);
    }
    Self::new(Client::from_conf(builder.build()), bucket)
  }

  pub fn bucket(&self) -> &str { &self.bucket }
}

impl ObjectStore for S3ObjectStore {
  type Error = Error;

  #[instrument(skip(self, body), fields(bucket = %self.bucket, bytes = body.len()))]
  async fn put_object(&self, key: &str, content_type: &str, body: Bytes) -> Result<()> {
    self
      .client
      .put_object()
      .bucket(&self.bucket)
      .key(key)
      .content_type(content_type)
      .body(ByteStream::from(body))
      .send()
      .await
      .map_err(|e| Error::S3 {
        bucket:  self.bucket.clone(),
        key:     key.to_owned(),
        message: DisplayErrorContext(&e).to_string(),
      })?;

    info!("object uploaded");
    Ok(())
  }
}
