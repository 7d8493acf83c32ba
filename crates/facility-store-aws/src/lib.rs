//! AWS backends for the facility catalog: records in DynamoDB, binary assets
//! in S3.

mod convert;
mod dynamo;
mod s3;

pub mod error;

use aws_config::{BehaviorVersion, Region, SdkConfig};

pub use dynamo::DynamoTableStore;
pub use error::{Error, Result};
pub use s3::S3ObjectStore;

/// Load shared AWS configuration (credentials chain, retries) for `region`.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
  aws_config::defaults(BehaviorVersion::latest())
    .region(Region::new(region.to_owned()))
    .load()
    .await
}
