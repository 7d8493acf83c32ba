//! Error type for `facility-store-aws`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A DynamoDB call failed. `message` carries the full SDK error context.
  #[error("dynamodb {operation} on table {table:?} failed: {message}")]
  Dynamo {
    operation: &'static str,
    table:     String,
    message:   String,
  },

  #[error("s3 upload of {key:?} to bucket {bucket:?} failed: {message}")]
  S3 {
    bucket:  String,
    key:     String,
    message: String,
  },

  /// The stored item holds an attribute kind the catalog never writes.
  #[error("attribute {attribute:?} has unsupported type {kind}")]
  UnsupportedAttribute {
    attribute: String,
    kind:      &'static str,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
