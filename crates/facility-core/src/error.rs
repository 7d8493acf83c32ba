//! Error types for `facility-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing attribute {0:?}")]
  MissingAttribute(String),

  #[error("attribute {attribute:?} is not of type {expected}")]
  AttributeType {
    attribute: String,
    expected:  &'static str,
  },

  #[error("attribute {attribute:?} holds an invalid number: {value:?}")]
  InvalidNumber { attribute: String, value: String },

  #[error("attribute {attribute:?} holds {value:e}, outside the storable number range")]
  NumberOutOfRange { attribute: String, value: f64 },

  #[error("attribute {attribute:?} holds an invalid timestamp: {message}")]
  InvalidTimestamp { attribute: String, message: String },

  #[error("update has no fields to set")]
  EmptyUpdate,

  #[error("invalid attribute path {0:?}")]
  InvalidAttributePath(String),

  #[error("error decoding {kind} data: {source}")]
  Decode {
    kind:   &'static str,
    #[source]
    source: base64::DecodeError,
  },

  #[error("error uploading {key} to object storage: {source}")]
  Upload {
    key:    String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
