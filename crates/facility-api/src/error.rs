//! API error type and [`axum::response::IntoResponse`] implementation.

use std::time::Duration;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// A lifecycle failure, already phrased for the caller.
#[derive(Debug, Error)]
pub enum ApiError {
  /// Malformed or missing input.
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  /// The request outlived its deadline.
  #[error("request timed out after {0:?}")]
  Timeout(Duration),

  /// A store, object store, or codec failure.
  #[error("{context}: {source}")]
  Dependency {
    context: String,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn dependency(
    context: impl Into<String>,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self::Dependency {
      context: context.into(),
      source:  source.into(),
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::Validation(_) => StatusCode::BAD_REQUEST,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
      Self::Dependency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    match &self {
      Self::Dependency { .. } => tracing::error!(error = %self, "request failed"),
      Self::Timeout(_) => tracing::warn!(error = %self, "request cut off"),
      _ => {}
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
