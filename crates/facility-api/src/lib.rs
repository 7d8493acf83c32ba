//! JSON HTTP surface for the facility catalog.
//!
//! Exposes an axum [`Router`] backed by any [`TableStore`] and
//! [`ObjectStore`]. Each resource lives at its own path and supports create,
//! read, update and delete; see [`handlers`].
//!
//! Every response is JSON and carries a permissive cross-origin policy.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;

use std::time::Duration;

use axum::{
  Router,
  extract::{DefaultBodyLimit, Request, State},
  http::{HeaderValue, header},
  middleware::{self, Next},
  response::{IntoResponse as _, Response},
  routing::{MethodRouter, get},
};
use facility_core::{
  memory::MemoryTableStore,
  resource::Resource,
  resources::{Asset, Factory, Floorplan, Measurement, Model, Property},
  store::{ObjectStore, TableStore},
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub use catalog::Catalog;
pub use config::ServerConfig;
pub use error::ApiError;

use crate::config::TableNames;

/// An in-memory table store with every catalog table declared.
pub fn memory_table_store(names: &TableNames) -> MemoryTableStore {
  fn declare<R: Resource>(store: MemoryTableStore, names: &TableNames) -> MemoryTableStore {
    store.with_table(names.get(R::KIND), R::KEY_ATTRIBUTE)
  }

  let store = MemoryTableStore::new();
  let store = declare::<Factory>(store, names);
  let store = declare::<Floorplan>(store, names);
  let store = declare::<Asset>(store, names);
  let store = declare::<Measurement>(store, names);
  let store = declare::<Property>(store, names);
  declare::<Model>(store, names)
}

fn resource<R, T, O>() -> MethodRouter<Catalog<T, O>>
where
  R: Resource,
  T: TableStore + 'static,
  O: ObjectStore + 'static,
{
  get(handlers::read::<R, T, O>)
    .post(handlers::create::<R, T, O>)
    .put(handlers::update::<R, T, O>)
    .delete(handlers::delete::<R, T, O>)
}

/// Per-request bounds applied by [`router`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
  pub request_timeout: Duration,
  pub max_body_bytes:  usize,
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      request_timeout: Duration::from_secs(30),
      max_body_bytes:  10 * 1024 * 1024,
    }
  }
}

/// Answers with a JSON 408 once `limit` elapses. Dropping the inner future
/// cancels any store call in flight.
async fn deadline(State(limit): State<Duration>, request: Request, next: Next) -> Response {
  match tokio::time::timeout(limit, next.run(request)).await {
    Ok(response) => response,
    Err(_) => ApiError::Timeout(limit).into_response(),
  }
}

/// Build the catalog router.
pub fn router<T, O>(catalog: Catalog<T, O>, limits: Limits) -> Router
where
  T: TableStore + 'static,
  O: ObjectStore + 'static,
{
  Router::new()
    .route("/factories",    resource::<Factory, T, O>())
    .route("/floorplans",   resource::<Floorplan, T, O>())
    .route("/assets",       resource::<Asset, T, O>())
    .route("/measurements", resource::<Measurement, T, O>())
    .route("/properties",   resource::<Property, T, O>())
    .route("/models",       resource::<Model, T, O>())
    .fallback(|| async { ApiError::NotFound("no such resource path".into()) })
    .with_state(catalog)
    .layer(DefaultBodyLimit::max(limits.max_body_bytes))
    .layer(middleware::from_fn_with_state(limits.request_timeout, deadline))
    .layer(TraceLayer::new_for_http())
    .layer(SetResponseHeaderLayer::if_not_present(
      header::CONTENT_TYPE,
      HeaderValue::from_static("application/json"),
    ))
    .layer(SetResponseHeaderLayer::overriding(
      header::ACCESS_CONTROL_ALLOW_ORIGIN,
      HeaderValue::from_static("*"),
    ))
    .layer(SetResponseHeaderLayer::overriding(
      header::ACCESS_CONTROL_ALLOW_METHODS,
      HeaderValue::from_static("*"),
    ))
}

#[cfg(test)]
mod tests;
