//! Handlers shared by every resource path.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `POST`   | `/<resource>` | Body: the record. Returns the persisted record |
//! | `GET`    | `/<resource>` | Optional `?id=`; without it, every record |
//! | `PUT`    | `/<resource>` | Body: identity plus the fields to change |
//! | `DELETE` | `/<resource>` | `?id=` required |

use axum::{
  Json,
  body::Bytes,
  extract::{
    Query, State,
    rejection::{BytesRejection, QueryRejection},
  },
  response::{IntoResponse, Response},
};
use facility_core::{
  resource::Resource,
  store::{ObjectStore, TableStore},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;

use crate::{ApiError, Catalog};

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
  pub id: Option<String>,
}

impl IdQuery {
  /// The `id` parameter, treating an empty value as absent.
  fn id(&self) -> Option<&str> { self.id.as_deref().filter(|id| !id.is_empty()) }
}

fn parse_body<B: DeserializeOwned>(
  body: Result<Bytes, BytesRejection>,
) -> Result<B, ApiError> {
  let body = body.map_err(|e| {
    ApiError::Validation(format!("Error reading request body: {}", e.body_text()))
  })?;
  serde_json::from_slice(&body)
    .map_err(|e| ApiError::Validation(format!("Error parsing JSON body: {e}")))
}

fn parse_query(query: Result<Query<IdQuery>, QueryRejection>) -> Result<IdQuery, ApiError> {
  query.map(|Query(query)| query).map_err(|e| {
    ApiError::Validation(format!("Error parsing query string: {}", e.body_text()))
  })
}

fn message(text: String) -> Json<serde_json::Value> { Json(json!({ "message": text })) }

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /<resource>`
pub async fn create<R, T, O>(
  State(catalog): State<Catalog<T, O>>,
  body: Result<Bytes, BytesRejection>,
) -> Result<Json<R>, ApiError>
where
  R: Resource,
  T: TableStore,
  O: ObjectStore,
{
  let record: R = parse_body(body)?;
  Ok(Json(catalog.create(record).await?))
}

// ─── Read ────────────────────────────────────────────────────────────────────

/// `GET /<resource>[?id=<id>]`
pub async fn read<R, T, O>(
  State(catalog): State<Catalog<T, O>>,
  query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Response, ApiError>
where
  R: Resource,
  T: TableStore,
  O: ObjectStore,
{
  let query = parse_query(query)?;
  match query.id() {
    Some(id) => Ok(Json(catalog.read_one::<R>(id).await?).into_response()),
    None => Ok(Json(catalog.read_all::<R>().await?).into_response()),
  }
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// `PUT /<resource>`
pub async fn update<R, T, O>(
  State(catalog): State<Catalog<T, O>>,
  body: Result<Bytes, BytesRejection>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  R: Resource,
  T: TableStore,
  O: ObjectStore,
{
  let patch: R::Patch = parse_body(body)?;
  Ok(message(catalog.update::<R>(patch).await?))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// `DELETE /<resource>?id=<id>`
pub async fn delete<R, T, O>(
  State(catalog): State<Catalog<T, O>>,
  query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  R: Resource,
  T: TableStore,
  O: ObjectStore,
{
  let query = parse_query(query)?;
  let id = query
    .id()
    .ok_or_else(|| ApiError::Validation("id query parameter is required".into()))?;
  Ok(message(catalog.delete::<R>(id).await?))
}
