//! Router tests against the in-memory capability implementations and
//! failure-injecting wrappers.

use std::{io, sync::Arc, time::Duration};

use axum::{
  body::Body,
  http::{HeaderMap, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use bytes::Bytes;
use facility_core::{
  attr::{AttributeValue, Item, Key},
  ingest::AssetLocator,
  memory::{MemoryObjectStore, MemoryTableStore},
  resources::{Asset, Factory},
  store::{ObjectStore, TableStore, UpdateOutcome},
  update::UpdateExpression,
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{Catalog, Limits, config::TableNames, memory_table_store, router};

// ─── Fixtures ────────────────────────────────────────────────────────────────

const BUCKET_URL: &str = "https://bucket.s3.amazonaws.com";

fn catalog_with<T, O>(tables: T, objects: O) -> Catalog<T, O>
where
  T: TableStore,
  O: ObjectStore,
{
  Catalog::new(
    Arc::new(tables),
    Arc::new(objects),
    TableNames::default(),
    AssetLocator::for_bucket("bucket"),
    4,
  )
}

fn catalog() -> Catalog<MemoryTableStore, MemoryObjectStore> {
  catalog_with(
    memory_table_store(&TableNames::default()),
    MemoryObjectStore::new(),
  )
}

struct Reply {
  status:  StatusCode,
  headers: HeaderMap,
  body:    Value,
}

async fn send_with_limits<T, O>(
  catalog: &Catalog<T, O>,
  method: &str,
  uri: &str,
  body: Option<Value>,
  limits: Limits,
) -> Reply
where
  T: TableStore + 'static,
  O: ObjectStore + 'static,
{
  let body = body.map(|b| b.to_string()).unwrap_or_default();
  let req = Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body))
    .unwrap();
  let resp = router(catalog.clone(), limits).oneshot(req).await.unwrap();

  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  Reply {
    status,
    headers,
    body,
  }
}

async fn send<T, O>(
  catalog: &Catalog<T, O>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> Reply
where
  T: TableStore + 'static,
  O: ObjectStore + 'static,
{
  send_with_limits(catalog, method, uri, body, Limits::default()).await
}

async fn send_raw(
  catalog: &Catalog<MemoryTableStore, MemoryObjectStore>,
  method: &str,
  uri: &str,
  body: &str,
) -> Reply {
  let req = Request::builder()
    .method(method)
    .uri(uri)
    .body(Body::from(body.to_owned()))
    .unwrap();
  let resp = router(catalog.clone(), Limits::default())
    .oneshot(req)
    .await
    .unwrap();
  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  Reply {
    status,
    headers,
    body: serde_json::from_slice(&bytes).unwrap(),
  }
}

async fn stored(
  catalog: &Catalog<MemoryTableStore, MemoryObjectStore>,
  table: &str,
  key: &str,
  id: &str,
) -> Option<Item> {
  catalog
    .tables()
    .get_item(table, &Key::new(key, id))
    .await
    .unwrap()
}

fn short_deadline() -> Limits {
  Limits {
    request_timeout: Duration::from_millis(50),
    ..Limits::default()
  }
}

fn error_text(reply: &Reply) -> &str { reply.body["error"].as_str().unwrap_or_default() }

/// Object store that refuses keys under `fail_prefix`.
struct FailingObjects {
  inner:       MemoryObjectStore,
  fail_prefix: &'static str,
}

impl ObjectStore for FailingObjects {
  type Error = io::Error;

  async fn put_object(&self, key: &str, content_type: &str, body: Bytes) -> io::Result<()> {
    if key.starts_with(self.fail_prefix) {
      return Err(io::Error::other("object store unavailable"));
    }
    self
      .inner
      .put_object(key, content_type, body)
      .await
      .map_err(io::Error::other)
  }
}

/// Table store whose every call fails.
struct BrokenTables;

fn unavailable() -> io::Error { io::Error::other("table store unavailable") }

impl TableStore for BrokenTables {
  type Error = io::Error;

  async fn get_item(&self, _table: &str, _key: &Key) -> io::Result<Option<Item>> {
    Err(unavailable())
  }

  async fn put_item(&self, _table: &str, _item: Item) -> io::Result<()> { Err(unavailable()) }

  async fn update_item(
    &self,
    _table: &str,
    _key: &Key,
    _update: &UpdateExpression,
  ) -> io::Result<UpdateOutcome> {
    Err(unavailable())
  }

  async fn delete_item(&self, _table: &str, _key: &Key) -> io::Result<()> { Err(unavailable()) }

  async fn scan(&self, _table: &str) -> io::Result<Vec<Item>> { Err(unavailable()) }
}

/// Table store that never answers within a test's patience.
struct StalledTables;

impl TableStore for StalledTables {
  type Error = io::Error;

  async fn get_item(&self, _table: &str, _key: &Key) -> io::Result<Option<Item>> {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Ok(None)
  }

  async fn put_item(&self, _table: &str, _item: Item) -> io::Result<()> { Ok(()) }

  async fn update_item(
    &self,
    _table: &str,
    _key: &Key,
    _update: &UpdateExpression,
  ) -> io::Result<UpdateOutcome> {
    Ok(UpdateOutcome::Missing)
  }

  async fn delete_item(&self, _table: &str, _key: &Key) -> io::Result<()> { Ok(()) }

  async fn scan(&self, _table: &str) -> io::Result<Vec<Item>> { Ok(Vec::new()) }
}

fn factory(id: &str) -> Value {
  json!({
    "factoryId": id,
    "name": "North Plant",
    "location": { "longitude": -83.0, "latitude": 42.3 },
    "description": "Stamping"
  })
}

// ─── Floorplan ingestion ─────────────────────────────────────────────────────

#[tokio::test]
async fn create_floorplan_uploads_image_and_stores_url() {
  let c = catalog();
  let reply = send(
    &c,
    "POST",
    "/floorplans",
    Some(json!({ "floorplanId": "1", "factoryId": "1", "imageData": B64.encode(b"jpeg bytes") })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::OK);
  let url = format!("{BUCKET_URL}/floorplans/1.jpg");
  assert_eq!(reply.body["imageData"], url.as_str());

  let item = stored(&c, "Floorplan", "floorplanId", "1").await.unwrap();
  assert_eq!(item["imageData"], AttributeValue::S(url));

  let object = c.objects().get("floorplans/1.jpg").unwrap();
  assert_eq!(object.content_type, "image/jpeg");
  assert_eq!(&object.body[..], b"jpeg bytes");
}

#[tokio::test]
async fn create_floorplan_with_undecodable_image_fails_without_side_effects() {
  let c = catalog();
  let reply = send(
    &c,
    "POST",
    "/floorplans",
    Some(json!({ "floorplanId": "1", "factoryId": "1", "imageData": "test image" })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(error_text(&reply).contains("decoding image data"), "{}", reply.body);
  assert!(c.objects().is_empty());
  assert!(c.tables().is_empty("Floorplan"));
}

#[tokio::test]
async fn create_floorplan_with_non_string_image_is_a_bad_request() {
  let c = catalog();
  let reply = send(
    &c,
    "POST",
    "/floorplans",
    Some(json!({ "floorplanId": "1", "factoryId": "1", "imageData": 1 })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(error_text(&reply).starts_with("Error parsing JSON body"));
}

#[tokio::test]
async fn reingesting_overwrites_the_same_key() {
  let c = catalog();
  for payload in [&b"first"[..], &b"second, longer"[..]] {
    let reply = send(
      &c,
      "POST",
      "/floorplans",
      Some(json!({ "floorplanId": "7", "factoryId": "1", "imageData": B64.encode(payload) })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["imageData"], format!("{BUCKET_URL}/floorplans/7.jpg"));
  }

  assert_eq!(c.objects().keys(), vec!["floorplans/7.jpg".to_string()]);
  assert_eq!(&c.objects().get("floorplans/7.jpg").unwrap().body[..], b"second, longer");
}

// ─── Asset ingestion ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_asset_generates_identity_used_as_key() {
  let c = catalog();
  let reply = send(
    &c,
    "POST",
    "/assets",
    Some(json!({
      "assetId": "caller-chosen",
      "name": "Lathe",
      "imageData": B64.encode(b"photo"),
      "modelUrl": B64.encode(b"glb"),
    })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::OK);
  let id = reply.body["assetId"].as_str().unwrap().to_owned();
  assert_ne!(id, "caller-chosen");
  assert!(uuid::Uuid::parse_str(&id).is_ok());

  let item = stored(&c, "Asset", "assetId", &id).await.unwrap();
  assert_eq!(item["assetId"], AttributeValue::S(id.clone()));
  assert_eq!(
    item["imageData"],
    AttributeValue::S(format!("{BUCKET_URL}/assets/{id}.jpg"))
  );
  assert_eq!(
    item["modelUrl"],
    AttributeValue::S(format!("{BUCKET_URL}/models/{id}.glb"))
  );
  assert_eq!(
    c.objects().get(&format!("models/{id}.glb")).unwrap().content_type,
    "model/gltf-binary"
  );
}

#[tokio::test]
async fn create_asset_without_binaries_uploads_nothing() {
  let c = catalog();
  let reply = send(&c, "POST", "/assets", Some(json!({ "name": "Press" }))).await;

  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["imageData"], "");
  assert!(reply.body.get("modelUrl").is_none());
  assert!(c.objects().is_empty());
  assert_eq!(c.tables().len("Asset"), 1);
}

#[tokio::test]
async fn failed_second_upload_never_writes_the_record() {
  let tables = memory_table_store(&TableNames::default());
  let objects = FailingObjects {
    inner:       MemoryObjectStore::new(),
    fail_prefix: "models/",
  };
  let c = catalog_with(tables, objects);

  let reply = send(
    &c,
    "POST",
    "/assets",
    Some(json!({ "imageData": B64.encode(b"photo"), "modelUrl": B64.encode(b"glb") })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(error_text(&reply).contains("object store unavailable"));
  assert!(c.tables().is_empty("Asset"));
}

fn assert_send<F: Send>(_: &F) {}

#[test]
fn lifecycle_futures_are_send() {
  let c = catalog();
  let asset: Asset = serde_json::from_value(json!({ "name": "Lathe" })).unwrap();
  assert_send(&c.create(asset));
  assert_send(&c.read_all::<Factory>());
  assert_send(&c.delete::<Factory>("1"));
}

#[tokio::test]
async fn large_model_within_body_limit_is_ingested() {
  let c = catalog();
  let model = vec![7u8; 3 * 1024 * 1024];
  let reply = send(
    &c,
    "POST",
    "/assets",
    Some(json!({ "name": "Press", "modelUrl": B64.encode(&model) })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::OK, "{}", reply.body);
  let id = reply.body["assetId"].as_str().unwrap();
  let object = c.objects().get(&format!("models/{id}.glb")).unwrap();
  assert_eq!(object.body.len(), model.len());
  assert_eq!(c.tables().len("Asset"), 1);
}

#[tokio::test]
async fn body_over_limit_is_a_json_bad_request() {
  let c = catalog();
  let limits = Limits {
    max_body_bytes: 1024,
    ..Limits::default()
  };
  let reply = send_with_limits(
    &c,
    "POST",
    "/assets",
    Some(json!({ "imageData": B64.encode(vec![0u8; 4096]) })),
    limits,
  )
  .await;

  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert_eq!(reply.headers[header::CONTENT_TYPE], "application/json");
  assert!(error_text(&reply).starts_with("Error reading request body"), "{}", reply.body);
  assert!(c.objects().is_empty());
  assert!(c.tables().is_empty("Asset"));
}

// ─── Read ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn read_without_id_returns_every_record() {
  let c = catalog();
  for id in ["1", "2"] {
    let reply = send(&c, "POST", "/factories", Some(factory(id))).await;
    assert_eq!(reply.status, StatusCode::OK);
  }

  let reply = send(&c, "GET", "/factories", None).await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn read_missing_id_is_not_found() {
  let c = catalog();
  let reply = send(&c, "GET", "/factories?id=missing", None).await;

  assert_eq!(reply.status, StatusCode::NOT_FOUND);
  assert_eq!(error_text(&reply), "Factory with ID missing not found");
}

#[tokio::test]
async fn read_by_id_returns_created_record() {
  let c = catalog();
  let created = send(&c, "POST", "/factories", Some(factory("1"))).await;
  let reply = send(&c, "GET", "/factories?id=1", None).await;

  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body, created.body);
  assert_eq!(reply.body["location"]["latitude"], 42.3);
}

#[tokio::test]
async fn store_failure_is_a_server_error() {
  let c = catalog_with(BrokenTables, MemoryObjectStore::new());

  let reply = send(&c, "GET", "/factories", None).await;
  assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(error_text(&reply).contains("table store unavailable"));

  let reply = send(&c, "POST", "/factories", Some(factory("1"))).await;
  assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn slow_store_call_is_cut_off_by_the_deadline() {
  let c = catalog_with(StalledTables, MemoryObjectStore::new());
  let reply = send_with_limits(&c, "GET", "/factories?id=1", None, short_deadline()).await;

  assert_eq!(reply.status, StatusCode::REQUEST_TIMEOUT);
  assert_eq!(error_text(&reply), "request timed out after 50ms");
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_touches_only_supplied_fields() {
  let c = catalog();
  send(&c, "POST", "/factories", Some(factory("1"))).await;
  let before = stored(&c, "Factory", "factoryId", "1").await.unwrap();

  let reply = send(
    &c,
    "PUT",
    "/factories",
    Some(json!({ "factoryId": "1", "description": "new" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["message"], "factoryId 1 updated successfully");

  let after = stored(&c, "Factory", "factoryId", "1").await.unwrap();
  assert_eq!(after["description"], AttributeValue::S("new".into()));
  for (name, value) in &before {
    if name != "description" {
      assert_eq!(&after[name], value, "{name} changed");
    }
  }
  assert_eq!(after.len(), before.len());
}

#[tokio::test]
async fn every_field_subset_updates_only_those_fields() {
  let c = catalog();
  for mask in 1u8..16 {
    let id = mask.to_string();
    send(&c, "POST", "/factories", Some(factory(&id))).await;
    let mut expected = stored(&c, "Factory", "factoryId", &id).await.unwrap();

    let mut patch = json!({ "factoryId": id });
    let mut location = serde_json::Map::new();
    if mask & 1 != 0 {
      patch["name"] = json!("Renamed");
      expected.insert("name".into(), AttributeValue::S("Renamed".into()));
    }
    if mask & 2 != 0 {
      patch["description"] = json!("Welding");
      expected.insert("description".into(), AttributeValue::S("Welding".into()));
    }
    if let Some(AttributeValue::M(stored_location)) = expected.get_mut("location") {
      if mask & 4 != 0 {
        location.insert("longitude".into(), json!(1.5));
        stored_location.insert("longitude".into(), AttributeValue::number(1.5));
      }
      if mask & 8 != 0 {
        location.insert("latitude".into(), json!(-7.25));
        stored_location.insert("latitude".into(), AttributeValue::number(-7.25));
      }
    }
    if !location.is_empty() {
      patch["location"] = Value::Object(location);
    }

    let reply = send(&c, "PUT", "/factories", Some(patch)).await;
    assert_eq!(reply.status, StatusCode::OK, "mask {mask}: {}", reply.body);
    let after = stored(&c, "Factory", "factoryId", &id).await.unwrap();
    assert_eq!(after, expected, "mask {mask}");
  }
}

#[tokio::test]
async fn update_of_one_coordinate_keeps_the_other() {
  let c = catalog();
  let created = send(
    &c,
    "POST",
    "/assets",
    Some(json!({ "name": "Lathe", "floorplanCoords": { "longitude": 0.25, "latitude": 0.5 } })),
  )
  .await;
  let id = created.body["assetId"].as_str().unwrap().to_owned();

  let reply = send(
    &c,
    "PUT",
    "/assets",
    Some(json!({ "assetId": id, "floorplanCoords": { "latitude": 0.75 } })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);

  let reply = send(&c, "GET", &format!("/assets?id={id}"), None).await;
  assert_eq!(reply.body["floorplanCoords"], json!({ "longitude": 0.25, "latitude": 0.75 }));
  assert_eq!(reply.body["name"], "Lathe");
}

#[tokio::test]
async fn update_sets_coordinates_on_record_created_without_location() {
  let c = catalog();
  send(&c, "POST", "/factories", Some(json!({ "factoryId": "1" }))).await;

  let reply = send(
    &c,
    "PUT",
    "/factories",
    Some(json!({ "factoryId": "1", "location": { "longitude": 12.5 } })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);

  let reply = send(&c, "GET", "/factories?id=1", None).await;
  assert_eq!(reply.body["location"], json!({ "longitude": 12.5 }));
}

#[tokio::test]
async fn update_with_no_fields_is_rejected() {
  let c = catalog();
  send(&c, "POST", "/factories", Some(factory("1"))).await;
  let before = stored(&c, "Factory", "factoryId", "1").await;

  let reply = send(&c, "PUT", "/factories", Some(json!({ "factoryId": "1" }))).await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(error_text(&reply).contains("no fields to set"));
  assert_eq!(stored(&c, "Factory", "factoryId", "1").await, before);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
  let c = catalog();
  let reply = send(
    &c,
    "PUT",
    "/measurements",
    Some(json!({ "measurementId": "ghost", "frequency": 2 })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::NOT_FOUND);
  assert!(error_text(&reply).contains("ghost"));
  assert!(c.tables().is_empty("Measurement"));
}

#[tokio::test]
async fn update_cannot_change_identity_or_creation_time() {
  let c = catalog();
  send(
    &c,
    "POST",
    "/properties",
    Some(json!({ "propertyId": "p", "measurementId": "m", "name": "Temp", "value": 1.0, "unit": "C" })),
  )
  .await;
  let before = stored(&c, "Property", "propertyId", "p").await.unwrap();

  let reply = send(
    &c,
    "PUT",
    "/properties",
    Some(json!({ "propertyId": "p", "dateCreated": "2000-01-01T00:00:00Z", "value": 2.5 })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);

  let after = stored(&c, "Property", "propertyId", "p").await.unwrap();
  assert_eq!(after["dateCreated"], before["dateCreated"]);
  assert_eq!(after["value"], AttributeValue::N("2.5".into()));
}

#[tokio::test]
async fn update_replaces_model_lists() {
  let c = catalog();
  send(
    &c,
    "POST",
    "/models",
    Some(json!({ "modelId": "m", "attributes": ["a"], "properties": ["p"] })),
  )
  .await;

  let reply = send(
    &c,
    "PUT",
    "/models",
    Some(json!({ "modelId": "m", "attributes": ["a", "b"] })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);

  let reply = send(&c, "GET", "/models?id=m", None).await;
  assert_eq!(reply.body["attributes"], json!(["a", "b"]));
  assert_eq!(reply.body["properties"], json!(["p"]));
}

// ─── Create validation ───────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
  let c = catalog();
  let reply = send_raw(&c, "POST", "/factories", "{not json").await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(error_text(&reply).starts_with("Error parsing JSON body"));
}

#[tokio::test]
async fn mistyped_field_is_a_bad_request() {
  let c = catalog();
  let reply = send(
    &c,
    "POST",
    "/properties",
    Some(json!({ "propertyId": "1", "measurementId": "1", "name": "test", "value": "invalid", "unit": "feet" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(c.tables().is_empty("Property"));
}

#[tokio::test]
async fn caller_supplied_identity_is_required() {
  let c = catalog();
  let reply = send(&c, "POST", "/factories", Some(json!({ "name": "Nameless" }))).await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert_eq!(error_text(&reply), "factoryId is required");
}

#[tokio::test]
async fn create_stamps_creation_time() {
  let c = catalog();
  let reply = send(
    &c,
    "POST",
    "/measurements",
    Some(json!({ "measurementId": "m", "dateCreated": "2000-01-01T00:00:00Z" })),
  )
  .await;
  assert_eq!(reply.status, StatusCode::OK);

  let created = reply.body["dateCreated"].as_str().unwrap();
  assert!(!created.starts_with("2000"), "{created}");
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_without_id_is_a_bad_request() {
  let c = catalog();
  let reply = send(&c, "DELETE", "/factories", None).await;
  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert_eq!(error_text(&reply), "id query parameter is required");
}

#[tokio::test]
async fn delete_removes_record() {
  let c = catalog();
  send(&c, "POST", "/factories", Some(factory("1"))).await;

  let reply = send(&c, "DELETE", "/factories?id=1", None).await;
  assert_eq!(reply.status, StatusCode::OK);
  assert_eq!(reply.body["message"], "factoryId 1 deleted successfully");

  let reply = send(&c, "GET", "/factories?id=1", None).await;
  assert_eq!(reply.status, StatusCode::NOT_FOUND);

  let reply = send(&c, "DELETE", "/factories?id=1", None).await;
  assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn repeated_query_parameter_is_a_bad_request() {
  let c = catalog();
  let reply = send(&c, "DELETE", "/factories?id=a&id=b", None).await;

  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(error_text(&reply).starts_with("Error parsing query string"), "{}", reply.body);
}

// ─── Numbers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn out_of_range_number_on_create_is_rejected_before_storing() {
  let c = catalog();
  let reply = send(
    &c,
    "POST",
    "/measurements",
    Some(json!({ "measurementId": "m-1", "frequency": 1e200 })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(error_text(&reply).contains("\"frequency\""), "{}", reply.body);
  assert!(c.tables().is_empty("Measurement"));
}

#[tokio::test]
async fn out_of_range_number_on_update_is_rejected() {
  let c = catalog();
  send(&c, "POST", "/factories", Some(factory("1"))).await;
  let before = stored(&c, "Factory", "factoryId", "1").await;

  let reply = send(
    &c,
    "PUT",
    "/factories",
    Some(json!({ "factoryId": "1", "location": { "latitude": 1e-200 } })),
  )
  .await;

  assert_eq!(reply.status, StatusCode::BAD_REQUEST);
  assert!(error_text(&reply).contains("\"location.latitude\""), "{}", reply.body);
  assert_eq!(stored(&c, "Factory", "factoryId", "1").await, before);
}

// ─── Headers ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn every_response_is_json_with_open_cors() {
  let c = catalog();
  let ok = send(&c, "GET", "/factories", None).await;
  let bad = send(&c, "DELETE", "/factories", None).await;
  let rejected = send(&c, "GET", "/factories?id=a&id=b", None).await;
  let unknown = send(&c, "GET", "/warehouses", None).await;
  assert_eq!(unknown.status, StatusCode::NOT_FOUND);

  let stalled = catalog_with(StalledTables, MemoryObjectStore::new());
  let timed_out = send_with_limits(&stalled, "GET", "/factories?id=1", None, short_deadline()).await;

  for reply in [ok, bad, rejected, unknown, timed_out] {
    assert_eq!(reply.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(reply.headers[header::ACCESS_CONTROL_ALLOW_METHODS], "*");
    if reply.status != StatusCode::OK {
      assert!(!error_text(&reply).is_empty(), "{} has no error body", reply.status);
    }
  }
}
