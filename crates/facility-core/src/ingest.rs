//! Binary asset ingestion: inline base64 payload in, object-store URL out.
//!
//! For one record, every populated binary field is decoded, uploaded under a
//! key derived from the record identity, and only then rewritten to the public
//! URL of the stored object. Any failure leaves every field untouched, so a
//! caller that aborts on error never persists a half-rewritten record.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use futures::{StreamExt as _, TryStreamExt as _, stream};
use tracing::{debug, instrument};

use crate::{Error, Result, store::ObjectStore};

// ─── Field kinds ─────────────────────────────────────────────────────────────

/// A binary-bearing field, with its fixed key layout and content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
  AssetImage,
  AssetModel,
  FloorplanImage,
}

impl BinaryKind {
  /// Noun used in decode errors ("error decoding image data").
  pub fn label(self) -> &'static str {
    match self {
      Self::AssetImage | Self::FloorplanImage => "image",
      Self::AssetModel => "model",
    }
  }

  pub fn content_type(self) -> &'static str {
    match self {
      Self::AssetImage | Self::FloorplanImage => "image/jpeg",
      Self::AssetModel => "model/gltf-binary",
    }
  }

  /// Storage key for the record `id`. Independent of payload content.
  pub fn object_key(self, id: &str) -> String {
    match self {
      Self::AssetImage => format!("assets/{id}.jpg"),
      Self::AssetModel => format!("models/{id}.glb"),
      Self::FloorplanImage => format!("floorplans/{id}.jpg"),
    }
  }
}

/// A mutable view of one binary reference field on a record.
#[derive(Debug)]
pub struct BinarySlot<'a> {
  pub kind:    BinaryKind,
  pub payload: &'a mut String,
}

impl<'a> BinarySlot<'a> {
  pub fn new(kind: BinaryKind, payload: &'a mut String) -> Self {
    Self { kind, payload }
  }
}

// ─── Locations ───────────────────────────────────────────────────────────────

/// Builds public URLs for stored objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLocator {
  base_url: String,
}

impl AssetLocator {
  /// Virtual-hosted S3 URLs for `bucket`.
  pub fn for_bucket(bucket: &str) -> Self {
    Self {
      base_url: format!("https://{bucket}.s3.amazonaws.com"),
    }
  }

  /// URLs rooted at an explicit base (CDN, LocalStack, MinIO).
  pub fn with_base_url(base_url: &str) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_owned(),
    }
  }

  pub fn url_for(&self, key: &str) -> String {
    format!("{}/{key}", self.base_url)
  }
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

struct PendingUpload<'s, 'a> {
  slot: &'s mut BinarySlot<'a>,
  key:  String,
  body: Bytes,
}

/// Ingest every populated slot of the record identified by `id`.
///
/// Payloads are all decoded before the first upload. Uploads run with at most
/// `concurrency` in flight and stop at the first failure. Returns the number
/// of fields rewritten.
#[instrument(skip(objects, locator, slots), fields(slots = slots.len()))]
pub async fn ingest<O: ObjectStore>(
  objects: &O,
  locator: &AssetLocator,
  id: &str,
  mut slots: Vec<BinarySlot<'_>>,
  concurrency: usize,
) -> Result<usize> {
  let mut pending = Vec::with_capacity(slots.len());
  for slot in slots.iter_mut().filter(|s| !s.payload.is_empty()) {
    let decoded = STANDARD
      .decode(slot.payload.as_bytes())
      .map_err(|source| Error::Decode {
        kind: slot.kind.label(),
        source,
      })?;
    pending.push(PendingUpload {
      key: slot.kind.object_key(id),
      body: Bytes::from(decoded),
      slot,
    });
  }

  if pending.is_empty() {
    return Ok(0);
  }

  let jobs: Vec<(String, BinaryKind, Bytes)> = pending
    .iter()
    .map(|upload| (upload.key.clone(), upload.slot.kind, upload.body.clone()))
    .collect();

  stream::iter(jobs)
    .map(move |(key, kind, body)| async move {
      debug!(key = %key, bytes = body.len(), "uploading binary payload");
      match objects.put_object(&key, kind.content_type(), body).await {
        Ok(()) => Ok(()),
        Err(e) => Err(Error::Upload {
          key,
          source: Box::new(e),
        }),
      }
    })
    .buffer_unordered(concurrency.max(1))
    .try_collect::<Vec<()>>()
    .await?;

  let rewritten = pending.len();
  for upload in pending {
    *upload.slot.payload = locator.url_for(&upload.key);
  }
  Ok(rewritten)
}
