//! The `Resource` and `Patch` traits that tie a domain record to its table,
//! codec, identity policy, binary fields, and partial-update shape.
//!
//! The request lifecycle is written once against these traits; each resource
//! type supplies the per-type details.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
  Result,
  attr::{Item, Key},
  ingest::BinarySlot,
  update::UpdateBuilder,
};

// ─── Kinds ───────────────────────────────────────────────────────────────────

/// Every resource type in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
  Factory,
  Floorplan,
  Asset,
  Measurement,
  Property,
  Model,
}

impl ResourceKind {
  pub const ALL: [ResourceKind; 6] = [
    Self::Factory,
    Self::Floorplan,
    Self::Asset,
    Self::Measurement,
    Self::Property,
    Self::Model,
  ];

  /// Human-readable name used in messages.
  pub fn label(self) -> &'static str {
    match self {
      Self::Factory => "factory",
      Self::Floorplan => "floorplan",
      Self::Asset => "asset",
      Self::Measurement => "measurement",
      Self::Property => "property",
      Self::Model => "model",
    }
  }

  /// Capitalised name, as it appears at the start of a message.
  pub fn title(self) -> &'static str {
    match self {
      Self::Factory => "Factory",
      Self::Floorplan => "Floorplan",
      Self::Asset => "Asset",
      Self::Measurement => "Measurement",
      Self::Property => "Property",
      Self::Model => "Model",
    }
  }
}

impl fmt::Display for ResourceKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// Who assigns a record's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityPolicy {
  /// The create payload carries the identifier.
  CallerSupplied,
  /// The system assigns a fresh UUID at creation, ignoring any supplied one.
  Generated,
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A catalog record type.
pub trait Resource:
  Serialize + DeserializeOwned + Send + Sync + Sized + 'static
{
  /// The update payload for this resource.
  type Patch: Patch;

  const KIND: ResourceKind;
  /// The partition key attribute (and JSON field) holding the identity.
  const KEY_ATTRIBUTE: &'static str;
  const IDENTITY: IdentityPolicy;

  fn id(&self) -> &str;

  fn set_id(&mut self, id: String);

  fn set_date_created(&mut self, at: DateTime<Utc>);

  fn key(&self) -> Key { Key::new(Self::KEY_ATTRIBUTE, self.id()) }

  /// Encode to the table store's native shape.
  fn to_item(&self) -> Item;

  /// Decode from the table store's native shape.
  fn from_item(item: Item) -> Result<Self>;

  /// The populated inline binary fields awaiting ingestion.
  fn binary_slots(&mut self) -> Vec<BinarySlot<'_>> { Vec::new() }
}

/// A sparsely-populated update payload: identity plus only the fields to
/// change.
pub trait Patch: DeserializeOwned + Send + Sync + 'static {
  fn id(&self) -> &str;

  /// Append one `SET` per present field, in schema order.
  fn update(&self) -> UpdateBuilder;
}
