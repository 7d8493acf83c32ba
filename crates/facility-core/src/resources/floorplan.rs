//! Floorplan: a factory floor image.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  attr::{Item, ItemReader, ItemWriter},
  ingest::{BinaryKind, BinarySlot},
  resource::{IdentityPolicy, Patch, Resource, ResourceKind},
  update::UpdateBuilder,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Floorplan {
  #[serde(default)]
  pub floorplan_id: String,
  pub factory_id:   String,
  /// Base64 image on create; the stored image URL afterwards.
  #[serde(default)]
  pub image_data:   String,
  #[serde(default)]
  pub date_created: DateTime<Utc>,
}

impl Resource for Floorplan {
  type Patch = FloorplanPatch;

  const IDENTITY: IdentityPolicy = IdentityPolicy::CallerSupplied;
  const KEY_ATTRIBUTE: &'static str = "floorplanId";
  const KIND: ResourceKind = ResourceKind::Floorplan;

  fn id(&self) -> &str { &self.floorplan_id }

  fn set_id(&mut self, id: String) { self.floorplan_id = id; }

  fn set_date_created(&mut self, at: DateTime<Utc>) { self.date_created = at; }

  fn to_item(&self) -> Item {
    ItemWriter::new()
      .set(Self::KEY_ATTRIBUTE, self.floorplan_id.as_str())
      .set("factoryId", self.factory_id.as_str())
      .set("imageData", self.image_data.as_str())
      .timestamp("dateCreated", self.date_created)
      .finish()
  }

  fn from_item(item: Item) -> Result<Self> {
    let mut r = ItemReader::new(item);
    Ok(Self {
      floorplan_id: r.string(Self::KEY_ATTRIBUTE)?,
      factory_id:   r.string("factoryId")?,
      image_data:   r.opt_string("imageData")?.unwrap_or_default(),
      date_created: r.timestamp("dateCreated")?,
    })
  }

  fn binary_slots(&mut self) -> Vec<BinarySlot<'_>> {
    vec![BinarySlot::new(BinaryKind::FloorplanImage, &mut self.image_data)]
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorplanPatch {
  #[serde(default)]
  pub floorplan_id: String,
  pub factory_id:   Option<String>,
}

impl Patch for FloorplanPatch {
  fn id(&self) -> &str { &self.floorplan_id }

  fn update(&self) -> UpdateBuilder {
    UpdateBuilder::new().set_opt("factoryId", self.factory_id.clone())
  }
}
