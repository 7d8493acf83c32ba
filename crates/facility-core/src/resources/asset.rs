//! Asset: a physical machine placed on a floorplan.
//!
//! Asset ids are generated at creation. An asset carries up to two binary
//! references: a photo (`imageData`) and a 3D model (`modelUrl`).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  attr::{AttributeValue, Item, ItemReader, ItemWriter},
  ingest::{BinaryKind, BinarySlot},
  resource::{IdentityPolicy, Patch, Resource, ResourceKind},
  resources::Location,
  update::UpdateBuilder,
};

/// A named, free-form characteristic of an asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAttribute {
  pub name:       String,
  pub value:      String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unit:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub model_id:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub asset_id:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub factory_id: Option<String>,
}

impl AssetAttribute {
  fn encode(&self) -> AttributeValue {
    ItemWriter::new()
      .set("name", self.name.as_str())
      .set("value", self.value.as_str())
      .set_opt("unit", self.unit.clone())
      .set_opt("modelId", self.model_id.clone())
      .set_opt("assetId", self.asset_id.clone())
      .set_opt("factoryId", self.factory_id.clone())
      .into()
  }

  fn decode(name: &str, value: AttributeValue) -> Result<Self> {
    let mut r = ItemReader::from_value(name, value)?;
    Ok(Self {
      name:       r.string("name")?,
      value:      r.string("value")?,
      unit:       r.opt_string("unit")?,
      model_id:   r.opt_string("modelId")?,
      asset_id:   r.opt_string("assetId")?,
      factory_id: r.opt_string("factoryId")?,
    })
  }
}

fn encode_attributes(attributes: &BTreeMap<String, AssetAttribute>) -> AttributeValue {
  AttributeValue::M(
    attributes
      .iter()
      .map(|(k, a)| (k.clone(), a.encode()))
      .collect(),
  )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
  #[serde(default)]
  pub asset_id:         String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub factory_id:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:             Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub floorplan_coords: Option<Location>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub model_id:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub floorplan_id:     Option<String>,
  /// Base64 photo on create, stored image URL afterwards; empty when none.
  #[serde(default)]
  pub image_data:       String,
  /// Base64 glTF binary on create, stored model URL afterwards.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub model_url:        Option<String>,
  #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
  pub kind:             Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub attributes:       Option<BTreeMap<String, AssetAttribute>>,
  #[serde(default)]
  pub date_created:     DateTime<Utc>,
}

impl Resource for Asset {
  type Patch = AssetPatch;

  const IDENTITY: IdentityPolicy = IdentityPolicy::Generated;
  const KEY_ATTRIBUTE: &'static str = "assetId";
  const KIND: ResourceKind = ResourceKind::Asset;

  fn id(&self) -> &str { &self.asset_id }

  fn set_id(&mut self, id: String) { self.asset_id = id; }

  fn set_date_created(&mut self, at: DateTime<Utc>) { self.date_created = at; }

  fn to_item(&self) -> Item {
    ItemWriter::new()
      .set(Self::KEY_ATTRIBUTE, self.asset_id.as_str())
      .set_opt("factoryId", self.factory_id.clone())
      .set_opt("name", self.name.clone())
      .set(
        "floorplanCoords",
        Location::encode(self.floorplan_coords.as_ref()),
      )
      .set_opt("modelId", self.model_id.clone())
      .set_opt("floorplanId", self.floorplan_id.clone())
      .set_opt(
        "imageData",
        Some(self.image_data.clone()).filter(|s| !s.is_empty()),
      )
      .set_opt("modelUrl", self.model_url.clone())
      .set_opt("type", self.kind.clone())
      .set_opt("description", self.description.clone())
      .set_opt("attributes", self.attributes.as_ref().map(encode_attributes))
      .timestamp("dateCreated", self.date_created)
      .finish()
  }

  fn from_item(item: Item) -> Result<Self> {
    let mut r = ItemReader::new(item);
    let attributes = r
      .opt_map("attributes")?
      .map(|map| {
        map
          .into_entries()
          .map(|(key, value)| {
            let attribute = AssetAttribute::decode(&format!("attributes.{key}"), value)?;
            Ok((key, attribute))
          })
          .collect::<Result<BTreeMap<_, _>>>()
      })
      .transpose()?;

    Ok(Self {
      asset_id: r.string(Self::KEY_ATTRIBUTE)?,
      factory_id: r.opt_string("factoryId")?,
      name: r.opt_string("name")?,
      floorplan_coords: Location::decode(&mut r, "floorplanCoords")?,
      model_id: r.opt_string("modelId")?,
      floorplan_id: r.opt_string("floorplanId")?,
      image_data: r.opt_string("imageData")?.unwrap_or_default(),
      model_url: r.opt_string("modelUrl")?,
      kind: r.opt_string("type")?,
      description: r.opt_string("description")?,
      attributes,
      date_created: r.timestamp("dateCreated")?,
    })
  }

  fn binary_slots(&mut self) -> Vec<BinarySlot<'_>> {
    let mut slots = vec![BinarySlot::new(BinaryKind::AssetImage, &mut self.image_data)];
    if let Some(model) = self.model_url.as_mut() {
      slots.push(BinarySlot::new(BinaryKind::AssetModel, model));
    }
    slots
  }
}

/// Update payload for an asset. Binary references are not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPatch {
  #[serde(default)]
  pub asset_id:         String,
  pub factory_id:       Option<String>,
  pub name:             Option<String>,
  pub floorplan_coords: Option<Location>,
  pub model_id:         Option<String>,
  pub floorplan_id:     Option<String>,
  #[serde(rename = "type")]
  pub kind:             Option<String>,
  pub description:      Option<String>,
  pub attributes:       Option<BTreeMap<String, AssetAttribute>>,
}

impl Patch for AssetPatch {
  fn id(&self) -> &str { &self.asset_id }

  fn update(&self) -> UpdateBuilder {
    let builder = UpdateBuilder::new()
      .set_opt("factoryId", self.factory_id.clone())
      .set_opt("name", self.name.clone());
    Location::update(self.floorplan_coords.as_ref(), "floorplanCoords", builder)
      .set_opt("modelId", self.model_id.clone())
      .set_opt("floorplanId", self.floorplan_id.clone())
      .set_opt("type", self.kind.clone())
      .set_opt("description", self.description.clone())
      .set_opt("attributes", self.attributes.as_ref().map(encode_attributes))
  }
}
