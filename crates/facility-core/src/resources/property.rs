//! Property: a named, unit-bearing value derived from a measurement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  attr::{Item, ItemReader, ItemWriter},
  resource::{IdentityPolicy, Patch, Resource, ResourceKind},
  update::UpdateBuilder,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
  #[serde(default)]
  pub property_id:    String,
  pub measurement_id: String,
  pub name:           String,
  pub value:          f64,
  pub unit:           String,
  #[serde(default)]
  pub date_created:   DateTime<Utc>,
}

impl Resource for Property {
  type Patch = PropertyPatch;

  const IDENTITY: IdentityPolicy = IdentityPolicy::CallerSupplied;
  const KEY_ATTRIBUTE: &'static str = "propertyId";
  const KIND: ResourceKind = ResourceKind::Property;

  fn id(&self) -> &str { &self.property_id }

  fn set_id(&mut self, id: String) { self.property_id = id; }

  fn set_date_created(&mut self, at: DateTime<Utc>) { self.date_created = at; }

  fn to_item(&self) -> Item {
    ItemWriter::new()
      .set(Self::KEY_ATTRIBUTE, self.property_id.as_str())
      .set("measurementId", self.measurement_id.as_str())
      .set("name", self.name.as_str())
      .set("value", self.value)
      .set("unit", self.unit.as_str())
      .timestamp("dateCreated", self.date_created)
      .finish()
  }

  fn from_item(item: Item) -> Result<Self> {
    let mut r = ItemReader::new(item);
    Ok(Self {
      property_id:    r.string(Self::KEY_ATTRIBUTE)?,
      measurement_id: r.string("measurementId")?,
      name:           r.string("name")?,
      value:          r.number("value")?,
      unit:           r.string("unit")?,
      date_created:   r.timestamp("dateCreated")?,
    })
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
  #[serde(default)]
  pub property_id:    String,
  pub measurement_id: Option<String>,
  pub name:           Option<String>,
  pub value:          Option<f64>,
  pub unit:           Option<String>,
}

impl Patch for PropertyPatch {
  fn id(&self) -> &str { &self.property_id }

  fn update(&self) -> UpdateBuilder {
    UpdateBuilder::new()
      .set_opt("measurementId", self.measurement_id.clone())
      .set_opt("name", self.name.clone())
      .set_opt("value", self.value)
      .set_opt("unit", self.unit.clone())
  }
}
