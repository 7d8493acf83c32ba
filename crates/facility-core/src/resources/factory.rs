//! Factory: a site, keyed by a caller-supplied id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  attr::{Item, ItemReader, ItemWriter},
  resource::{IdentityPolicy, Patch, Resource, ResourceKind},
  resources::Location,
  update::UpdateBuilder,
};

/// The factory table stores the creation time under a name with a space.
const DATE_CREATED: &str = "Date Created";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Factory {
  #[serde(default)]
  pub factory_id:   String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location:     Option<Location>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description:  Option<String>,
  #[serde(default)]
  pub date_created: DateTime<Utc>,
}

impl Resource for Factory {
  type Patch = FactoryPatch;

  const IDENTITY: IdentityPolicy = IdentityPolicy::CallerSupplied;
  const KEY_ATTRIBUTE: &'static str = "factoryId";
  const KIND: ResourceKind = ResourceKind::Factory;

  fn id(&self) -> &str { &self.factory_id }

  fn set_id(&mut self, id: String) { self.factory_id = id; }

  fn set_date_created(&mut self, at: DateTime<Utc>) { self.date_created = at; }

  fn to_item(&self) -> Item {
    ItemWriter::new()
      .set(Self::KEY_ATTRIBUTE, self.factory_id.as_str())
      .set_opt("name", self.name.clone())
      .set("location", Location::encode(self.location.as_ref()))
      .set_opt("description", self.description.clone())
      .timestamp(DATE_CREATED, self.date_created)
      .finish()
  }

  fn from_item(item: Item) -> Result<Self> {
    let mut r = ItemReader::new(item);
    Ok(Self {
      factory_id:   r.string(Self::KEY_ATTRIBUTE)?,
      name:         r.opt_string("name")?,
      location:     Location::decode(&mut r, "location")?,
      description:  r.opt_string("description")?,
      date_created: r.timestamp(DATE_CREATED)?,
    })
  }
}

/// Update payload for a factory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryPatch {
  #[serde(default)]
  pub factory_id:  String,
  pub name:        Option<String>,
  pub description: Option<String>,
  pub location:    Option<Location>,
}

impl Patch for FactoryPatch {
  fn id(&self) -> &str { &self.factory_id }

  fn update(&self) -> UpdateBuilder {
    let builder = UpdateBuilder::new()
      .set_opt("name", self.name.clone())
      .set_opt("description", self.description.clone());
    Location::update(self.location.as_ref(), "location", builder)
  }
}
