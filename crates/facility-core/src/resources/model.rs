//! Model: a machine model, listing the attribute and property ids it
//! exposes.

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
pub struct Model {
  #[serde(default)]
  pub model_id:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub attributes:   Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub properties:   Option<Vec<String>>,
  #[serde(default)]
  pub date_created: DateTime<Utc>,
}

impl Resource for Model {
  type Patch = ModelPatch;

  const IDENTITY: IdentityPolicy = IdentityPolicy::CallerSupplied;
  const KEY_ATTRIBUTE: &'static str = "modelId";
  const KIND: ResourceKind = ResourceKind::Model;

  fn id(&self) -> &str { &self.model_id }

  fn set_id(&mut self, id: String) { self.model_id = id; }

  fn set_date_created(&mut self, at: DateTime<Utc>) { self.date_created = at; }

  fn to_item(&self) -> Item {
    ItemWriter::new()
      .set(Self::KEY_ATTRIBUTE, self.model_id.as_str())
      .set_opt("attributes", self.attributes.clone())
      .set_opt("properties", self.properties.clone())
      .timestamp("dateCreated", self.date_created)
      .finish()
  }

  fn from_item(item: Item) -> Result<Self> {
    let mut r = ItemReader::new(item);
    Ok(Self {
      model_id:     r.string(Self::KEY_ATTRIBUTE)?,
      attributes:   r.opt_string_list("attributes")?,
      properties:   r.opt_string_list("properties")?,
      date_created: r.timestamp("dateCreated")?,
    })
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPatch {
  #[serde(default)]
  pub model_id:   String,
  pub attributes: Option<Vec<String>>,
  pub properties: Option<Vec<String>>,
}

impl Patch for ModelPatch {
  fn id(&self) -> &str { &self.model_id }

  fn update(&self) -> UpdateBuilder {
    UpdateBuilder::new()
      .set_opt("attributes", self.attributes.clone())
      .set_opt("properties", self.properties.clone())
  }
}
