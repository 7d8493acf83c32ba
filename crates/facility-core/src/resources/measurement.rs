//! Measurement: how a signal is sampled and bounded.

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
pub struct Measurement {
  #[serde(default)]
  pub measurement_id:     String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub frequency:          Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub generator_function: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub lower_bound:        Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub upper_bound:        Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub precision:          Option<f64>,
  #[serde(default)]
  pub date_created:       DateTime<Utc>,
}

impl Resource for Measurement {
  type Patch = MeasurementPatch;

  const IDENTITY: IdentityPolicy = IdentityPolicy::CallerSupplied;
  const KEY_ATTRIBUTE: &'static str = "measurementId";
  const KIND: ResourceKind = ResourceKind::Measurement;

  fn id(&self) -> &str { &self.measurement_id }

  fn set_id(&mut self, id: String) { self.measurement_id = id; }

  fn set_date_created(&mut self, at: DateTime<Utc>) { self.date_created = at; }

  fn to_item(&self) -> Item {
    ItemWriter::new()
      .set(Self::KEY_ATTRIBUTE, self.measurement_id.as_str())
      .set_opt("frequency", self.frequency)
      .set_opt("generatorFunction", self.generator_function.clone())
      .set_opt("lowerBound", self.lower_bound)
      .set_opt("upperBound", self.upper_bound)
      .set_opt("precision", self.precision)
      .timestamp("dateCreated", self.date_created)
      .finish()
  }

  fn from_item(item: Item) -> Result<Self> {
    let mut r = ItemReader::new(item);
    Ok(Self {
      measurement_id:     r.string(Self::KEY_ATTRIBUTE)?,
      frequency:          r.opt_number("frequency")?,
      generator_function: r.opt_string("generatorFunction")?,
      lower_bound:        r.opt_number("lowerBound")?,
      upper_bound:        r.opt_number("upperBound")?,
      precision:          r.opt_number("precision")?,
      date_created:       r.timestamp("dateCreated")?,
    })
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementPatch {
  #[serde(default)]
  pub measurement_id:     String,
  pub frequency:          Option<f64>,
  pub generator_function: Option<String>,
  pub lower_bound:        Option<f64>,
  pub upper_bound:        Option<f64>,
  pub precision:          Option<f64>,
}

impl Patch for MeasurementPatch {
  fn id(&self) -> &str { &self.measurement_id }

  fn update(&self) -> UpdateBuilder {
    UpdateBuilder::new()
      .set_opt("frequency", self.frequency)
      .set_opt("generatorFunction", self.generator_function.clone())
      .set_opt("lowerBound", self.lower_bound)
      .set_opt("upperBound", self.upper_bound)
      .set_opt("precision", self.precision)
  }
}
