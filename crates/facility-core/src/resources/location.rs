//! `Location`: a point whose coordinates are each independently optional.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  attr::{AttributeValue, ItemReader, ItemWriter},
  update::UpdateBuilder,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub longitude: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub latitude:  Option<f64>,
}

impl Location {
  pub fn new(longitude: f64, latitude: f64) -> Self {
    Self {
      longitude: Some(longitude),
      latitude:  Some(latitude),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.longitude.is_none() && self.latitude.is_none()
  }

  /// Encode an optional location. Always a map, empty when absent, so that a
  /// later `SET parent.latitude` has a parent to write into.
  pub(crate) fn encode(location: Option<&Location>) -> AttributeValue {
    let location = location.cloned().unwrap_or_default();
    ItemWriter::new()
      .set_opt("longitude", location.longitude)
      .set_opt("latitude", location.latitude)
      .into()
  }

  /// Decode the map stored under `name`; an empty map reads as absent.
  pub(crate) fn decode(reader: &mut ItemReader, name: &str) -> Result<Option<Location>> {
    let Some(mut map) = reader.opt_map(name)? else {
      return Ok(None);
    };
    let location = Location {
      longitude: map.opt_number("longitude")?,
      latitude:  map.opt_number("latitude")?,
    };
    Ok((!location.is_empty()).then_some(location))
  }

  /// Add a dotted-path `SET` for each present coordinate.
  pub(crate) fn update(
    location: Option<&Location>,
    parent: &str,
    builder: UpdateBuilder,
  ) -> UpdateBuilder {
    let Some(location) = location else {
      return builder;
    };
    builder
      .set_opt(&format!("{parent}.longitude"), location.longitude)
      .set_opt(&format!("{parent}.latitude"), location.latitude)
  }
}
