//! The six catalog record types and their update payloads.

mod asset;
mod factory;
mod floorplan;
mod location;
mod measurement;
mod model;
mod property;

pub use self::{
  asset::{Asset, AssetAttribute, AssetPatch},
  factory::{Factory, FactoryPatch},
  floorplan::{Floorplan, FloorplanPatch},
  location::Location,
  measurement::{Measurement, MeasurementPatch},
  model::{Model, ModelPatch},
  property::{Property, PropertyPatch},
};
