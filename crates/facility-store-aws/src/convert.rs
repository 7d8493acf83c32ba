//! Conversion between the core attribute model and the DynamoDB SDK's
//! `AttributeValue`.
//!
//! Writing is total. Reading rejects the binary kinds (`B`, `BS`) and number
//! sets, which no catalog record produces.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as Sdk;
use facility_core::attr::{AttributeValue, Item};

use crate::{Error, Result};

pub type SdkItem = HashMap<String, Sdk>;

pub fn to_sdk(value: AttributeValue) -> Sdk {
  match value {
    AttributeValue::S(s) => Sdk::S(s),
    AttributeValue::N(n) => Sdk::N(n),
    AttributeValue::Bool(b) => Sdk::Bool(b),
    AttributeValue::Null => Sdk::Null(true),
    AttributeValue::M(m) => Sdk::M(to_sdk_item(m)),
    AttributeValue::L(l) => Sdk::L(l.into_iter().map(to_sdk).collect()),
    AttributeValue::Ss(ss) => Sdk::Ss(ss),
  }
}

pub fn to_sdk_item(item: Item) -> SdkItem {
  item.into_iter().map(|(k, v)| (k, to_sdk(v))).collect()
}

fn unsupported(attribute: &str, kind: &'static str) -> Error {
  Error::UnsupportedAttribute {
    attribute: attribute.to_owned(),
    kind,
  }
}

/// Convert one SDK value found under `attribute` (used in error messages).
pub fn from_sdk(attribute: &str, value: Sdk) -> Result<AttributeValue> {
  Ok(match value {
    Sdk::S(s) => AttributeValue::S(s),
    Sdk::N(n) => AttributeValue::N(n),
    Sdk::Bool(b) => AttributeValue::Bool(b),
    Sdk::Null(_) => AttributeValue::Null,
    Sdk::Ss(ss) => AttributeValue::Ss(ss),
    Sdk::M(m) => AttributeValue::M(
      m.into_iter()
        .map(|(k, v)| {
          let nested = from_sdk(&format!("{attribute}.{k}"), v)?;
          Ok((k, nested))
        })
        .collect::<Result<Item>>()?,
    ),
    Sdk::L(l) => AttributeValue::L(
      l.into_iter()
        .enumerate()
        .map(|(i, v)| from_sdk(&format!("{attribute}[{i}]"), v))
        .collect::<Result<Vec<_>>>()?,
    ),
    Sdk::B(_) => return Err(unsupported(attribute, "B")),
    Sdk::Bs(_) => return Err(unsupported(attribute, "BS")),
    Sdk::Ns(_) => return Err(unsupported(attribute, "NS")),
    _ => return Err(unsupported(attribute, "unknown")),
  })
}

pub fn from_sdk_item(item: SdkItem) -> Result<Item> {
  item
    .into_iter()
    .map(|(k, v)| {
      let value = from_sdk(&k, v)?;
      Ok((k, value))
    })
    .collect()
}
