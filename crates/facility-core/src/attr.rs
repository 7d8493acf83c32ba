//! The table store's native record shape and the helpers every resource codec
//! is written against.
//!
//! Backends translate [`AttributeValue`] to and from their own wire types;
//! nothing above the capability boundary sees an SDK type. Numbers are carried
//! as decimal strings, the way the table store transmits them, and must fall
//! inside the store's range (see [`check_item`]).

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{Error, Result};

// ─── Values ──────────────────────────────────────────────────────────────────

/// A single typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
  S(String),
  N(String),
  Bool(bool),
  Null,
  M(BTreeMap<String, AttributeValue>),
  L(Vec<AttributeValue>),
  Ss(Vec<String>),
}

/// A record as stored: attribute name to value.
pub type Item = BTreeMap<String, AttributeValue>;

/// Largest magnitude the table store accepts.
pub const MAX_NUMBER: f64 = 9.999_999_999_999_999e125;
/// Smallest non-zero magnitude the table store accepts.
pub const MIN_NUMBER: f64 = 1e-130;

impl AttributeValue {
  /// Plain decimal for everyday magnitudes, exponent form at the extremes.
  pub fn number(n: f64) -> Self {
    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
      Self::N(format!("{n:e}"))
    } else {
      Self::N(n.to_string())
    }
  }

  pub fn type_name(&self) -> &'static str {
    match self {
      Self::S(_) => "S",
      Self::N(_) => "N",
      Self::Bool(_) => "BOOL",
      Self::Null => "NULL",
      Self::M(_) => "M",
      Self::L(_) => "L",
      Self::Ss(_) => "SS",
    }
  }

  pub fn as_s(&self) -> Option<&str> {
    match self {
      Self::S(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_m(&self) -> Option<&Item> {
    match self {
      Self::M(m) => Some(m),
      _ => None,
    }
  }
}

impl From<&str> for AttributeValue {
  fn from(s: &str) -> Self { Self::S(s.to_owned()) }
}

impl From<String> for AttributeValue {
  fn from(s: String) -> Self { Self::S(s) }
}

impl From<f64> for AttributeValue {
  fn from(n: f64) -> Self { Self::number(n) }
}

impl From<bool> for AttributeValue {
  fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<Vec<String>> for AttributeValue {
  fn from(list: Vec<String>) -> Self {
    Self::L(list.into_iter().map(Self::S).collect())
  }
}

// ─── Range ───────────────────────────────────────────────────────────────────

fn storable(n: f64) -> bool {
  n == 0.0 || (n.is_finite() && (MIN_NUMBER..=MAX_NUMBER).contains(&n.abs()))
}

/// Reject any number inside `value` that the table store cannot hold. Nested
/// values are reported as `path.key` and `path[i]`.
pub fn check_numbers(path: &str, value: &AttributeValue) -> Result<()> {
  match value {
    AttributeValue::N(raw) => {
      let n: f64 = raw.parse().map_err(|_| Error::InvalidNumber {
        attribute: path.to_owned(),
        value:     raw.clone(),
      })?;
      if storable(n) {
        Ok(())
      } else {
        Err(Error::NumberOutOfRange {
          attribute: path.to_owned(),
          value:     n,
        })
      }
    }
    AttributeValue::M(map) => map
      .iter()
      .try_for_each(|(key, v)| check_numbers(&format!("{path}.{key}"), v)),
    AttributeValue::L(list) => list
      .iter()
      .enumerate()
      .try_for_each(|(i, v)| check_numbers(&format!("{path}[{i}]"), v)),
    _ => Ok(()),
  }
}

/// [`check_numbers`] over every attribute of `item`.
pub fn check_item(item: &Item) -> Result<()> {
  item.iter().try_for_each(|(name, value)| check_numbers(name, value))
}

// ─── Keys ────────────────────────────────────────────────────────────────────

/// Primary key of a record: a single string partition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
  pub attribute: String,
  pub value:     String,
}

impl Key {
  pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      attribute: attribute.into(),
      value:     value.into(),
    }
  }
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> AttributeValue {
  AttributeValue::S(dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn decode_dt(attribute: &str, s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::InvalidTimestamp {
      attribute: attribute.to_owned(),
      message:   e.to_string(),
    })
}

// ─── Writing ─────────────────────────────────────────────────────────────────

/// Accumulates attributes for one item, dropping absent optionals so that a
/// stored record only ever carries populated fields.
#[derive(Debug, Default)]
pub struct ItemWriter {
  item: Item,
}

impl ItemWriter {
  pub fn new() -> Self { Self::default() }

  pub fn set(mut self, name: &str, value: impl Into<AttributeValue>) -> Self {
    self.item.insert(name.to_owned(), value.into());
    self
  }

  pub fn set_opt<V: Into<AttributeValue>>(
    self,
    name: &str,
    value: Option<V>,
  ) -> Self {
    match value {
      Some(v) => self.set(name, v),
      None => self,
    }
  }

  pub fn timestamp(self, name: &str, dt: DateTime<Utc>) -> Self {
    self.set(name, encode_dt(dt))
  }

  pub fn finish(self) -> Item { self.item }
}

impl From<ItemWriter> for AttributeValue {
  fn from(w: ItemWriter) -> Self { AttributeValue::M(w.finish()) }
}

// ─── Reading ─────────────────────────────────────────────────────────────────

/// Consumes attributes from an item, reporting the full dotted attribute name
/// on a missing or mistyped value. `NULL` is read as absent.
#[derive(Debug)]
pub struct ItemReader {
  item:   Item,
  prefix: String,
}

impl ItemReader {
  pub fn new(item: Item) -> Self {
    Self {
      item,
      prefix: String::new(),
    }
  }

  /// Wrap a nested map value found under `name`.
  pub fn from_value(name: &str, value: AttributeValue) -> Result<Self> {
    match value {
      AttributeValue::M(item) => Ok(Self {
        item,
        prefix: format!("{name}."),
      }),
      _ => Err(Error::AttributeType {
        attribute: name.to_owned(),
        expected:  "M",
      }),
    }
  }

  pub fn is_empty(&self) -> bool { self.item.is_empty() }

  /// Remaining attributes, in name order.
  pub fn into_entries(self) -> impl Iterator<Item = (String, AttributeValue)> {
    self.item.into_iter()
  }

  fn qualified(&self, name: &str) -> String { format!("{}{name}", self.prefix) }

  fn take(&mut self, name: &str) -> Option<AttributeValue> {
    match self.item.remove(name) {
      Some(AttributeValue::Null) | None => None,
      Some(v) => Some(v),
    }
  }

  fn require(&mut self, name: &str) -> Result<AttributeValue> {
    self
      .take(name)
      .ok_or_else(|| Error::MissingAttribute(self.qualified(name)))
  }

  fn mistyped(&self, name: &str, expected: &'static str) -> Error {
    Error::AttributeType {
      attribute: self.qualified(name),
      expected,
    }
  }

  pub fn opt_string(&mut self, name: &str) -> Result<Option<String>> {
    match self.take(name) {
      None => Ok(None),
      Some(AttributeValue::S(s)) => Ok(Some(s)),
      Some(_) => Err(self.mistyped(name, "S")),
    }
  }

  pub fn string(&mut self, name: &str) -> Result<String> {
    let value = self.require(name)?;
    match value {
      AttributeValue::S(s) => Ok(s),
      _ => Err(self.mistyped(name, "S")),
    }
  }

  pub fn opt_number(&mut self, name: &str) -> Result<Option<f64>> {
    match self.take(name) {
      None => Ok(None),
      Some(AttributeValue::N(raw)) => {
        raw.parse().map(Some).map_err(|_| Error::InvalidNumber {
          attribute: self.qualified(name),
          value:     raw,
        })
      }
      Some(_) => Err(self.mistyped(name, "N")),
    }
  }

  pub fn number(&mut self, name: &str) -> Result<f64> {
    self
      .opt_number(name)?
      .ok_or_else(|| Error::MissingAttribute(self.qualified(name)))
  }

  pub fn timestamp(&mut self, name: &str) -> Result<DateTime<Utc>> {
    let raw = self.string(name)?;
    decode_dt(&self.qualified(name), &raw)
  }

  /// A nested map, or `None` when absent.
  pub fn opt_map(&mut self, name: &str) -> Result<Option<ItemReader>> {
    let qualified = self.qualified(name);
    self
      .take(name)
      .map(|v| ItemReader::from_value(&qualified, v))
      .transpose()
  }

  /// A list of strings, accepting either a list of `S` or a string set.
  pub fn opt_string_list(&mut self, name: &str) -> Result<Option<Vec<String>>> {
    match self.take(name) {
      None => Ok(None),
      Some(AttributeValue::Ss(list)) => Ok(Some(list)),
      Some(AttributeValue::L(list)) => list
        .into_iter()
        .map(|v| match v {
          AttributeValue::S(s) => Ok(s),
          _ => Err(self.mistyped(name, "L<S>")),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some),
      Some(_) => Err(self.mistyped(name, "L")),
    }
  }
}
