//! Partial-update expressions.
//!
//! An [`UpdateBuilder`] collects `SET path = value` assignments in the order
//! they are added; [`UpdateBuilder::build`] turns them into an
//! [`UpdateExpression`] in which every attribute name travels through a `#n*`
//! placeholder and every value through a `:v*` placeholder. Dotted paths
//! (`location.longitude`) address a member of a nested map, leaving its
//! siblings untouched.

use std::collections::BTreeMap;

use crate::{
  Error, Result,
  attr::{AttributeValue, check_numbers},
};

/// A mutation descriptor for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression {
  /// Placeholder (`#n0`) to real attribute name.
  pub names:      BTreeMap<String, String>,
  /// Placeholder (`:v0`) to new value.
  pub values:     BTreeMap<String, AttributeValue>,
  /// The `SET` clause, e.g. `SET #n0 = :v0, #n1.#n2 = :v1`.
  pub expression: String,
}

impl UpdateExpression {
  /// Number of assignments in the `SET` clause.
  pub fn len(&self) -> usize { self.values.len() }

  pub fn is_empty(&self) -> bool { self.values.is_empty() }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
  assignments: Vec<(String, AttributeValue)>,
}

impl UpdateBuilder {
  pub fn new() -> Self { Self::default() }

  /// Append `SET path = value`.
  pub fn set(mut self, path: &str, value: impl Into<AttributeValue>) -> Self {
    self.assignments.push((path.to_owned(), value.into()));
    self
  }

  /// Append `SET path = value` only when `value` is present.
  pub fn set_opt<V: Into<AttributeValue>>(
    self,
    path: &str,
    value: Option<V>,
  ) -> Self {
    match value {
      Some(v) => self.set(path, v),
      None => self,
    }
  }

  pub fn is_empty(&self) -> bool { self.assignments.is_empty() }

  /// Build the expression. Fails with [`Error::EmptyUpdate`] when nothing was
  /// set, with [`Error::InvalidAttributePath`] on an empty path segment and
  /// with [`Error::NumberOutOfRange`] on a value the store cannot hold.
  pub fn build(self) -> Result<UpdateExpression> {
    if self.assignments.is_empty() {
      return Err(Error::EmptyUpdate);
    }

    let mut names = BTreeMap::new();
    let mut placeholder_for: BTreeMap<String, String> = BTreeMap::new();
    let mut values = BTreeMap::new();
    let mut clauses = Vec::with_capacity(self.assignments.len());

    for (index, (path, value)) in self.assignments.into_iter().enumerate() {
      if path.split('.').any(str::is_empty) {
        return Err(Error::InvalidAttributePath(path));
      }
      check_numbers(&path, &value)?;

      let target = path
        .split('.')
        .map(|segment| {
          let next = format!("#n{}", placeholder_for.len());
          placeholder_for
            .entry(segment.to_owned())
            .or_insert_with(|| {
              names.insert(next.clone(), segment.to_owned());
              next
            })
            .clone()
        })
        .collect::<Vec<_>>()
        .join(".");

      let value_placeholder = format!(":v{index}");
      clauses.push(format!("{target} = {value_placeholder}"));
      values.insert(value_placeholder, value);
    }

    Ok(UpdateExpression {
      names,
      values,
      expression: format!("SET {}", clauses.join(", ")),
    })
  }
}
