//! In-memory implementations of [`TableStore`] and [`ObjectStore`].
//!
//! Used by tests and by the server's `memory` backend. The table store keeps
//! the table store's semantics that callers can observe: tables must be
//! declared with their key attribute, key attributes cannot be updated, and a
//! dotted update path needs an existing parent map.

use std::{
  collections::{BTreeMap, HashMap},
  sync::{Mutex, MutexGuard, PoisonError},
};

use bytes::Bytes;
use thiserror::Error;

use crate::{
  attr::{AttributeValue, Item, Key},
  store::{ObjectStore, TableStore, UpdateOutcome},
  update::UpdateExpression,
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("table {0:?} does not exist")]
  UnknownTable(String),

  #[error("item is missing key attribute {0:?}")]
  MissingKey(String),

  #[error("cannot update key attribute {0:?}")]
  KeyUpdate(String),

  #[error("malformed update expression: {0:?}")]
  MalformedExpression(String),

  #[error("unknown placeholder {0:?}")]
  UnknownPlaceholder(String),

  #[error("document path {0:?} is not a map")]
  InvalidDocumentPath(String),
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ─── Table store ─────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Table {
  key_attribute: String,
  items:         BTreeMap<String, Item>,
}

#[derive(Debug, Default)]
pub struct MemoryTableStore {
  tables: Mutex<HashMap<String, Table>>,
}

impl MemoryTableStore {
  pub fn new() -> Self { Self::default() }

  /// Declare `table` with partition key `key_attribute`. Re-declaring an
  /// existing table keeps its items.
  pub fn with_table(self, table: &str, key_attribute: &str) -> Self {
    lock(&self.tables)
      .entry(table.to_owned())
      .or_insert_with(|| Table {
        key_attribute: key_attribute.to_owned(),
        items:         BTreeMap::new(),
      });
    self
  }

  /// Number of items in `table` (zero for an unknown table).
  pub fn len(&self, table: &str) -> usize {
    lock(&self.tables).get(table).map_or(0, |t| t.items.len())
  }

  pub fn is_empty(&self, table: &str) -> bool { self.len(table) == 0 }
}

fn table_mut<'t>(
  tables: &'t mut HashMap<String, Table>,
  name: &str,
) -> Result<&'t mut Table, MemoryError> {
  tables
    .get_mut(name)
    .ok_or_else(|| MemoryError::UnknownTable(name.to_owned()))
}

impl TableStore for MemoryTableStore {
  type Error = MemoryError;

  async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>, MemoryError> {
    let mut tables = lock(&self.tables);
    Ok(table_mut(&mut tables, table)?.items.get(&key.value).cloned())
  }

  async fn put_item(&self, table: &str, item: Item) -> Result<(), MemoryError> {
    let mut tables = lock(&self.tables);
    let table = table_mut(&mut tables, table)?;
    let id = item
      .get(&table.key_attribute)
      .and_then(AttributeValue::as_s)
      .ok_or_else(|| MemoryError::MissingKey(table.key_attribute.clone()))?
      .to_owned();
    table.items.insert(id, item);
    Ok(())
  }

  async fn update_item(
    &self,
    table: &str,
    key: &Key,
    update: &UpdateExpression,
  ) -> Result<UpdateOutcome, MemoryError> {
    let mut tables = lock(&self.tables);
    let table = table_mut(&mut tables, table)?;
    let Some(current) = table.items.get(&key.value) else {
      return Ok(UpdateOutcome::Missing);
    };

    let mut next = current.clone();
    apply_update(&mut next, update, &table.key_attribute)?;
    table.items.insert(key.value.clone(), next);
    Ok(UpdateOutcome::Updated)
  }

  async fn delete_item(&self, table: &str, key: &Key) -> Result<(), MemoryError> {
    let mut tables = lock(&self.tables);
    table_mut(&mut tables, table)?.items.remove(&key.value);
    Ok(())
  }

  async fn scan(&self, table: &str) -> Result<Vec<Item>, MemoryError> {
    let mut tables = lock(&self.tables);
    Ok(table_mut(&mut tables, table)?.items.values().cloned().collect())
  }
}

/// Apply a `SET` expression to `item` in place.
fn apply_update(
  item: &mut Item,
  update: &UpdateExpression,
  key_attribute: &str,
) -> Result<(), MemoryError> {
  let malformed = || MemoryError::MalformedExpression(update.expression.clone());
  let clauses = update.expression.strip_prefix("SET ").ok_or_else(malformed)?;

  for clause in clauses.split(", ") {
    let (target, value_placeholder) =
      clause.split_once(" = ").ok_or_else(malformed)?;
    let value = update
      .values
      .get(value_placeholder)
      .ok_or_else(|| MemoryError::UnknownPlaceholder(value_placeholder.to_owned()))?
      .clone();
    let path = target
      .split('.')
      .map(|placeholder| {
        update
          .names
          .get(placeholder)
          .map(String::as_str)
          .ok_or_else(|| MemoryError::UnknownPlaceholder(placeholder.to_owned()))
      })
      .collect::<Result<Vec<_>, _>>()?;

    if path.len() == 1 && path[0] == key_attribute {
      return Err(MemoryError::KeyUpdate(key_attribute.to_owned()));
    }
    set_path(item, &path, value)?;
  }
  Ok(())
}

fn set_path(
  item: &mut Item,
  path: &[&str],
  value: AttributeValue,
) -> Result<(), MemoryError> {
  let Some((last, parents)) = path.split_last() else {
    return Err(MemoryError::MalformedExpression(String::new()));
  };

  let mut current = item;
  for (depth, segment) in parents.iter().enumerate() {
    current = match current.get_mut(*segment) {
      Some(AttributeValue::M(map)) => map,
      _ => return Err(MemoryError::InvalidDocumentPath(path[..=depth].join("."))),
    };
  }
  current.insert((*last).to_owned(), value);
  Ok(())
}

// ─── Object store ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
  pub content_type: String,
  pub body:         Bytes,
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
  objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryObjectStore {
  pub fn new() -> Self { Self::default() }

  pub fn get(&self, key: &str) -> Option<StoredObject> {
    lock(&self.objects).get(key).cloned()
  }

  pub fn keys(&self) -> Vec<String> {
    lock(&self.objects).keys().cloned().collect()
  }

  pub fn len(&self) -> usize { lock(&self.objects).len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl ObjectStore for MemoryObjectStore {
  type Error = MemoryError;

  async fn put_object(
    &self,
    key: &str,
    content_type: &str,
    body: Bytes,
  ) -> Result<(), MemoryError> {
    lock(&self.objects).insert(key.to_owned(), StoredObject {
      content_type: content_type.to_owned(),
      body,
    });
    Ok(())
  }
}
