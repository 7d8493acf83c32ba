//! Capability traits for the table store and the object store.
//!
//! Implemented by backends (`facility-store-aws`, [`crate::memory`]). The
//! request lifecycle depends on these abstractions only, never on a concrete
//! client, so every step can run against in-memory doubles.

use std::future::Future;

use bytes::Bytes;

use crate::{
  attr::{Item, Key},
  update::UpdateExpression,
};

/// Result of applying an [`UpdateExpression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
  Updated,
  /// No record exists under the key; nothing was written.
  Missing,
}

/// Key-value table store addressed by a single string partition key.
///
/// All methods return `Send` futures so implementations can be shared across
/// a multi-threaded runtime. Handles carry no per-call state.
pub trait TableStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Point lookup. Returns `None` if no record exists under `key`.
  fn get_item<'a>(
    &'a self,
    table: &'a str,
    key: &'a Key,
  ) -> impl Future<Output = Result<Option<Item>, Self::Error>> + Send + 'a;

  /// Insert or replace a whole record.
  fn put_item<'a>(
    &'a self,
    table: &'a str,
    item: Item,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Apply `update` to an existing record, atomically.
  fn update_item<'a>(
    &'a self,
    table: &'a str,
    key: &'a Key,
    update: &'a UpdateExpression,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + 'a;

  /// Remove the record under `key`. Removing a missing record succeeds.
  fn delete_item<'a>(
    &'a self,
    table: &'a str,
    key: &'a Key,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Every record in `table`.
  fn scan<'a>(
    &'a self,
    table: &'a str,
  ) -> impl Future<Output = Result<Vec<Item>, Self::Error>> + Send + 'a;
}

/// Binary blob store addressed by string keys.
pub trait ObjectStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Upload `body` under `key`, overwriting any existing object.
  fn put_object<'a>(
    &'a self,
    key: &'a str,
    content_type: &'a str,
    body: Bytes,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
