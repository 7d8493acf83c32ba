//! The resource operation lifecycle.
//!
//! [`Catalog`] is written once against [`Resource`] and the two capability
//! traits. Every operation runs to completion or stops at the first failure;
//! nothing is retried.

use std::sync::Arc;

use chrono::Utc;
use facility_core::{
  Error as CoreError,
  attr::{self, Key},
  ingest::{self, AssetLocator},
  resource::{IdentityPolicy, Patch, Resource},
  store::{ObjectStore, TableStore, UpdateOutcome},
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{ApiError, config::TableNames};

/// Capability handles and settings shared by every request.
pub struct Catalog<T, O> {
  tables:             Arc<T>,
  objects:            Arc<O>,
  table_names:        Arc<TableNames>,
  locator:            Arc<AssetLocator>,
  upload_concurrency: usize,
}

impl<T, O> Clone for Catalog<T, O> {
  fn clone(&self) -> Self {
    Self {
      tables:             Arc::clone(&self.tables),
      objects:            Arc::clone(&self.objects),
      table_names:        Arc::clone(&self.table_names),
      locator:            Arc::clone(&self.locator),
      upload_concurrency: self.upload_concurrency,
    }
  }
}

impl<T, O> Catalog<T, O>
where
  T: TableStore,
  O: ObjectStore,
{
  pub fn new(
    tables: Arc<T>,
    objects: Arc<O>,
    table_names: TableNames,
    locator: AssetLocator,
    upload_concurrency: usize,
  ) -> Self {
    Self {
      tables,
      objects,
      table_names: Arc::new(table_names),
      locator: Arc::new(locator),
      upload_concurrency,
    }
  }

  pub fn tables(&self) -> &T { &self.tables }

  pub fn objects(&self) -> &O { &self.objects }

  fn table<R: Resource>(&self) -> &str { self.table_names.get(R::KIND) }

  fn not_found<R: Resource>(id: &str) -> ApiError {
    ApiError::NotFound(format!("{} with ID {id} not found", R::KIND.title()))
  }

  /// Assign identity and creation time, ingest binaries, then persist.
  ///
  /// The record is written only after every upload succeeded.
  #[instrument(skip_all, fields(kind = %R::KIND))]
  pub async fn create<R: Resource>(&self, mut record: R) -> Result<R, ApiError> {
    match R::IDENTITY {
      IdentityPolicy::Generated => record.set_id(Uuid::new_v4().to_string()),
      IdentityPolicy::CallerSupplied if record.id().is_empty() => {
        return Err(ApiError::Validation(format!(
          "{} is required",
          R::KEY_ATTRIBUTE
        )));
      }
      IdentityPolicy::CallerSupplied => {}
    }
    record.set_date_created(Utc::now());
    attr::check_item(&record.to_item()).map_err(|e| ApiError::Validation(e.to_string()))?;

    let id = record.id().to_owned();
    let rewritten = ingest::ingest(
      &*self.objects,
      &self.locator,
      &id,
      record.binary_slots(),
      self.upload_concurrency,
    )
    .await
    .map_err(|e| ApiError::dependency(format!("Error storing {} binaries", R::KIND), e))?;
    debug!(id = %id, rewritten, "binary fields ingested");

    self
      .tables
      .put_item(self.table::<R>(), record.to_item())
      .await
      .map_err(|e| {
        ApiError::dependency(format!("Error inserting {} into table store", R::KIND), e)
      })?;

    info!(id = %id, "record created");
    Ok(record)
  }

  #[instrument(skip(self), fields(kind = %R::KIND))]
  pub async fn read_one<R: Resource>(&self, id: &str) -> Result<R, ApiError> {
    let key = Key::new(R::KEY_ATTRIBUTE, id);
    let item = self
      .tables
      .get_item(self.table::<R>(), &key)
      .await
      .map_err(|e| ApiError::dependency(format!("Error finding {}", R::KIND), e))?
      .ok_or_else(|| Self::not_found::<R>(id))?;

    R::from_item(item)
      .map_err(|e| ApiError::dependency(format!("Error decoding stored {}", R::KIND), e))
  }

  #[instrument(skip(self), fields(kind = %R::KIND))]
  pub async fn read_all<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
    let items = self
      .tables
      .scan(self.table::<R>())
      .await
      .map_err(|e| ApiError::dependency(format!("Error fetching {} records", R::KIND), e))?;

    items
      .into_iter()
      .map(R::from_item)
      .collect::<Result<Vec<_>, _>>()
      .map_err(|e| ApiError::dependency(format!("Error decoding stored {}", R::KIND), e))
  }

  /// Set exactly the fields present in `patch` on an existing record.
  #[instrument(skip_all, fields(kind = %R::KIND, id = %patch.id()))]
  pub async fn update<R: Resource>(&self, patch: R::Patch) -> Result<String, ApiError> {
    let id = patch.id();
    if id.is_empty() {
      return Err(ApiError::Validation(format!("{} is required", R::KEY_ATTRIBUTE)));
    }

    let update = match patch.update().build() {
      Ok(update) => update,
      Err(CoreError::EmptyUpdate) => {
        return Err(ApiError::Validation(format!(
          "{} {id} update has no fields to set",
          R::KEY_ATTRIBUTE
        )));
      }
      Err(e @ CoreError::NumberOutOfRange { .. }) => {
        return Err(ApiError::Validation(e.to_string()));
      }
      Err(e) => {
        return Err(ApiError::dependency("Failed to build update expression", e));
      }
    };

    let key = Key::new(R::KEY_ATTRIBUTE, id);
    let outcome = self
      .tables
      .update_item(self.table::<R>(), &key, &update)
      .await
      .map_err(|e| ApiError::dependency("Error updating item in table store", e))?;

    match outcome {
      UpdateOutcome::Updated => {
        info!(fields = update.len(), "record updated");
        Ok(format!("{} {id} updated successfully", R::KEY_ATTRIBUTE))
      }
      UpdateOutcome::Missing => Err(Self::not_found::<R>(id)),
    }
  }

  /// Remove a record. Deleting an absent record succeeds.
  #[instrument(skip(self), fields(kind = %R::KIND))]
  pub async fn delete<R: Resource>(&self, id: &str) -> Result<String, ApiError> {
    let key = Key::new(R::KEY_ATTRIBUTE, id);
    self
      .tables
      .delete_item(self.table::<R>(), &key)
      .await
      .map_err(|e| ApiError::dependency("Error deleting item from table store", e))?;

    info!("record deleted");
    Ok(format!("{} {id} deleted successfully", R::KEY_ATTRIBUTE))
  }
}
