//! [`TableStore`] on DynamoDB.

use std::collections::HashMap;

use aws_config::SdkConfig;
use aws_sdk_dynamodb::{
  Client,
  error::{DisplayErrorContext, SdkError},
  operation::update_item::UpdateItemError,
  types::AttributeValue as Sdk,
};
use facility_core::{
  attr::{Item, Key},
  store::{TableStore, UpdateOutcome},
  update::UpdateExpression,
};
use tracing::{debug, instrument};

use crate::{
  Error, Result,
  convert::{SdkItem, from_sdk_item, to_sdk, to_sdk_item},
};

/// Name placeholder reserved for the key attribute in update conditions.
const KEY_PLACEHOLDER: &str = "#key";

#[derive(Debug, Clone)]
pub struct DynamoTableStore {
  client: Client,
}

impl DynamoTableStore {
  pub fn new(client: Client) -> Self { Self { client } }

  /// Build a client from shared AWS config, optionally pointed at a local
  /// endpoint (DynamoDB Local, LocalStack).
  pub fn from_sdk_config(sdk_config: &SdkConfig, endpoint_url: Option<&str>) -> Self {
    let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
    if let Some(endpoint_url) = endpoint_url {
      builder = builder.endpoint_url(endpoint_url);
    }
    Self::new(Client::from_conf(builder.build()))
  }
}

fn sdk_key(key: &Key) -> SdkItem {
  HashMap::from([(key.attribute.clone(), Sdk::S(key.value.clone()))])
}

fn failed<E>(operation: &'static str, table: &str, err: SdkError<E>) -> Error
where
  E: std::error::Error + 'static,
{
  Error::Dynamo {
    operation,
    table: table.to_owned(),
    message: DisplayErrorContext(&err).to_string(),
  }
}

fn is_conditional_check_failed(err: &SdkError<UpdateItemError>) -> bool {
  matches!(
    err.as_service_error(),
    Some(UpdateItemError::ConditionalCheckFailedException(_))
  )
}

impl TableStore for DynamoTableStore {
  type Error = Error;

  #[instrument(skip(self, key), fields(key = %key.value))]
  async fn get_item(&self, table: &str, key: &Key) -> Result<Option<Item>> {
    let output = self
      .client
      .get_item()
      .table_name(table)
      .set_key(Some(sdk_key(key)))
      .send()
      .await
      .map_err(|e| failed("GetItem", table, e))?;

    output.item().cloned().map(from_sdk_item).transpose()
  }

  #[instrument(skip(self, item), fields(attributes = item.len()))]
  async fn put_item(&self, table: &str, item: Item) -> Result<()> {
    self
      .client
      .put_item()
      .table_name(table)
      .set_item(Some(to_sdk_item(item)))
      .send()
      .await
      .map_err(|e| failed("PutItem", table, e))?;
    Ok(())
  }

  #[instrument(skip(self, key, update), fields(key = %key.value, assignments = update.len()))]
  async fn update_item(
    &self,
    table: &str,
    key: &Key,
    update: &UpdateExpression,
  ) -> Result<UpdateOutcome> {
    let mut names: HashMap<String, String> = update
      .names
      .iter()
      .map(|(placeholder, name)| (placeholder.clone(), name.clone()))
      .collect();
    names.insert(KEY_PLACEHOLDER.to_owned(), key.attribute.clone());

    let values: SdkItem = update
      .values
      .iter()
      .map(|(placeholder, value)| (placeholder.clone(), to_sdk(value.clone())))
      .collect();

    let result = self
      .client
      .update_item()
      .table_name(table)
      .set_key(Some(sdk_key(key)))
      .update_expression(&update.expression)
      .condition_expression(format!("attribute_exists({KEY_PLACEHOLDER})"))
      .set_expression_attribute_names(Some(names))
      .set_expression_attribute_values(Some(values))
      .send()
      .await;

    match result {
      Ok(_) => Ok(UpdateOutcome::Updated),
      Err(e) if is_conditional_check_failed(&e) => {
        debug!("update target does not exist");
        Ok(UpdateOutcome::Missing)
      }
      Err(e) => Err(failed("UpdateItem", table, e)),
    }
  }

  #[instrument(skip(self, key), fields(key = %key.value))]
  async fn delete_item(&self, table: &str, key: &Key) -> Result<()> {
    self
      .client
      .delete_item()
      .table_name(table)
      .set_key(Some(sdk_key(key)))
      .send()
      .await
      .map_err(|e| failed("DeleteItem", table, e))?;
    Ok(())
  }

  #[instrument(skip(self))]
  async fn scan(&self, table: &str) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut start_key = None;

    loop {
      let output = self
        .client
        .scan()
        .table_name(table)
        .set_exclusive_start_key(start_key.take())
        .send()
        .await
        .map_err(|e| failed("Scan", table, e))?;

      for item in output.items() {
        items.push(from_sdk_item(item.clone())?);
      }

      match output.last_evaluated_key() {
        Some(key) if !key.is_empty() => start_key = Some(key.clone()),
        _ => break,
      }
    }

    debug!(count = items.len(), "scanned table");
    Ok(items)
  }
}
