use std::marker::PhantomData;
use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::attributes::{from_item, to_item};
use crate::errors::{UtilError, log_error};

/// Table coordinates captured when a [`KeyValueTable`] is built.
///
/// The binding is a snapshot: editing the originating `ServiceConfig`
/// afterwards does not change a table that already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBinding {
    /// Environment-prefixed table name.
    pub table: String,
    /// Partition key attribute used for lookups.
    pub search_param: String,
    pub region: String,
    /// Rust type name of the records stored in the table.
    pub record_type: String,
}

/// Typed wrapper over one DynamoDB table storing records of type `T`.
#[derive(Debug, Clone)]
pub struct KeyValueTable<T> {
    client: DynamoClient,
    binding: Arc<TableBinding>,
    _record: PhantomData<fn() -> T>,
}

impl<T> KeyValueTable<T>
where
    T: Serialize + DeserializeOwned,
{
    #[must_use]
    pub fn new(client: DynamoClient, binding: TableBinding) -> Self {
        Self {
            client,
            binding: Arc::new(binding),
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn binding(&self) -> &TableBinding {
        &self.binding
    }

    /// Stores `record`, replacing any item with the same search key.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is not a JSON object, lacks the search
    /// key attribute, or the write fails.
    pub async fn put(&self, record: &T) -> Result<(), UtilError> {
        let document = serde_json::to_value(record)?;
        let item = to_item(&document)?;
        if !item.contains_key(&self.binding.search_param) {
            return Err(UtilError::SerializationError(format!(
                "record is missing search attribute {}",
                self.binding.search_param
            )));
        }

        self.client
            .put_item()
            .table_name(&self.binding.table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(UtilError::from)
            .inspect_err(log_error)?;
        debug!(table = %self.binding.table, "item stored");
        Ok(())
    }

    /// Fetches the record whose search key equals `search_value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the stored item does not
    /// deserialise into `T`.
    pub async fn get(&self, search_value: &str) -> Result<Option<T>, UtilError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.binding.table)
            .key(
                &self.binding.search_param,
                AttributeValue::S(search_value.to_string()),
            )
            .send()
            .await
            .map_err(UtilError::from)
            .inspect_err(log_error)?;

        let Some(item) = output.item else {
            return Ok(None);
        };
        let record = serde_json::from_value(from_item(&item)?)?;
        Ok(Some(record))
    }

    /// Removes the record whose search key equals `search_value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub async fn delete(&self, search_value: &str) -> Result<(), UtilError> {
        self.client
            .delete_item()
            .table_name(&self.binding.table)
            .key(
                &self.binding.search_param,
                AttributeValue::S(search_value.to_string()),
            )
            .send()
            .await
            .map_err(UtilError::from)
            .inspect_err(log_error)?;
        info!(table = %self.binding.table, "item deleted");
        Ok(())
    }
}
