//! The client facade over one [`MockTable`].
//!
//! Mirrors the subset of the DynamoDB client used by the data layer. Table
//! names in requests are accepted as given; every request targets the single
//! emulated table.

use std::collections::HashMap;

use tracing::debug;

use dynamock_model::error::DynamoDBError;
use dynamock_model::input::{
    BatchWriteItemInput, DeleteItemInput, GetItemInput, TransactWriteItemsInput, UpdateItemInput,
};
use dynamock_model::operations::PaginatedOperation;
use dynamock_model::output::{
    BatchWriteItemOutput, DeleteItemOutput, GetItemOutput, TransactWriteItemsOutput,
    UpdateItemOutput,
};
use dynamock_model::types::{Item, TransactWriteItem};

use crate::config::TableConfig;
use crate::error::storage_error_to_dynamodb;
use crate::paginator::{Paginator, QueryPaginator, ScanPaginator};
use crate::table::MockTable;

/// In-process stand-in for a DynamoDB client bound to one table.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    table: MockTable,
}

impl MockClient {
    /// Create a client over an empty table.
    #[must_use]
    pub fn new(config: TableConfig) -> Self {
        Self {
            table: MockTable::new(config),
        }
    }

    /// Create a client configured from `DYNAMOCK_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(TableConfig::from_env())
    }

    /// The backing table.
    #[must_use]
    pub fn table(&self) -> &MockTable {
        &self.table
    }

    /// The backing table, for seeding rows directly.
    pub fn table_mut(&mut self) -> &mut MockTable {
        &mut self.table
    }

    /// Handle `GetItem`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationException` if the key is malformed.
    pub fn get_item(&self, input: &GetItemInput) -> Result<GetItemOutput, DynamoDBError> {
        let key = self
            .table
            .primary_key(&input.key)
            .map_err(storage_error_to_dynamodb)?;
        let item = self.table.get(&key).map(|row| row.item().clone());
        debug!(table = %input.table_name, %key, found = item.is_some(), "get_item");
        Ok(GetItemOutput {
            item,
            ..GetItemOutput::default()
        })
    }

    /// Handle `UpdateItem`. The row is created from the key when absent.
    ///
    /// # Errors
    ///
    /// Returns `ValidationException` if the key is malformed or the update
    /// expression references unknown placeholders.
    pub fn update_item(&mut self, input: &UpdateItemInput) -> Result<UpdateItemOutput, DynamoDBError> {
        debug!(table = %input.table_name, "update_item");
        let row = self
            .table
            .update_from_expression(
                &input.key,
                input.update_expression.as_deref().unwrap_or_default(),
                &input.expression_attribute_names,
                &input.expression_attribute_values,
            )
            .map_err(storage_error_to_dynamodb)?;
        Ok(UpdateItemOutput {
            attributes: row.item().clone(),
            ..UpdateItemOutput::default()
        })
    }

    /// Handle `DeleteItem`. Deleting a missing row succeeds with no
    /// attributes.
    ///
    /// # Errors
    ///
    /// Returns `ValidationException` if the key is malformed.
    pub fn delete_item(&mut self, input: &DeleteItemInput) -> Result<DeleteItemOutput, DynamoDBError> {
        debug!(table = %input.table_name, "delete_item");
        let removed = self
            .table
            .delete_row(&input.key)
            .map_err(storage_error_to_dynamodb)?;
        Ok(DeleteItemOutput {
            attributes: removed.map(|row| row.into_item()).unwrap_or_default(),
            ..DeleteItemOutput::default()
        })
    }

    /// Handle `BatchWriteItem`, applying every put and delete in order.
    ///
    /// # Errors
    ///
    /// Returns the first failure; earlier requests stay applied.
    pub fn batch_write_item(
        &mut self,
        input: &BatchWriteItemInput,
    ) -> Result<BatchWriteItemOutput, DynamoDBError> {
        for (table_name, requests) in &input.request_items {
            debug!(table = %table_name, requests = requests.len(), "batch_write_item");
            for request in requests {
                if let Some(put) = &request.put_request {
                    self.table
                        .add_row(put.item.clone())
                        .map_err(storage_error_to_dynamodb)?;
                }
                if let Some(delete) = &request.delete_request {
                    self.table
                        .delete_row(&delete.key)
                        .map_err(storage_error_to_dynamodb)?;
                }
            }
        }
        Ok(BatchWriteItemOutput::default())
    }

    /// Handle `TransactWriteItems`.
    ///
    /// Actions run in order against a copy of the table that replaces it only
    /// when every action succeeds. Condition checks are accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns `ValidationException` for an action that sets no operation or
    /// malformed keys, and `ConditionalCheckFailedException` when a put
    /// collides with an existing row. The table is unchanged on error.
    pub fn transact_write_items(
        &mut self,
        input: &TransactWriteItemsInput,
    ) -> Result<TransactWriteItemsOutput, DynamoDBError> {
        debug!(actions = input.transact_items.len(), "transact_write_items");
        let mut staged = self.table.clone();
        for action in &input.transact_items {
            apply_transact_action(&mut staged, action)?;
        }
        self.table = staged;
        Ok(TransactWriteItemsOutput {
            consumed_capacity: Vec::new(),
            item_collection_metrics: HashMap::new(),
        })
    }

    /// A paginator for `operation`, either `"query"` or `"scan"`.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedOperationException` for any other operation.
    pub fn get_paginator(&self, operation: &str) -> Result<Box<dyn Paginator + '_>, DynamoDBError> {
        match PaginatedOperation::from_name(operation) {
            Some(PaginatedOperation::Query) => Ok(Box::new(QueryPaginator::new(&self.table))),
            Some(PaginatedOperation::Scan) => Ok(Box::new(ScanPaginator::new(&self.table))),
            None => Err(DynamoDBError::unsupported_operation(operation)),
        }
    }

    /// Read every row in primary key order.
    #[must_use]
    pub fn scan_items(&self) -> Vec<Item> {
        self.table.rows().map(|row| row.item().clone()).collect()
    }
}

fn apply_transact_action(table: &mut MockTable, action: &TransactWriteItem) -> Result<(), DynamoDBError> {
    match action {
        TransactWriteItem { put: Some(put), .. } => {
            table
                .add_row(put.item.clone())
                .map_err(storage_error_to_dynamodb)?;
        }
        TransactWriteItem {
            delete: Some(delete),
            ..
        } => {
            table
                .delete_row(&delete.key)
                .map_err(storage_error_to_dynamodb)?;
        }
        TransactWriteItem {
            update: Some(update),
            ..
        } => {
            table
                .update_from_expression(
                    &update.key,
                    &update.update_expression,
                    &update.expression_attribute_names,
                    &update.expression_attribute_values,
                )
                .map_err(storage_error_to_dynamodb)?;
        }
        TransactWriteItem {
            condition_check: Some(check),
            ..
        } => {
            debug!(table = %check.table_name, "ignoring condition check");
        }
        _ => {
            return Err(DynamoDBError::validation(
                "TransactWriteItem must specify one of Put, Delete, Update or ConditionCheck",
            ));
        }
    }
    Ok(())
}
