//! DynamoDB output types for the emulated operations.
//!
//! All output structs use `PascalCase` JSON field naming to match the DynamoDB
//! wire protocol (`awsJson1_0`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{ConsumedCapacity, Item, ItemCollectionMetrics, WriteRequest};

// ---------------------------------------------------------------------------
// Item CRUD
// ---------------------------------------------------------------------------

/// Output for the `GetItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemOutput {
    /// A map of attribute names to `AttributeValue` objects for the retrieved
    /// item. Returns `None` if the item does not exist.
    pub item: Option<Item>,

    /// The capacity units consumed by the operation.
    #[serde(default)]
    pub consumed_capacity: ConsumedCapacity,
}

/// Output for the `UpdateItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateItemOutput {
    /// The complete item as it appears after the update.
    #[serde(default)]
    pub attributes: Item,

    /// The capacity units consumed by the operation.
    #[serde(default)]
    pub consumed_capacity: ConsumedCapacity,
}

/// Output for the `DeleteItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemOutput {
    /// The item as it appeared before the deletion; empty when nothing was deleted.
    #[serde(default)]
    pub attributes: Item,

    /// The capacity units consumed by the operation.
    #[serde(default)]
    pub consumed_capacity: ConsumedCapacity,

    /// Information about item collections modified by the operation.
    #[serde(default)]
    pub item_collection_metrics: ItemCollectionMetrics,
}

// ---------------------------------------------------------------------------
// Query & Scan
// ---------------------------------------------------------------------------

/// One page of a paginated `Query` or `Scan`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page {
    /// The items on this page.
    #[serde(default)]
    pub items: Vec<Item>,

    /// The number of items on this page.
    pub count: usize,
}

impl Page {
    /// Build a page holding `items`.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

// ---------------------------------------------------------------------------
// Batch & transactions
// ---------------------------------------------------------------------------

/// Output for the `BatchWriteItem` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchWriteItemOutput {
    /// A map of tables and their respective `WriteRequest` objects that were
    /// not processed. Always empty for the emulator.
    #[serde(default)]
    pub unprocessed_items: HashMap<String, Vec<WriteRequest>>,
}

/// Output for the `TransactWriteItems` operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactWriteItemsOutput {
    /// The capacity units consumed by the operation, per table.
    #[serde(default)]
    pub consumed_capacity: Vec<ConsumedCapacity>,

    /// Item collection metrics, per table.
    #[serde(default)]
    pub item_collection_metrics: HashMap<String, Vec<ItemCollectionMetrics>>,
}
