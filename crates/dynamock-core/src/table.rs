//! In-memory table storage.
//!
//! Rows live in a [`BTreeMap`] keyed by their primary [`Key`], so scans and
//! queries return rows in key order. Index views are computed on the fly from
//! the stored rows; a row missing an index's key attributes is simply not part
//! of that view.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;
use tracing::debug;

use dynamock_model::AttributeValue;
use dynamock_model::types::Item;

use crate::codec::CodecError;
use crate::comparisons::Expectation;
use crate::config::TableConfig;
use crate::expression::{EvalContext, ExpressionError, parse_key_condition, parse_update};
use crate::index::IndexDefinition;
use crate::row::{FindCriteria, Key, Needles, Row};
use crate::schema::{Schema, Values};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A row with the same primary key already exists.
    #[error("row already exists for key ({partition}, {sort:?})")]
    DuplicateKey {
        /// Partition value.
        partition: String,
        /// Sort value.
        sort: Option<String>,
    },
    /// A required key attribute was not found in the item.
    #[error("missing required key attribute: {attr}")]
    MissingKeyAttribute {
        /// The name of the missing attribute.
        attr: String,
    },
    /// A key attribute has the wrong type.
    #[error("key attribute '{attr}' has wrong type: expected {expected}, got {actual}")]
    InvalidKeyType {
        /// The name of the attribute.
        attr: String,
        /// The expected type descriptor.
        expected: String,
        /// The actual type descriptor.
        actual: String,
    },
    /// An update expression targets a primary key attribute.
    #[error("Cannot update attribute {attr}. This attribute is part of the key")]
    KeyAttributeUpdate {
        /// The key attribute.
        attr: String,
    },
    /// An update expression could not be applied.
    #[error(transparent)]
    Expression(#[from] ExpressionError),
}

// ---------------------------------------------------------------------------
// MockTable
// ---------------------------------------------------------------------------

/// A single emulated table.
#[derive(Debug, Clone, Default)]
pub struct MockTable {
    config: TableConfig,
    rows: BTreeMap<Key, Row>,
}

impl MockTable {
    /// Create an empty table with the given key attribute names.
    #[must_use]
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            rows: BTreeMap::new(),
        }
    }

    /// The table's key attribute names.
    #[must_use]
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Number of stored rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows in primary key order.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.values()
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Extract the primary key of `item`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a key attribute is missing, empty, or neither
    /// a string nor a number.
    pub fn primary_key(&self, item: &Item) -> Result<Key, StorageError> {
        let partition = key_text(item, &self.config.partition_key)?;
        let sort = self
            .config
            .sort_key
            .as_deref()
            .map(|attr| key_text(item, attr))
            .transpose()?;
        Ok(Key::new(partition, sort.as_deref()))
    }

    fn is_primary_key_attribute(&self, name: &str) -> bool {
        name == self.config.partition_key || self.config.sort_key.as_deref() == Some(name)
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Insert a row from its key values and extra attributes.
    ///
    /// Global index values are stored under the configured global attribute
    /// names; they are skipped when the table has no such attribute.
    ///
    /// # Errors
    ///
    /// See [`MockTable::add_row`].
    pub fn add(
        &mut self,
        partition: &str,
        sort: Option<&str>,
        first_global: Option<&str>,
        second_global: Option<&str>,
        extra: Item,
    ) -> Result<&mut Self, StorageError> {
        let mut item = extra;
        let text = |value: &str| AttributeValue::S(value.to_owned());
        item.insert(self.config.partition_key.clone(), text(partition));
        let pairs = [
            (self.config.sort_key.as_ref(), sort),
            (self.config.first_global_index_key.as_ref(), first_global),
            (self.config.second_global_index_key.as_ref(), second_global),
        ];
        for (attr, value) in pairs {
            if let (Some(attr), Some(value)) = (attr, value) {
                item.insert(attr.clone(), text(value));
            }
        }
        self.add_row(item)
    }

    /// Insert a new row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateKey` if a row with the same primary key
    /// exists, or a key error if the item lacks its primary key.
    pub fn add_row(&mut self, item: Item) -> Result<&mut Self, StorageError> {
        let key = self.primary_key(&item)?;
        if self.rows.contains_key(&key) {
            return Err(StorageError::DuplicateKey {
                partition: key.partition,
                sort: key.sort,
            });
        }
        debug!(%key, "adding row");
        self.rows.insert(key, Row::new(item));
        Ok(self)
    }

    /// Insert several new rows, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`MockTable::add_row`].
    pub fn add_rows(&mut self, items: impl IntoIterator<Item = Item>) -> Result<&mut Self, StorageError> {
        for item in items {
            self.add_row(item)?;
        }
        Ok(self)
    }

    /// Merge `item` into the row with the same primary key, inserting it when
    /// absent. Empty string values remove attributes.
    ///
    /// # Errors
    ///
    /// Returns a key error if the item lacks its primary key.
    pub fn update_row(&mut self, item: Item) -> Result<&mut Self, StorageError> {
        let key = self.primary_key(&item)?;
        debug!(%key, "upserting row");
        match self.rows.get_mut(&key) {
            Some(row) => {
                row.update(item);
            }
            None => {
                self.rows.insert(key, Row::new(item));
            }
        }
        Ok(self)
    }

    /// Upsert several rows.
    ///
    /// # Errors
    ///
    /// See [`MockTable::update_row`].
    pub fn update_rows(&mut self, items: impl IntoIterator<Item = Item>) -> Result<&mut Self, StorageError> {
        for item in items {
            self.update_row(item)?;
        }
        Ok(self)
    }

    /// Apply an update expression to the row identified by `key_item`,
    /// creating the row from the key attributes when absent.
    ///
    /// Returns the row as stored after the update.
    ///
    /// # Errors
    ///
    /// Returns a key error if `key_item` lacks the primary key,
    /// `StorageError::KeyAttributeUpdate` if the expression sets or removes a
    /// primary key attribute, or `StorageError::Expression` if the expression
    /// cannot be applied. The table is unchanged on error.
    pub fn update_from_expression(
        &mut self,
        key_item: &Item,
        expression: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<&Row, StorageError> {
        let key = self.primary_key(key_item)?;
        let ops = parse_update(expression);
        let context = EvalContext::new(key_item, names, values);
        for op in &ops {
            let attr = context.resolve_name(&op.name)?;
            if self.is_primary_key_attribute(attr) {
                return Err(StorageError::KeyAttributeUpdate {
                    attr: attr.to_owned(),
                });
            }
        }

        let mut row = self
            .rows
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Row::new(key_item.clone()));
        row.apply_updates(&ops, names, values)?;
        debug!(%key, expression, "applied update expression");

        let stored = self.rows.entry(key).or_default();
        *stored = row;
        Ok(stored)
    }

    /// Remove the row with `key`. Returns the removed row, if any.
    pub fn delete_key(&mut self, key: &Key) -> Option<Row> {
        let removed = self.rows.remove(key);
        debug!(%key, removed = removed.is_some(), "deleting row");
        removed
    }

    /// Remove the row sharing the primary key of `item`.
    ///
    /// # Errors
    ///
    /// Returns a key error if the item lacks its primary key.
    pub fn delete_row(&mut self, item: &Item) -> Result<Option<Row>, StorageError> {
        let key = self.primary_key(item)?;
        Ok(self.delete_key(&key))
    }

    /// Remove several rows by their primary keys.
    ///
    /// # Errors
    ///
    /// See [`MockTable::delete_row`].
    pub fn delete_rows<'a>(
        &mut self,
        items: impl IntoIterator<Item = &'a Item>,
    ) -> Result<&mut Self, StorageError> {
        for item in items {
            self.delete_row(item)?;
        }
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The row with primary key `key`.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Row> {
        self.rows.get(key)
    }

    /// The first row, in primary key order, whose key under `index` is `key`.
    #[must_use]
    pub fn get_row_from_index(&self, index: &IndexDefinition, key: &Key) -> Option<&Row> {
        self.rows()
            .find(|row| row.key(index, &self.config).as_ref() == Some(key))
    }

    /// Rows in partition `partition` whose sort value starts with
    /// `sort_prefix`.
    #[must_use]
    pub fn get_rows(&self, partition: &str, sort_prefix: Option<&str>) -> Vec<&Row> {
        let prefix = sort_prefix.unwrap_or_default();
        self.rows
            .iter()
            .filter(|(key, _)| key.partition == partition && key.sort_starts(prefix))
            .map(|(_, row)| row)
            .collect()
    }

    /// Like [`MockTable::get_rows`], over the view of `index`.
    #[must_use]
    pub fn get_rows_for_index(
        &self,
        index: &IndexDefinition,
        partition: &str,
        sort_prefix: Option<&str>,
    ) -> Vec<&Row> {
        let prefix = sort_prefix.unwrap_or_default();
        self.rows()
            .filter(|row| {
                row.key(index, &self.config)
                    .is_some_and(|key| key.partition == partition && key.sort_starts(prefix))
            })
            .collect()
    }

    /// Rows of the `index` view satisfying a key-condition expression.
    ///
    /// `None` for `index` selects every row of the table.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError` if the expression cannot be parsed or its
    /// placeholders cannot be resolved.
    pub fn query(
        &self,
        index: Option<&IndexDefinition>,
        key_condition: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<Vec<&Row>, ExpressionError> {
        let conditions = parse_key_condition(key_condition)?;
        let mut matches = Vec::new();
        for row in self.rows() {
            if index.is_some_and(|index| row.key(index, &self.config).is_none()) {
                continue;
            }
            if EvalContext::new(row.item(), names, values).evaluate_all(&conditions)? {
                matches.push(row);
            }
        }
        Ok(matches)
    }

    /// Decoded rows satisfying every needle.
    pub fn find_rows(&self, needles: &Needles) -> Result<Vec<Values>, CodecError> {
        let criteria = FindCriteria::new(needles);
        self.rows()
            .filter(|row| row.is_find_match(&criteria))
            .map(Row::deserialize)
            .collect()
    }

    /// Rows satisfying every needle and matching `schema`, decoded into its
    /// friendly column names.
    pub fn find_rows_matching(&self, needles: &Needles, schema: &Schema) -> Result<Vec<Values>, CodecError> {
        let criteria = FindCriteria::new(needles);
        let mut records = Vec::new();
        for row in self.rows().filter(|row| row.is_find_match(&criteria)) {
            if let Some(values) = schema.decode_row(row.item())? {
                records.push(values);
            }
        }
        Ok(records)
    }

    /// Every row matching `schema`, decoded into its friendly column names.
    pub fn all_rows_matching(&self, schema: &Schema) -> Result<Vec<Values>, CodecError> {
        self.find_rows_matching(&Needles::new(), schema)
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Panic unless a row with primary key `key` exists.
    pub fn assert_has_key(&self, key: &Key) {
        assert!(self.rows.contains_key(key), "Expected to find a row with the key {key}.");
    }

    /// Panic unless the row with primary key `key` exists and satisfies every
    /// expectation.
    pub fn assert_row_values(&self, key: &Key, expectations: &[(&str, Expectation)]) {
        let row = self
            .get(key)
            .unwrap_or_else(|| panic!("Expected to find a row with the key {key}."));
        assert_values(row, expectations);
    }

    /// Panic unless every row in `partition` whose sort value starts with
    /// `sort_prefix` satisfies every expectation.
    ///
    /// Also panics when no row is selected, unless `allow_no_matches` is set.
    pub fn assert_matching_row_values(
        &self,
        partition: &str,
        sort_prefix: Option<&str>,
        expectations: &[(&str, Expectation)],
        allow_no_matches: bool,
    ) {
        let rows = self.get_rows(partition, sort_prefix);
        assert!(
            allow_no_matches || !rows.is_empty(),
            "Expected to find at least one row matching ({partition}, {sort_prefix:?})."
        );
        for row in rows {
            assert_values(row, expectations);
        }
    }
}

fn key_text(item: &Item, attr: &str) -> Result<String, StorageError> {
    let value = item
        .get(attr)
        .ok_or_else(|| StorageError::MissingKeyAttribute {
            attr: attr.to_owned(),
        })?;
    let text = value.as_text().ok_or_else(|| StorageError::InvalidKeyType {
        attr: attr.to_owned(),
        expected: "S".to_owned(),
        actual: value.type_descriptor().to_owned(),
    })?;
    if text.is_empty() {
        return Err(StorageError::MissingKeyAttribute {
            attr: attr.to_owned(),
        });
    }
    Ok(text.to_owned())
}

fn assert_values(row: &Row, expectations: &[(&str, Expectation)]) {
    let values = row
        .deserialize()
        .unwrap_or_else(|e| panic!("Failed to decode row {:?}: {e}", row.item()));
    for (name, expectation) in expectations {
        expectation.assert(name, values.get(*name));
    }
}
