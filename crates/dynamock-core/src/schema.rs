//! Entity schemas sharing a single table.
//!
//! A [`Schema`] describes one record type: its key columns with the value
//! prefixes that tag rows of that type, and the attributes the type declares.
//! Trying each schema in turn against a raw row recovers which type the row
//! belongs to.

use std::collections::{BTreeMap, HashMap, HashSet};

use dynamock_model::AttributeValue;
use dynamock_model::input::UpdateItemInput;
use dynamock_model::types::Item;

use crate::codec::{self, CodecError, DataType, NativeValue};
use crate::config::TableConfig;
use crate::index::KeyRole;

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// A declared attribute of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Friendly name used by callers.
    pub name: String,
    /// Declared data type.
    pub data_type: DataType,
    /// Stored attribute name, when it differs from `name`.
    pub key: Option<String>,
    /// Key role this column fills, if any.
    pub role: Option<KeyRole>,
    /// Prefix that values of this column carry in the table.
    pub value_prefix: Option<String>,
    /// Computed columns are written but never decoded back.
    pub computed: bool,
    /// Declared children of a map column.
    pub children: Vec<Column>,
}

impl Column {
    /// A plain column stored under its own name.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            key: None,
            role: None,
            value_prefix: None,
            computed: false,
            children: Vec::new(),
        }
    }

    /// A string key column stored under `key` with values starting with `prefix`.
    #[must_use]
    pub fn indexed(
        name: impl Into<String>,
        key: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self::new(name, DataType::String)
            .with_key(key)
            .with_prefix(prefix)
    }

    /// A string column filling `role`, stored under the role's conventional
    /// attribute name until [`Schema::for_table`] resolves it.
    #[must_use]
    pub fn keyed(name: impl Into<String>, role: KeyRole, prefix: impl Into<String>) -> Self {
        Self {
            role: Some(role),
            ..Self::indexed(name, role.default_attribute(), prefix)
        }
    }

    /// The partition key column.
    #[must_use]
    pub fn partition(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::keyed(name, KeyRole::Partition, prefix)
    }

    /// The sort key column.
    #[must_use]
    pub fn sort(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::keyed(name, KeyRole::Sort, prefix)
    }

    /// The first global index key column.
    #[must_use]
    pub fn global_first(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::keyed(name, KeyRole::FirstGlobal, prefix)
    }

    /// The second global index key column.
    #[must_use]
    pub fn global_second(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::keyed(name, KeyRole::SecondGlobal, prefix)
    }

    /// The third global index key column.
    #[must_use]
    pub fn global_third(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::keyed(name, KeyRole::ThirdGlobal, prefix)
    }

    /// A map column with declared children.
    #[must_use]
    pub fn map(name: impl Into<String>, children: Vec<Column>) -> Self {
        Self {
            children,
            ..Self::new(name, DataType::Map)
        }
    }

    /// Store this column under a different attribute name.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the value prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.value_prefix = Some(prefix.into());
        self
    }

    /// Mark the column as computed.
    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Store a key column under the attribute `config` names for its role.
    #[must_use]
    fn for_table(mut self, config: &TableConfig) -> Self {
        if let Some(attr) = self.role.and_then(|role| config.attribute(role)) {
            self.key = Some(attr.to_owned());
        }
        self
    }

    /// The attribute name this column is stored under.
    #[must_use]
    pub fn attribute_name(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.name)
    }

    /// The value prefix, or the empty string.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.value_prefix.as_deref().unwrap_or_default()
    }

    /// Encode a value for this column. See [`codec::encode`].
    pub fn encode(&self, value: &NativeValue) -> Result<Option<AttributeValue>, CodecError> {
        codec::encode(value, self)
    }

    /// Decode a stored value of this column. See [`codec::decode`].
    pub fn decode(&self, value: &AttributeValue) -> Result<NativeValue, CodecError> {
        codec::decode(value, self)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Decoded record values keyed by friendly column name.
pub type Values = BTreeMap<String, NativeValue>;

/// Immutable description of one record type stored in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Partition key column.
    pub partition_key: Column,
    /// Sort key column, if the type has one.
    pub sort_key: Option<Column>,
    /// Declared non-key columns.
    pub columns: Vec<Column>,
    /// Bookkeeping columns every record type carries.
    pub common: Vec<Column>,
    /// The table's sort key attribute; a row of a type without a sort column
    /// must not carry it.
    pub table_sort_key: Option<String>,
}

impl Schema {
    /// Create a schema over a table with the default key names. The common
    /// columns are added implicitly.
    #[must_use]
    pub fn new(partition_key: Column, sort_key: Option<Column>, columns: Vec<Column>) -> Self {
        Self {
            partition_key,
            sort_key,
            columns,
            common: vec![
                Column::new("created_at", DataType::Datetime),
                Column::new("updated_at", DataType::Datetime),
                Column::new("expires_at", DataType::Timestamp),
            ],
            table_sort_key: Some(KeyRole::Sort.default_attribute().to_owned()),
        }
    }

    /// Rebind key columns to the attribute names of a table configured by
    /// `config`.
    #[must_use]
    pub fn for_table(self, config: &TableConfig) -> Self {
        Self {
            partition_key: self.partition_key.for_table(config),
            sort_key: self.sort_key.map(|column| column.for_table(config)),
            columns: self
                .columns
                .into_iter()
                .map(|column| column.for_table(config))
                .collect(),
            common: self.common,
            table_sort_key: config.sort_key.clone(),
        }
    }

    /// Declared columns followed by the common columns.
    pub fn all_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().chain(self.common.iter())
    }

    fn sort_key_name(&self) -> Option<&str> {
        match &self.sort_key {
            Some(column) => Some(column.attribute_name()),
            None => self.table_sort_key.as_deref(),
        }
    }

    /// Returns `true` when `row` is a record of this type.
    ///
    /// The partition value must start with the partition prefix. A row has a
    /// sort value exactly when the schema declares a sort column, and that
    /// value must start with the sort prefix. Every other attribute of the row
    /// must be declared by the schema.
    #[must_use]
    pub fn matches(&self, row: &Item) -> bool {
        let partition_name = self.partition_key.attribute_name();
        let Some(partition) = row.get(partition_name).and_then(AttributeValue::as_s) else {
            return false;
        };
        if !partition.starts_with(self.partition_key.prefix()) {
            return false;
        }

        let sort_name = self.sort_key_name();
        let sort = sort_name
            .and_then(|name| row.get(name))
            .and_then(AttributeValue::as_s);
        match (&self.sort_key, sort) {
            (None, Some(_)) | (Some(_), None) => return false,
            (Some(column), Some(value)) if !value.starts_with(column.prefix()) => return false,
            _ => {}
        }

        let declared: HashSet<&str> = self.all_columns().map(Column::attribute_name).collect();
        row.keys()
            .filter(|name| name.as_str() != partition_name && Some(name.as_str()) != sort_name)
            .all(|name| declared.contains(name.as_str()))
    }

    /// Returns the first schema among `candidates` that matches `row`.
    #[must_use]
    pub fn first_match<'a>(candidates: &[&'a Schema], row: &Item) -> Option<&'a Schema> {
        candidates.iter().copied().find(|schema| schema.matches(row))
    }

    /// Decode a matching row into friendly column names.
    ///
    /// Returns `Ok(None)` when the row does not match this schema. Computed
    /// columns are skipped, as are columns whose friendly name is already
    /// taken by a key column.
    pub fn decode_row(&self, row: &Item) -> Result<Option<Values>, CodecError> {
        if !self.matches(row) {
            return Ok(None);
        }

        let mut values = Values::new();
        for column in std::iter::once(&self.partition_key).chain(self.sort_key.as_ref()) {
            if column.computed {
                continue;
            }
            if let Some(raw) = row.get(column.attribute_name()) {
                values.insert(column.name.clone(), column.decode(raw)?);
            }
        }

        for column in self.all_columns() {
            if column.computed || values.contains_key(&column.name) {
                continue;
            }
            if let Some(raw) = row.get(column.attribute_name()) {
                values.insert(column.name.clone(), column.decode(raw)?);
            }
        }
        Ok(Some(values))
    }

    /// Build a row from friendly values. Null and empty values are omitted.
    pub fn encode_values(&self, values: &Values) -> Result<Item, CodecError> {
        let mut item = Item::new();
        let key_columns = std::iter::once(&self.partition_key).chain(self.sort_key.as_ref());
        for column in key_columns.chain(self.all_columns()) {
            let Some(value) = values.get(&column.name) else {
                continue;
            };
            if let Some(encoded) = column.encode(value)? {
                item.insert(column.attribute_name().to_owned(), encoded);
            }
        }
        Ok(item)
    }

    /// Build an upsert request for the record described by `values`.
    ///
    /// Columns absent from `values` are left unchanged; null or empty values
    /// are removed; `created_at` is only set when the row does not have one
    /// yet. Placeholders follow the `#kN`/`:vN` convention, `N` being the
    /// column position.
    pub fn update_item_input(
        &self,
        table_name: impl Into<String>,
        values: &Values,
    ) -> Result<UpdateItemInput, CodecError> {
        let mut key = Item::new();
        for column in std::iter::once(&self.partition_key).chain(self.sort_key.as_ref()) {
            let Some(value) = values.get(&column.name) else {
                continue;
            };
            if let Some(encoded) = column.encode(value)? {
                key.insert(column.attribute_name().to_owned(), encoded);
            }
        }

        let mut sets = Vec::new();
        let mut removes = Vec::new();
        let mut names = HashMap::new();
        let mut attribute_values = HashMap::new();
        for (index, column) in self.all_columns().enumerate() {
            let Some(value) = values.get(&column.name) else {
                continue;
            };
            let name_code = format!("#k{index}");
            let value_code = format!(":v{index}");
            names.insert(name_code.clone(), column.attribute_name().to_owned());

            match column.encode(value)? {
                None => removes.push(name_code),
                Some(encoded) => {
                    attribute_values.insert(value_code.clone(), encoded);
                    if column.name == "created_at" {
                        sets.push(format!(
                            "{name_code}=if_not_exists({name_code}, {value_code})"
                        ));
                    } else {
                        sets.push(format!("{name_code}={value_code}"));
                    }
                }
            }
        }

        let mut clauses = Vec::new();
        if !sets.is_empty() {
            clauses.push(format!("SET {}", sets.join(", ")));
        }
        if !removes.is_empty() {
            clauses.push(format!("REMOVE {}", removes.join(", ")));
        }

        Ok(UpdateItemInput {
            table_name: table_name.into(),
            key,
            update_expression: (!clauses.is_empty()).then(|| clauses.join(" ")),
            expression_attribute_names: names,
            expression_attribute_values: attribute_values,
        })
    }
}
