//! Stored rows and their keys.

use std::collections::HashMap;
use std::fmt;

use dynamock_model::AttributeValue;
use dynamock_model::types::Item;
use regex::Regex;

use crate::codec::{self, CodecError, NativeValue};
use crate::comparisons::glob_to_regex;
use crate::config::TableConfig;
use crate::expression::{EvalContext, ExpressionError, UpdateOp, parse_update};
use crate::index::IndexDefinition;
use crate::schema::Values;

/// Find criteria: attribute name to the value it must hold. String values act
/// as shell-style globs against string attributes.
pub type Needles = HashMap<String, NativeValue>;

/// [`Needles`] prepared for matching many rows.
///
/// A string needle is a glob against a string attribute; every other needle
/// must equal the decoded attribute. A missing attribute never matches.
#[derive(Debug)]
pub struct FindCriteria<'a> {
    needles: &'a Needles,
    globs: HashMap<&'a str, Option<Regex>>,
}

impl<'a> FindCriteria<'a> {
    /// Compile the string needles. A pattern that does not compile matches
    /// nothing.
    #[must_use]
    pub fn new(needles: &'a Needles) -> Self {
        let globs = needles
            .iter()
            .filter_map(|(name, needle)| match needle {
                NativeValue::String(pattern) => {
                    Some((name.as_str(), glob_to_regex(pattern, false).ok()))
                }
                _ => None,
            })
            .collect();
        Self { needles, globs }
    }
}

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// The identity of a row under one index view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    /// Partition value.
    pub partition: String,
    /// Sort value, when the view has a sort key.
    pub sort: Option<String>,
}

impl Key {
    /// Create a key.
    #[must_use]
    pub fn new(partition: impl Into<String>, sort: Option<&str>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.map(str::to_owned),
        }
    }

    /// Returns `true` when the sort value starts with `prefix`. A missing sort
    /// value only matches the empty prefix.
    #[must_use]
    pub fn sort_starts(&self, prefix: &str) -> bool {
        self.sort.as_deref().unwrap_or_default().starts_with(prefix)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sort {
            Some(sort) => write!(f, "({}, {sort})", self.partition),
            None => write!(f, "({})", self.partition),
        }
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One stored row in wire form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    item: Item,
}

impl Row {
    /// Wrap `item`, dropping blank string values.
    #[must_use]
    pub fn new(mut item: Item) -> Self {
        item.retain(|_, v| !v.is_blank());
        Self { item }
    }

    /// The row's attributes.
    #[must_use]
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Consume the row into its attributes.
    #[must_use]
    pub fn into_item(self) -> Item {
        self.item
    }

    /// One attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.item.get(name)
    }

    fn key_text(&self, name: &str) -> Option<&str> {
        self.item
            .get(name)
            .and_then(AttributeValue::as_text)
            .filter(|text| !text.is_empty())
    }

    /// The row's key over the given attributes.
    ///
    /// `None` when the partition attribute, or the sort attribute if one is
    /// named, is missing or empty. Such rows are invisible to the view.
    #[must_use]
    pub fn key_for(&self, partition_attr: &str, sort_attr: Option<&str>) -> Option<Key> {
        let partition = self.key_text(partition_attr)?;
        let sort = match sort_attr {
            Some(attr) => Some(self.key_text(attr)?),
            None => None,
        };
        Some(Key::new(partition, sort))
    }

    /// The row's key under `index`, with key roles named by `config`.
    #[must_use]
    pub fn key(&self, index: &IndexDefinition, config: &TableConfig) -> Option<Key> {
        let (partition, sort) = index.attributes(config)?;
        self.key_for(partition, sort)
    }

    /// Merge `delta` into the row. Attributes set to an empty string are
    /// removed.
    pub fn update(&mut self, delta: Item) -> &mut Self {
        self.item.extend(delta);
        self.item.retain(|_, v| !v.is_blank());
        self
    }

    /// Apply an update expression to the row.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError` if a placeholder cannot be resolved. The row
    /// is unchanged on error.
    pub fn update_from_expression(
        &mut self,
        expression: &str,
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<&mut Self, ExpressionError> {
        self.apply_updates(&parse_update(expression), names, values)
    }

    /// Apply parsed update operations to the row.
    ///
    /// # Errors
    ///
    /// See [`Row::update_from_expression`].
    pub fn apply_updates(
        &mut self,
        ops: &[UpdateOp],
        names: &HashMap<String, String>,
        values: &HashMap<String, AttributeValue>,
    ) -> Result<&mut Self, ExpressionError> {
        let updated = EvalContext::new(&self.item, names, values).apply_updates(ops)?;
        self.item = updated;
        Ok(self)
    }

    /// Decode every attribute by the type its wire tag implies.
    pub fn deserialize(&self) -> Result<Values, CodecError> {
        self.item
            .iter()
            .map(|(name, value)| Ok((name.clone(), codec::decode_inferred(value)?)))
            .collect()
    }

    /// Returns `true` when every needle of `criteria` is satisfied.
    #[must_use]
    pub fn is_find_match(&self, criteria: &FindCriteria<'_>) -> bool {
        criteria.needles.iter().all(|(name, needle)| {
            let Some(value) = self.item.get(name) else {
                return false;
            };
            match (value, criteria.globs.get(name.as_str())) {
                (AttributeValue::S(text), Some(glob)) => {
                    glob.as_ref().is_some_and(|re| re.is_match(text))
                }
                _ => codec::decode_inferred(value).is_ok_and(|decoded| decoded == *needle),
            }
        })
    }
}

impl From<Item> for Row {
    fn from(item: Item) -> Self {
        Self::new(item)
    }
}
