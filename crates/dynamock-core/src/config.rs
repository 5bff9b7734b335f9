//! Table configuration.

use std::env;

use crate::index::KeyRole;

/// Attribute names used by the emulated table for its key roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Table name reported by the client facade.
    pub table_name: String,
    /// Partition key attribute name.
    pub partition_key: String,
    /// Sort key attribute name, if the table has one.
    pub sort_key: Option<String>,
    /// First global index key attribute name.
    pub first_global_index_key: Option<String>,
    /// Second global index key attribute name.
    pub second_global_index_key: Option<String>,
    /// Third global index key attribute name.
    pub third_global_index_key: Option<String>,
}

impl TableConfig {
    /// Create configuration from environment variables.
    ///
    /// An empty value disables the corresponding optional key.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            table_name: env::var("DYNAMOCK_TABLE_NAME").unwrap_or(defaults.table_name),
            partition_key: env::var("DYNAMOCK_PARTITION_KEY")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.partition_key),
            sort_key: env_optional("DYNAMOCK_SORT_KEY", defaults.sort_key),
            first_global_index_key: env_optional("DYNAMOCK_G1_KEY", defaults.first_global_index_key),
            second_global_index_key: env_optional(
                "DYNAMOCK_G2_KEY",
                defaults.second_global_index_key,
            ),
            third_global_index_key: env_optional("DYNAMOCK_G3_KEY", defaults.third_global_index_key),
        }
    }

    /// The attribute name playing `role`, if the table has one.
    #[must_use]
    pub fn attribute(&self, role: KeyRole) -> Option<&str> {
        match role {
            KeyRole::Partition => Some(&self.partition_key),
            KeyRole::Sort => self.sort_key.as_deref(),
            KeyRole::FirstGlobal => self.first_global_index_key.as_deref(),
            KeyRole::SecondGlobal => self.second_global_index_key.as_deref(),
            KeyRole::ThirdGlobal => self.third_global_index_key.as_deref(),
        }
    }

    /// Configuration for a table without a sort key.
    #[must_use]
    pub fn without_sort_key(mut self) -> Self {
        self.sort_key = None;
        self
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            table_name: "NA".to_owned(),
            partition_key: KeyRole::Partition.default_attribute().to_owned(),
            sort_key: Some(KeyRole::Sort.default_attribute().to_owned()),
            first_global_index_key: Some(KeyRole::FirstGlobal.default_attribute().to_owned()),
            second_global_index_key: Some(KeyRole::SecondGlobal.default_attribute().to_owned()),
            third_global_index_key: Some(KeyRole::ThirdGlobal.default_attribute().to_owned()),
        }
    }
}

fn env_optional(key: &str, default: Option<String>) -> Option<String> {
    match env::var(key) {
        Ok(v) if v.is_empty() => None,
        Ok(v) => Some(v),
        Err(_) => default,
    }
}
