//! The fixed catalog of index views over the table.
//!
//! Each view names the key role acting as partition key and, optionally, the
//! one acting as sort key. Roles resolve to attribute names through the
//! table's [`TableConfig`]. Besides the primary view there is an inverted view
//! and, for each of the three global attributes, views pairing it with the
//! primary key attributes in both directions and with the other globals.

use crate::config::TableConfig;

use KeyRole::{FirstGlobal as G1, Partition as P, SecondGlobal as G2, Sort as S, ThirdGlobal as G3};

/// A key attribute role of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// The partition key.
    Partition,
    /// The sort key.
    Sort,
    /// The first global index key.
    FirstGlobal,
    /// The second global index key.
    SecondGlobal,
    /// The third global index key.
    ThirdGlobal,
}

impl KeyRole {
    /// Every role, primary key first.
    pub const ALL: [Self; 5] = [
        Self::Partition,
        Self::Sort,
        Self::FirstGlobal,
        Self::SecondGlobal,
        Self::ThirdGlobal,
    ];

    /// The conventional attribute name for this role.
    #[must_use]
    pub const fn default_attribute(self) -> &'static str {
        match self {
            Self::Partition => "pk",
            Self::Sort => "sk",
            Self::FirstGlobal => "g1k",
            Self::SecondGlobal => "g2k",
            Self::ThirdGlobal => "g3k",
        }
    }
}

/// One index view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexDefinition {
    /// Stable identifier.
    pub id: &'static str,
    /// Name used in `IndexName`; `None` for the table itself.
    pub name: Option<&'static str>,
    /// Role acting as partition key.
    pub partition_key: KeyRole,
    /// Role acting as sort key.
    pub sort_key: Option<KeyRole>,
}

const fn index(id: &'static str, partition_key: KeyRole, sort_key: KeyRole) -> IndexDefinition {
    IndexDefinition {
        id,
        name: Some(id),
        partition_key,
        sort_key: Some(sort_key),
    }
}

/// The table's primary key.
pub const STANDARD: IndexDefinition = IndexDefinition {
    id: "standard",
    name: None,
    partition_key: P,
    sort_key: Some(S),
};
/// `pk` / `g1k`
pub const PARTITION_G1: IndexDefinition = index("partition_g1", P, G1);
/// `pk` / `g2k`
pub const PARTITION_G2: IndexDefinition = index("partition_g2", P, G2);
/// `pk` / `g3k`
pub const PARTITION_G3: IndexDefinition = index("partition_g3", P, G3);

/// `sk` / `pk`
pub const INVERTED: IndexDefinition = index("inverted", S, P);
/// `sk` / `g1k`
pub const SORT_G1: IndexDefinition = index("sort_g1", S, G1);
/// `sk` / `g2k`
pub const SORT_G2: IndexDefinition = index("sort_g2", S, G2);
/// `sk` / `g3k`
pub const SORT_G3: IndexDefinition = index("sort_g3", S, G3);

/// `g1k` / `pk`
pub const G1_PARTITION: IndexDefinition = index("g1_partition", G1, P);
/// `g1k` / `sk`
pub const G1_SORT: IndexDefinition = index("g1_sort", G1, S);
/// `g1k` / `g2k`
pub const G1_G2: IndexDefinition = index("g1_g2", G1, G2);
/// `g1k` / `g3k`
pub const G1_G3: IndexDefinition = index("g1_g3", G1, G3);

/// `g2k` / `pk`
pub const G2_PARTITION: IndexDefinition = index("g2_partition", G2, P);
/// `g2k` / `sk`
pub const G2_SORT: IndexDefinition = index("g2_sort", G2, S);
/// `g2k` / `g1k`
pub const G2_G1: IndexDefinition = index("g2_g1", G2, G1);
/// `g2k` / `g3k`
pub const G2_G3: IndexDefinition = index("g2_g3", G2, G3);

/// `g3k` / `pk`
pub const G3_PARTITION: IndexDefinition = index("g3_partition", G3, P);
/// `g3k` / `sk`
pub const G3_SORT: IndexDefinition = index("g3_sort", G3, S);
/// `g3k` / `g1k`
pub const G3_G1: IndexDefinition = index("g3_g1", G3, G1);
/// `g3k` / `g2k`
pub const G3_G2: IndexDefinition = index("g3_g2", G3, G2);

/// Every index view.
pub const ALL: [IndexDefinition; 20] = [
    STANDARD,
    PARTITION_G1,
    PARTITION_G2,
    PARTITION_G3,
    INVERTED,
    SORT_G1,
    SORT_G2,
    SORT_G3,
    G1_PARTITION,
    G1_SORT,
    G1_G2,
    G1_G3,
    G2_PARTITION,
    G2_SORT,
    G2_G1,
    G2_G3,
    G3_PARTITION,
    G3_SORT,
    G3_G1,
    G3_G2,
];

impl IndexDefinition {
    /// Look up a view by id.
    #[must_use]
    pub fn by_id(id: &str) -> Option<Self> {
        ALL.into_iter().find(|index| index.id == id)
    }

    /// Look up a view by `IndexName`. `None` selects the table itself.
    #[must_use]
    pub fn by_name(name: Option<&str>) -> Option<Self> {
        match name {
            None => Some(STANDARD),
            Some(name) => ALL.into_iter().find(|index| index.name == Some(name)),
        }
    }

    /// The attribute names this view reads under `config`.
    ///
    /// `None` when the table lacks one of the view's roles, leaving the view
    /// empty. The table's own view drops a missing sort role instead, so a
    /// table without a sort key is keyed by partition alone.
    #[must_use]
    pub fn attributes<'a>(&self, config: &'a TableConfig) -> Option<(&'a str, Option<&'a str>)> {
        let partition = config.attribute(self.partition_key)?;
        let sort = match self.sort_key.map(|role| config.attribute(role)) {
            None => None,
            Some(Some(attr)) => Some(attr),
            Some(None) if self.name.is_none() => None,
            Some(None) => return None,
        };
        Some((partition, sort))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_should_have_unique_ids() {
        let ids: HashSet<_> = ALL.iter().map(|index| index.id).collect();
        assert_eq!(ids.len(), ALL.len());
    }

    #[test]
    fn test_should_pair_distinct_roles() {
        for index in ALL {
            assert_ne!(Some(index.partition_key), index.sort_key, "{}", index.id);
        }
        let config = TableConfig::default();
        assert_eq!(G3_G2.attributes(&config), Some(("g3k", Some("g2k"))));
        assert_eq!(INVERTED.attributes(&config), Some(("sk", Some("pk"))));
    }

    #[test]
    fn test_should_resolve_roles_through_config() {
        let config = TableConfig {
            partition_key: "id".to_owned(),
            sort_key: Some("kind".to_owned()),
            third_global_index_key: Some("owner".to_owned()),
            ..TableConfig::default()
        };
        assert_eq!(STANDARD.attributes(&config), Some(("id", Some("kind"))));
        assert_eq!(INVERTED.attributes(&config), Some(("kind", Some("id"))));
        assert_eq!(G3_SORT.attributes(&config), Some(("owner", Some("kind"))));
    }

    #[test]
    fn test_should_leave_views_of_missing_roles_empty() {
        let config = TableConfig {
            second_global_index_key: None,
            ..TableConfig::default().without_sort_key()
        };
        assert_eq!(STANDARD.attributes(&config), Some(("pk", None)));
        assert_eq!(INVERTED.attributes(&config), None);
        assert_eq!(G2_PARTITION.attributes(&config), None);
        assert_eq!(PARTITION_G1.attributes(&config), Some(("pk", Some("g1k"))));
    }

    #[test]
    fn test_should_find_by_name() {
        assert_eq!(IndexDefinition::by_name(None), Some(STANDARD));
        assert_eq!(IndexDefinition::by_name(Some("g1_partition")), Some(G1_PARTITION));
        assert_eq!(IndexDefinition::by_name(Some("standard")), None);
        assert_eq!(IndexDefinition::by_id("standard"), Some(STANDARD));
    }
}
