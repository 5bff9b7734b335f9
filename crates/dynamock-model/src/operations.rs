//! Operations that can be paginated.

use std::fmt;

/// Read operations exposed through a paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaginatedOperation {
    /// Query items by key condition.
    Query,
    /// Scan all items in a table.
    Scan,
}

impl PaginatedOperation {
    /// Returns the boto-style operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Scan => "scan",
        }
    }

    /// Parse an operation name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("query") {
            Some(Self::Query)
        } else if name.eq_ignore_ascii_case("scan") {
            Some(Self::Scan)
        } else {
            None
        }
    }
}

impl fmt::Display for PaginatedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
