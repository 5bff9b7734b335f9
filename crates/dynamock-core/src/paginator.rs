//! Paginated reads over a [`MockTable`].
//!
//! A query answers with two pages, an empty one followed by the matches, so
//! callers that fold pages together are exercised. A scan answers with one
//! page holding every row.

use tracing::debug;

use dynamock_model::error::DynamoDBError;
use dynamock_model::input::PaginateInput;
use dynamock_model::output::Page;
use dynamock_model::types::Item;

use crate::error::expression_error_to_dynamodb;
use crate::index::IndexDefinition;
use crate::row::Row;
use crate::table::MockTable;

/// Produces the pages of one read operation.
pub trait Paginator {
    /// Run the read described by `input`.
    ///
    /// # Errors
    ///
    /// Returns `DynamoDBError` if the input is invalid.
    fn paginate(&self, input: &PaginateInput) -> Result<Vec<Page>, DynamoDBError>;
}

/// Paginator for `Query`.
#[derive(Debug, Clone, Copy)]
pub struct QueryPaginator<'a> {
    table: &'a MockTable,
}

impl<'a> QueryPaginator<'a> {
    /// Create a paginator reading `table`.
    #[must_use]
    pub fn new(table: &'a MockTable) -> Self {
        Self { table }
    }
}

impl Paginator for QueryPaginator<'_> {
    fn paginate(&self, input: &PaginateInput) -> Result<Vec<Page>, DynamoDBError> {
        let index = match input.index_name.as_deref() {
            None => None,
            Some(name) => Some(IndexDefinition::by_name(Some(name)).ok_or_else(|| {
                DynamoDBError::validation(format!(
                    "The table does not have the specified index: {name}"
                ))
            })?),
        };
        let limit = match input.limit {
            None | Some(0) => usize::MAX,
            Some(n) => usize::try_from(n).map_err(|_| {
                DynamoDBError::validation(format!(
                    "Limit must be greater than or equal to 1, got {n}"
                ))
            })?,
        };

        let expression = input.key_condition_expression.as_deref().unwrap_or_default();
        let matches = self
            .table
            .query(
                index.as_ref(),
                expression,
                &input.expression_attribute_names,
                &input.expression_attribute_values,
            )
            .map_err(expression_error_to_dynamodb)?;

        debug!(
            index = index.map_or("standard", |index| index.id),
            expression,
            matched = matches.len(),
            "query"
        );

        let items: Vec<Item> = matches
            .into_iter()
            .take(limit)
            .map(|row| row.item().clone())
            .collect();
        Ok(vec![Page::default(), Page::new(items)])
    }
}

/// Paginator for `Scan`.
#[derive(Debug, Clone, Copy)]
pub struct ScanPaginator<'a> {
    table: &'a MockTable,
}

impl<'a> ScanPaginator<'a> {
    /// Create a paginator reading `table`.
    #[must_use]
    pub fn new(table: &'a MockTable) -> Self {
        Self { table }
    }
}

impl Paginator for ScanPaginator<'_> {
    fn paginate(&self, input: &PaginateInput) -> Result<Vec<Page>, DynamoDBError> {
        debug!(table = %input.table_name, rows = self.table.len(), "scan");
        let items = self.table.rows().map(Row::item).cloned().collect();
        Ok(vec![Page::new(items)])
    }
}
