//! End-to-end scenarios for the dynamock emulator.
//!
//! Each test drives a [`MockClient`] the way a record-mapping data layer does:
//! records are written through `UpdateItem` requests built from a [`Schema`]
//! and read back through paginated queries and scans.
//!
//! Run them with:
//! ```text
//! cargo test -p dynamock-integration
//! ```

use std::sync::Once;

use dynamock_core::codec::DataType;
use dynamock_core::{Column, MockClient, MockTable, Schema, StorageError, Values};
use dynamock_model::input::PaginateInput;
use dynamock_model::{AttributeValue, DynamoDBError, Item};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Create a client over an empty table with the default key names.
#[must_use]
pub fn mock_client() -> MockClient {
    init_tracing();
    MockClient::default()
}

/// Seed the six rows shared by the query scenarios.
///
/// | pk   | sk   | g1k |
/// |------|------|-----|
/// | foo  | bar1 | a   |
/// | foo  | bar2 | a   |
/// | foo  | bar3 | b   |
/// | foo  | baz4 | b   |
/// | foo  | baz5 | c   |
/// | spam | bar1 | c   |
pub fn seed_prefix_rows(table: &mut MockTable) -> Result<(), StorageError> {
    let rows = [
        ("foo", "bar1", "a"),
        ("foo", "bar2", "a"),
        ("foo", "bar3", "b"),
        ("foo", "baz4", "b"),
        ("foo", "baz5", "c"),
        ("spam", "bar1", "c"),
    ];
    for (pk, sk, g1k) in rows {
        table.add(pk, Some(sk), Some(g1k), None, Item::new())?;
    }
    Ok(())
}

/// Build a query request. `names` maps placeholders to attribute names and
/// `values` maps placeholders to string values.
#[must_use]
pub fn key_query(
    index_name: Option<&str>,
    expression: &str,
    names: &[(&str, &str)],
    values: &[(&str, &str)],
) -> PaginateInput {
    PaginateInput {
        table_name: "NA".to_owned(),
        index_name: index_name.map(str::to_owned),
        key_condition_expression: Some(expression.to_owned()),
        expression_attribute_names: names
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect(),
        expression_attribute_values: values
            .iter()
            .map(|(k, v)| ((*k).to_owned(), AttributeValue::S((*v).to_owned())))
            .collect(),
        limit: None,
    }
}

/// Run a paginated read and fold every page's items together.
pub fn collect_pages(
    client: &MockClient,
    operation: &str,
    input: &PaginateInput,
) -> Result<Vec<Item>, DynamoDBError> {
    let pages = client.get_paginator(operation)?.paginate(input)?;
    Ok(pages.into_iter().flat_map(|page| page.items).collect())
}

/// Query the primary index for rows in `partition` whose sort key starts with
/// `prefix`.
#[must_use]
pub fn prefix_query(partition: &str, prefix: &str) -> PaginateInput {
    key_query(
        None,
        "#pk = :pk AND begins_with(#sk, :sk)",
        &[("#pk", "pk"), ("#sk", "sk")],
        &[(":pk", partition), (":sk", prefix)],
    )
}

/// Product records: `prod:` partition, `line:` sort, `cat:` category on the
/// first global index.
#[must_use]
pub fn product_schema() -> Schema {
    Schema::new(
        Column::partition("product_id", "prod:"),
        Some(Column::sort("line", "line:")),
        vec![
            Column::global_first("category", "cat:"),
            Column::new("name", DataType::String),
            Column::new("units", DataType::Integer),
            Column::new("price", DataType::Float),
        ],
    )
}

/// Store records: `store:` partition, `region:` sort.
#[must_use]
pub fn store_schema() -> Schema {
    Schema::new(
        Column::partition("store_id", "store:"),
        Some(Column::sort("region", "region:")),
        vec![
            Column::new("name", DataType::String),
            Column::new("employees", DataType::Integer),
        ],
    )
}

/// Write a record the way the data layer does, through `UpdateItem`.
///
/// Returns the stored row.
pub fn save_record(client: &mut MockClient, schema: &Schema, values: &Values) -> anyhow::Result<Item> {
    let input = schema.update_item_input("NA", values)?;
    tracing::debug!(expression = ?input.update_expression, "saving record");
    let output = client.update_item(&input)?;
    Ok(output.attributes)
}

mod test_query;
mod test_records;
mod test_update;
