//! In-memory DynamoDB emulation engine for dynamock.
//!
//! A [`MockClient`] answers the item, batch, transaction and paginated read
//! calls of a DynamoDB client against one [`MockTable`]. Rows are stored in
//! wire form; [`schema`] and [`codec`] translate between wire values and typed
//! record values, and [`comparisons`] provides expectations for asserting on
//! stored rows in tests.
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod client;
pub mod codec;
pub mod comparisons;
pub mod config;
pub mod error;
pub mod expression;
pub mod index;
pub mod paginator;
pub mod row;
pub mod schema;
pub mod table;

pub use client::MockClient;
pub use codec::{CodecError, DataType, NativeValue};
pub use comparisons::{Expectation, IsoExpectation};
pub use config::TableConfig;
pub use index::{IndexDefinition, KeyRole};
pub use paginator::{Paginator, QueryPaginator, ScanPaginator};
pub use row::{FindCriteria, Key, Needles, Row};
pub use schema::{Column, Schema, Values};
pub use table::{MockTable, StorageError};
