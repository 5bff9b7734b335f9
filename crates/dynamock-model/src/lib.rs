//! DynamoDB wire model types for dynamock.
//!
//! These are the request and response bags exchanged between a caller and the
//! in-memory emulator. Field names follow the DynamoDB JSON protocol so that
//! payloads captured from a real client deserialize unchanged.
// "DynamoDB" appears in virtually every doc comment in this crate.
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod attribute_value;
pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use attribute_value::AttributeValue;
pub use error::{DynamoDBError, DynamoDBErrorCode};
pub use operations::PaginatedOperation;
pub use types::Item;
