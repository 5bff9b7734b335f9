//! Conversions from engine errors to DynamoDB errors.

use dynamock_model::error::{DynamoDBError, DynamoDBErrorCode};

use crate::codec::CodecError;
use crate::expression::ExpressionError;
use crate::table::StorageError;

/// Convert a storage error into a DynamoDB error.
///
/// Duplicate keys surface as a failed condition check, like a conditional
/// put against the real service. Everything else is a validation error.
#[must_use]
pub fn storage_error_to_dynamodb(e: StorageError) -> DynamoDBError {
    let code = match e {
        StorageError::DuplicateKey { .. } => DynamoDBErrorCode::ConditionalCheckFailedException,
        _ => DynamoDBErrorCode::ValidationException,
    };
    DynamoDBError::with_message(code, e.to_string()).with_source(e)
}

/// Convert an expression error into a DynamoDB validation error.
#[must_use]
pub fn expression_error_to_dynamodb(e: ExpressionError) -> DynamoDBError {
    DynamoDBError::with_message(DynamoDBErrorCode::ValidationException, e.to_string()).with_source(e)
}

/// Convert a codec error into a DynamoDB validation error.
#[must_use]
pub fn codec_error_to_dynamodb(e: CodecError) -> DynamoDBError {
    DynamoDBError::with_message(DynamoDBErrorCode::ValidationException, e.to_string()).with_source(e)
}
