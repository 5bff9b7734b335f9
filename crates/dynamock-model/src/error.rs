//! DynamoDB error types.
//!
//! The emulator raises the same error codes a real DynamoDB endpoint would,
//! so callers can branch on `code` exactly as they do against the service.

use std::fmt;

/// Error codes raised by the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum DynamoDBErrorCode {
    /// Malformed request, key, expression or index name.
    #[default]
    ValidationException,
    /// A write was rejected by a key or condition check.
    ConditionalCheckFailedException,
    /// The operation exists in DynamoDB but is not emulated.
    UnsupportedOperationException,
}

impl DynamoDBErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationException => "ValidationException",
            Self::ConditionalCheckFailedException => "ConditionalCheckFailedException",
            Self::UnsupportedOperationException => "UnsupportedOperationException",
        }
    }
}

impl fmt::Display for DynamoDBErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DynamoDB error response.
#[derive(Debug)]
pub struct DynamoDBError {
    /// The error code.
    pub code: DynamoDBErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for DynamoDBError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DynamoDBError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for DynamoDBError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl DynamoDBError {
    /// Create a new `DynamoDBError` with a custom message.
    #[must_use]
    pub fn with_message(code: DynamoDBErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::with_message(DynamoDBErrorCode::ValidationException, message)
    }

    /// Operation not emulated.
    #[must_use]
    pub fn unsupported_operation(operation: &str) -> Self {
        Self::with_message(
            DynamoDBErrorCode::UnsupportedOperationException,
            format!("Operation is not supported by the emulator: {operation}"),
        )
    }
}
