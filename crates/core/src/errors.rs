//! Core error types for the Tierfolio pipeline.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from SQLite, serialization, etc.) are converted to these types by the storage layer.

use thiserror::Error;

use tierfolio_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the pipeline.
///
/// Callers of the pipeline entrypoints receive either a complete result or
/// one of these variants, never a partial snapshot.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    /// No market snapshot has been stored yet.
    #[error("No market snapshot is available")]
    SnapshotUnavailable,

    #[error("No questionnaire answers stored for '{0}'")]
    AnswersNotFound(String),

    /// The scorer produced a level with no named risk category.
    #[error("Risk level {0} has no defined category")]
    UndefinedRiskLevel(u8),

    /// Another market analysis run holds the pipeline.
    #[error("A market analysis run is already in progress")]
    PipelineBusy,

    #[error("Model training failed: {0}")]
    Training(String),
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A stored payload could not be encoded or decoded.
    #[error("Stored payload is invalid: {0}")]
    Serialization(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Answer {index} is {value}, expected a grade between 0 and 4")]
    AnswerOutOfRange { index: usize, value: i64 },

    #[error("Expected {expected} answers, got {actual}")]
    AnswerCount { expected: usize, actual: usize },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_data_error_converts() {
        let err: Error = MarketDataError::ListingUnavailable {
            market: "bonds".to_string(),
            message: "HTTP 503".to_string(),
        }
        .into();
        assert!(matches!(err, Error::MarketData(_)));
        assert_eq!(
            err.to_string(),
            "Market data operation failed: Listing unavailable for bonds: HTTP 503"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err: Error = ValidationError::AnswerOutOfRange { index: 2, value: 7 }.into();
        assert_eq!(
            err.to_string(),
            "Input validation failed: Answer 2 is 7, expected a grade between 0 and 4"
        );
    }
}
