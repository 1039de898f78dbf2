//! Storage error types for craft-storage.
//!
//! [`StorageError`] covers the failure modes of the storage layer: input
//! validation, uniqueness violations, and backend/migration failures.
//! Absence is never an error; lookups return `Option`.

use rusqlite::ErrorCode;
use thiserror::Error;

use crate::validate::FieldViolation;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Input exceeded a length bound or missed a required field.
    /// Raised before anything is written.
    #[error("validation failed ({} field violation(s))", .0.len())]
    Validation(Vec<FieldViolation>),

    /// A uniqueness constraint (craftnode text, craftnode id, or combination
    /// pair) rejected the write.
    #[error("constraint violation: {reason}")]
    ConstraintViolation { reason: String },

    /// Any other SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),

    /// Schema migrations could not be applied.
    #[error("migration error: {0}")]
    Migration(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.code == ErrorCode::ConstraintViolation =>
            {
                StorageError::ConstraintViolation {
                    reason: message.clone().unwrap_or_else(|| code.to_string()),
                }
            }
            _ => StorageError::Sqlite(err),
        }
    }
}
