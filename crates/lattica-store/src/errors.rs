//! Error handling for lattica-store
//!
//! All backend failures surface as `StoreError` and are propagated, never
//! retried - retry policy belongs to the caller.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures raised at the persistence boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// I/O failure from the persisted map or element source
    #[error("Backing store failure in {op}: {message}")]
    Backing { op: String, message: String },

    /// A persisted value could not be encoded or decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Create a backing store error for the given operation
pub fn backing(op: &str, message: impl Into<String>) -> StoreError {
    StoreError::Backing {
        op: op.to_string(),
        message: message.into(),
    }
}

/// Create a backing store error from rusqlite::Error
pub fn from_rusqlite(op: &str, err: rusqlite::Error) -> StoreError {
    backing(op, err.to_string())
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization {
            message: err.to_string(),
        }
    }
}
