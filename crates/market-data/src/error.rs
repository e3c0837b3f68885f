//! Data-access error types.

use thiserror::Error;

/// Errors that can occur when reading from the catalog store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// The store could not be reached.
    #[error("Catalog store unavailable: {0}")]
    Unavailable(String),

    /// A query was rejected or failed while executing.
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// Failed to deserialize a record.
    #[error("Deserialization error: {0}")]
    DeserializeError(String),
}

impl From<serde_json::Error> for DbError {
    fn from(e: serde_json::Error) -> Self {
        DbError::DeserializeError(e.to_string())
    }
}

impl From<std::io::Error> for DbError {
    fn from(e: std::io::Error) -> Self {
        DbError::Unavailable(e.to_string())
    }
}
