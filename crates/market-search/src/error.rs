//! Search error types.

use std::time::Duration;

use market_data::DbError;
use market_observability::FallbackTrace;
use thiserror::Error;

use crate::transport::TransportError;

/// Failure of a single backend attempt. Never fatal to the orchestrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The backend is missing configuration (endpoint, credentials).
    #[error("{backend} is not configured: {reason}")]
    Unavailable { backend: String, reason: String },

    /// The provider rejected the request or the connection failed.
    #[error("{backend} request failed: {message}")]
    Provider { backend: String, message: String },

    /// The provider answered with an error status.
    #[error("{backend} returned HTTP {status}")]
    Http { backend: String, status: u16 },

    /// The attempt exceeded its timeout.
    #[error("{backend} timed out after {after:?}")]
    Timeout { backend: String, after: Duration },

    /// The provider answered with a body we could not map.
    #[error("{backend} returned an unreadable response: {message}")]
    Decode { backend: String, message: String },

    /// The relational tier's underlying store is unreachable.
    #[error("Catalog store unavailable: {0}")]
    DataStoreUnavailable(String),
}

impl BackendError {
    /// Map a transport failure for the named backend.
    pub fn from_transport(backend: &str, err: TransportError) -> Self {
        let backend = backend.to_string();
        match err {
            TransportError::Http { status, .. } => BackendError::Http { backend, status },
            TransportError::Timeout(after) => BackendError::Timeout { backend, after },
            TransportError::Deserialization(message) => BackendError::Decode { backend, message },
            TransportError::Connection(message) | TransportError::Request(message) => {
                BackendError::Provider { backend, message }
            }
        }
    }

    /// Whether this is the permanent "not configured" class.
    pub fn is_not_configured(&self) -> bool {
        matches!(self, BackendError::Unavailable { .. })
    }
}

impl From<DbError> for BackendError {
    fn from(e: DbError) -> Self {
        BackendError::DataStoreUnavailable(e.to_string())
    }
}

/// The only failure surfaced to callers of search: every tier failed.
#[derive(Error, Debug, Clone)]
pub enum SearchError {
    #[error("Search unavailable: all {} backends failed", .trace.attempts.len())]
    Unavailable { trace: FallbackTrace },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_mapping() {
        let err = BackendError::from_transport(
            "algolia",
            TransportError::Http {
                status: 503,
                url: "https://x".into(),
            },
        );
        assert_eq!(
            err,
            BackendError::Http {
                backend: "algolia".into(),
                status: 503
            }
        );
        assert!(!err.is_not_configured());
    }

    #[test]
    fn test_db_error_mapping() {
        let err: BackendError = DbError::Unavailable("down".into()).into();
        assert!(matches!(err, BackendError::DataStoreUnavailable(_)));
    }
}
