//! The contract every search tier implements.

use std::time::Duration;

use async_trait::async_trait;
use market_commerce::{SearchFilters, SearchResultPage};

use crate::error::BackendError;

/// Kinds of search tier, each with a default attempt timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Self-hosted full-text index.
    Elasticsearch,
    /// Hosted search service.
    Algolia,
    /// Degraded search over the catalog store.
    Relational,
}

impl BackendKind {
    /// Default timeout for one attempt against this kind of tier.
    pub fn default_timeout(&self) -> Duration {
        match self {
            Self::Elasticsearch => Duration::from_millis(500),
            Self::Algolia => Duration::from_millis(400),
            Self::Relational => Duration::from_millis(2000),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Elasticsearch => "elasticsearch",
            Self::Algolia => "algolia",
            Self::Relational => "relational",
        }
    }
}

/// A search tier: translates canonical filters into its own query language
/// and maps the answer back into a canonical result page.
///
/// Implementations must report `pagination.total` as the total number of
/// matches across all pages, not the size of the returned page.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Stable backend name used in logs and traces.
    fn name(&self) -> &str;

    fn kind(&self) -> BackendKind;

    /// Budget for one attempt. Defaults to the kind's timeout.
    fn timeout(&self) -> Duration {
        self.kind().default_timeout()
    }

    /// Run one search.
    async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchResultPage, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        assert_eq!(BackendKind::Elasticsearch.default_timeout(), Duration::from_millis(500));
        assert!(BackendKind::Algolia.default_timeout() < BackendKind::Relational.default_timeout());
        assert_eq!(BackendKind::Algolia.name(), "algolia");
    }
}
