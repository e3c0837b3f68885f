//! Ordered fallback across search tiers.
//!
//! Tiers are attempted one at a time, in order, each under its own timeout.
//! The first tier to answer serves the request. Failures are logged and
//! recorded, never surfaced, unless the authoritative last tier fails too.

use std::sync::Arc;
use std::time::Instant;

use market_commerce::{SearchFilters, SearchResultPage};
use market_data::CatalogStore;
use market_observability::{AttemptOutcome, FallbackTrace};
use tracing::{error, info, instrument, warn};

use crate::algolia::AlgoliaBackend;
use crate::backend::SearchBackend;
use crate::config::SearchConfig;
use crate::elastic::ElasticBackend;
use crate::error::{BackendError, SearchError};
use crate::relational::RelationalBackend;
use crate::transport::HttpTransport;

/// A served page together with the attempts it took.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub page: SearchResultPage,
    pub trace: FallbackTrace,
}

impl SearchOutcome {
    /// Name of the tier that served the page.
    pub fn served_by(&self) -> &str {
        self.trace.served_by().unwrap_or_default()
    }
}

/// Runs a search against an ordered chain of tiers.
pub struct SearchOrchestrator {
    primaries: Vec<Arc<dyn SearchBackend>>,
    fallback: Arc<dyn SearchBackend>,
}

impl SearchOrchestrator {
    /// Create a chain: `primaries` in order, then the authoritative `fallback`.
    pub fn new(primaries: Vec<Arc<dyn SearchBackend>>, fallback: Arc<dyn SearchBackend>) -> Self {
        Self {
            primaries,
            fallback,
        }
    }

    /// Build the chain a configuration describes: self-hosted index, hosted
    /// service, then the catalog store.
    pub fn from_config(
        config: &SearchConfig,
        store: Arc<dyn CatalogStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let mut primaries: Vec<Arc<dyn SearchBackend>> = Vec::new();
        if let Some(es) = &config.elasticsearch {
            primaries.push(Arc::new(ElasticBackend::new(es.clone(), transport.clone())));
        }
        if let Some(algolia) = &config.algolia {
            primaries.push(Arc::new(AlgoliaBackend::new(algolia.clone(), transport)));
        }

        let mut relational = RelationalBackend::new(store);
        if let Some(ms) = config.relational.timeout_ms {
            relational = relational.with_timeout(std::time::Duration::from_millis(ms));
        }
        Self::new(primaries, Arc::new(relational))
    }

    /// Tier names in attempt order.
    pub fn chain(&self) -> Vec<&str> {
        self.primaries
            .iter()
            .map(|b| b.name())
            .chain(std::iter::once(self.fallback.name()))
            .collect()
    }

    /// Search, returning the first page any tier serves.
    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchResultPage, SearchError> {
        self.search_with_report(query, filters)
            .await
            .map(|outcome| outcome.page)
    }

    /// Search and report every attempt made.
    #[instrument(skip(self, filters), fields(query = %query, sort = filters.sort.as_str()))]
    pub async fn search_with_report(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchOutcome, SearchError> {
        let mut trace = FallbackTrace::new();

        for backend in &self.primaries {
            match attempt(backend.as_ref(), query, filters, &mut trace).await {
                Ok(page) => return Ok(served(page, trace)),
                Err(e) => {
                    warn!(backend = backend.name(), error = %e, "Search backend failed, falling back");
                }
            }
        }

        match attempt(self.fallback.as_ref(), query, filters, &mut trace).await {
            Ok(page) => Ok(served(page, trace)),
            Err(e) => {
                error!(backend = self.fallback.name(), error = %e, "All search backends failed");
                Err(SearchError::Unavailable { trace })
            }
        }
    }
}

fn served(page: SearchResultPage, trace: FallbackTrace) -> SearchOutcome {
    info!(
        served_by = trace.served_by().unwrap_or_default(),
        fallbacks = trace.fallbacks(),
        total = page.pagination.total,
        "Search served"
    );
    SearchOutcome { page, trace }
}

async fn attempt(
    backend: &dyn SearchBackend,
    query: &str,
    filters: &SearchFilters,
    trace: &mut FallbackTrace,
) -> Result<SearchResultPage, BackendError> {
    let limit = backend.timeout();
    let started = Instant::now();

    let result = match tokio::time::timeout(limit, backend.search(query, filters)).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout {
            backend: backend.name().to_string(),
            after: limit,
        }),
    };

    let outcome = match &result {
        Ok(_) => AttemptOutcome::Served,
        Err(e) if e.is_not_configured() => AttemptOutcome::NotConfigured(e.to_string()),
        Err(e) => AttemptOutcome::Failed(e.to_string()),
    };
    trace.record(backend.name(), outcome, started.elapsed());
    result
}
