//! The marketplace facade.

use std::sync::Arc;

use market_commerce::{
    normalize, Product, ProductId, RawFilters, SearchFilters, SearchResultPage, UserId,
};
use market_data::CatalogStore;
use market_recommend::RecommendationEngine;
use market_search::{HttpTransport, SearchConfig, SearchError, SearchOrchestrator, SearchOutcome};
use tracing::instrument;

/// Every exposed operation over one catalog and one search chain.
pub struct Marketplace {
    search: SearchOrchestrator,
    recommendations: RecommendationEngine,
}

impl Marketplace {
    /// Assemble from an explicit search chain.
    pub fn new(store: Arc<dyn CatalogStore>, search: SearchOrchestrator) -> Self {
        Self {
            search,
            recommendations: RecommendationEngine::new(store),
        }
    }

    /// Assemble the search chain a configuration describes.
    pub fn from_config(
        config: &SearchConfig,
        store: Arc<dyn CatalogStore>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let search = SearchOrchestrator::from_config(config, store.clone(), transport);
        Self::new(store, search)
    }

    /// Search tiers in attempt order.
    pub fn search_chain(&self) -> Vec<&str> {
        self.search.chain()
    }

    pub async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchResultPage, SearchError> {
        self.search.search(query, filters).await
    }

    /// Search with untrusted filter input, normalized first.
    #[instrument(skip(self, raw))]
    pub async fn search_raw(
        &self,
        query: &str,
        raw: &RawFilters,
    ) -> Result<SearchResultPage, SearchError> {
        let request = normalize(query, raw);
        self.search.search(&request.query, &request.filters).await
    }

    /// Search and report which tiers were attempted.
    pub async fn search_with_report(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchOutcome, SearchError> {
        self.search.search_with_report(query, filters).await
    }

    pub async fn recommend(&self, user_id: Option<&UserId>, limit: usize) -> Vec<Product> {
        self.recommendations.recommend(user_id, limit).await
    }

    pub async fn related(&self, product_id: &ProductId, limit: usize) -> Vec<Product> {
        self.recommendations.related(product_id, limit).await
    }

    pub async fn popular(&self, limit: usize) -> Vec<Product> {
        self.recommendations.popular(limit).await
    }

    pub async fn on_sale(&self, limit: usize) -> Vec<Product> {
        self.recommendations.on_sale(limit).await
    }

    pub fn recommendations(&self) -> &RecommendationEngine {
        &self.recommendations
    }
}
