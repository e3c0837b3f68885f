//! Degraded search over the authoritative catalog store.
//!
//! Last tier of the chain. Keyword matching is tolerant (partial and
//! misspelled terms still match) and ranks with the same field weights the
//! index-backed tiers use.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use market_commerce::{Pagination, RankedProduct, SearchFilters, SearchResultPage, SortMode};
use market_data::{text, CatalogStore, ProductFilter, ProductQuery, ProductSort};
use tracing::{debug, instrument};

use crate::backend::{BackendKind, SearchBackend};
use crate::error::BackendError;

const NAME: &str = "relational";

/// Search tier that queries the catalog store directly.
pub struct RelationalBackend {
    store: Arc<dyn CatalogStore>,
    timeout: Duration,
}

impl RelationalBackend {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            timeout: BackendKind::Relational.default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Translate canonical filters into catalog predicates.
pub fn catalog_filters(query: &str, filters: &SearchFilters) -> Vec<ProductFilter> {
    let mut out = Vec::new();
    if !query.trim().is_empty() {
        out.push(ProductFilter::text(query));
    }
    if let Some(category) = &filters.category {
        out.push(ProductFilter::Category(category.clone()));
    }
    if let Some(store) = &filters.store {
        out.push(ProductFilter::Store(store.clone()));
    }
    if filters.has_price_range() {
        out.push(ProductFilter::price_range(filters.min_price, filters.max_price));
    }
    if let Some(min) = filters.min_rating {
        out.push(ProductFilter::Rating { min });
    }
    out
}

/// Catalog sort for a sort mode. Relevance ranks by keyword score, or by
/// recency when there is nothing to score against.
pub fn catalog_sort(query: &str, sort: SortMode) -> ProductSort {
    match sort {
        SortMode::Relevance if query.trim().is_empty() => ProductSort::Newest,
        SortMode::Relevance => ProductSort::TextScore(query.to_string()),
        SortMode::PriceAsc => ProductSort::PriceAsc,
        SortMode::PriceDesc => ProductSort::PriceDesc,
        SortMode::RatingDesc => ProductSort::RatingDesc,
        SortMode::Recency => ProductSort::Newest,
    }
}

#[async_trait]
impl SearchBackend for RelationalBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Relational
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    #[instrument(skip(self, filters), fields(backend = NAME))]
    async fn search(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Result<SearchResultPage, BackendError> {
        let predicates = catalog_filters(query, filters);
        let total = self.store.count_active_products(&predicates).await?;

        let catalog_query = ProductQuery {
            filters: predicates,
            sort: catalog_sort(query, filters.sort),
            limit: Some(filters.page_size as usize),
            offset: usize::try_from(filters.offset()).unwrap_or(usize::MAX),
        };
        let products = self.store.find_active_products(&catalog_query).await?;

        let terms = text::query_terms(query);
        let items = products
            .into_iter()
            .map(|product| {
                let score = (!terms.is_empty()).then(|| text::text_score(&product, &terms));
                RankedProduct::new(product, score)
            })
            .collect();

        debug!(total, "Catalog search completed");
        Ok(SearchResultPage::new(items, Pagination::for_filters(filters, total)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_commerce::{Price, Product};
    use market_data::{MemoryStore, StoreOp};

    fn catalog() -> MemoryStore {
        MemoryStore::new().with_products(vec![
            Product::new("p1", "Wireless Headphones", "electronics", "acme", Price::from_cents(7999))
                .with_rating(4.5, 30)
                .created_at(10),
            Product::new("p2", "Wired Headphones", "electronics", "acme", Price::from_cents(2999))
                .with_rating(3.9, 12)
                .created_at(30),
            Product::new("p3", "Desk Lamp", "home", "lumo", Price::from_cents(2450))
                .with_description("Pairs well with wireless speakers")
                .created_at(20),
            Product::new("p4", "Wireless Earbuds", "electronics", "acme", Price::from_cents(14999))
                .inactive(),
        ])
    }

    fn ids(page: &SearchResultPage) -> Vec<&str> {
        page.items.iter().map(|i| i.product.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_keyword_relevance() {
        let backend = RelationalBackend::new(Arc::new(catalog()));
        let page = backend.search("wireless", &SearchFilters::new()).await.unwrap();

        // Name match outranks description match; inactive products never appear.
        assert_eq!(ids(&page), vec!["p1", "p3"]);
        assert_eq!(page.pagination.total, 2);
        assert!(page.items[0].score > page.items[1].score);
    }

    #[tokio::test]
    async fn test_misspelled_query_matches() {
        let backend = RelationalBackend::new(Arc::new(catalog()));
        let page = backend.search("hedphones", &SearchFilters::new()).await.unwrap();
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_browse_defaults_to_newest() {
        let backend = RelationalBackend::new(Arc::new(catalog()));
        let page = backend.search("", &SearchFilters::new()).await.unwrap();
        assert_eq!(ids(&page), vec!["p2", "p3", "p1"]);
        assert!(page.items.iter().all(|i| i.score.is_none()));
    }

    #[tokio::test]
    async fn test_filters_sort_and_paging() {
        let backend = RelationalBackend::new(Arc::new(catalog()));
        let filters = SearchFilters::new()
            .with_category("electronics")
            .with_sort(SortMode::PriceAsc)
            .with_pagination(2, 1);
        let page = backend.search("", &filters).await.unwrap();

        assert_eq!(ids(&page), vec!["p1"]);
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn test_store_failure() {
        let store = catalog();
        store.fail_on(StoreOp::CountActiveProducts);
        let backend = RelationalBackend::new(Arc::new(store));
        let err = backend.search("lamp", &SearchFilters::new()).await.unwrap_err();
        assert!(matches!(err, BackendError::DataStoreUnavailable(_)));
    }
}
