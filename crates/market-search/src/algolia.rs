//! Hosted search service adapter.
//!
//! The hosted engine pages from zero and sorts through replica indices
//! named `<index>_<sort>`. Results are re-sorted within the page so that a
//! missing replica still yields correctly ordered pages.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use market_commerce::{Pagination, RankedProduct, SearchFilters, SearchResultPage, SortMode};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::backend::{BackendKind, SearchBackend};
use crate::config::AlgoliaConfig;
use crate::document::decode_product;
use crate::error::BackendError;
use crate::transport::{HttpRequest, HttpTransport};

const NAME: &str = "algolia";

/// Search tier backed by the hosted query API.
pub struct AlgoliaBackend {
    config: AlgoliaConfig,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl AlgoliaBackend {
    pub fn new(config: AlgoliaConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let timeout = config
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| BackendKind::Algolia.default_timeout());
        Self {
            config,
            transport,
            timeout,
        }
    }

    /// Index (or sort replica) that serves a sort mode.
    pub fn index_for_sort(&self, sort: SortMode) -> String {
        if sort.is_relevance() {
            self.config.index_name.clone()
        } else {
            format!("{}_{}", self.config.index_name, sort.as_str())
        }
    }

    fn endpoint(&self, index: &str) -> String {
        let host = match &self.config.host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => format!("https://{}-dsn.algolia.net", self.config.app_id),
        };
        format!("{host}/1/indexes/{index}/query")
    }

    fn missing_credentials(&self) -> Option<&'static str> {
        if self.config.app_id.trim().is_empty() {
            Some("no application id configured")
        } else if self.config.api_key.trim().is_empty() {
            Some("no api key configured")
        } else {
            None
        }
    }
}

/// Build the filter expression, clauses joined with `AND`.
pub fn filter_expression(filters: &SearchFilters) -> String {
    let mut clauses = Vec::new();
    if let Some(category) = &filters.category {
        clauses.push(format!("category:{}", quote(category.as_str())));
    }
    if let Some(store) = &filters.store {
        clauses.push(format!("store:{}", quote(store.as_str())));
    }
    match (filters.min_price, filters.max_price) {
        (Some(min), Some(max)) => {
            clauses.push(format!("price:{} TO {}", min.to_decimal(), max.to_decimal()))
        }
        (Some(min), None) => clauses.push(format!("price >= {}", min.to_decimal())),
        (None, Some(max)) => clauses.push(format!("price <= {}", max.to_decimal())),
        (None, None) => {}
    }
    if let Some(rating) = filters.min_rating {
        clauses.push(format!("rating >= {rating}"));
    }
    clauses.join(" AND ")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Build the query body.
pub fn build_params(query: &str, filters: &SearchFilters) -> Value {
    let mut params = json!({
        "query": query.trim(),
        "page": filters.zero_based_page(),
        "hitsPerPage": filters.page_size,
        "typoTolerance": true,
    });
    let expression = filter_expression(filters);
    if !expression.is_empty() {
        params["filters"] = Value::String(expression);
    }
    params
}

/// Map a query response into a result page.
pub fn parse_response(body: &Value, filters: &SearchFilters) -> Result<SearchResultPage, BackendError> {
    let decode = |message: &str| BackendError::Decode {
        backend: NAME.to_string(),
        message: message.to_string(),
    };

    let total = body
        .get("nbHits")
        .and_then(Value::as_u64)
        .ok_or_else(|| decode("missing nbHits"))?;
    let hits = body
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| decode("missing hits"))?;

    // The engine returns hits best-first without a numeric score; rank by position.
    let offset = filters.offset() as f64;
    let mut items = Vec::with_capacity(hits.len());
    for (position, hit) in hits.iter().enumerate() {
        let id = hit
            .get("objectID")
            .and_then(Value::as_str)
            .ok_or_else(|| decode("hit without objectID"))?;
        let product = decode_product(id, hit.clone()).map_err(|e| decode(&e.to_string()))?;
        let score = 1.0 / (offset + position as f64 + 1.0);
        items.push(RankedProduct::new(product, Some(score)));
    }

    let mut page = SearchResultPage::new(items, Pagination::for_filters(filters, total));
    page.sort_within_page(filters.sort);
    Ok(page)
}

#[async_trait]
impl SearchBackend for AlgoliaBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Algolia
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
        if let Some(reason) = self.missing_credentials() {
            return Err(BackendError::Unavailable {
                backend: NAME.to_string(),
                reason: reason.to_string(),
            });
        }

        let index = self.index_for_sort(filters.sort);
        let request = HttpRequest::post(self.endpoint(&index), build_params(query, filters))
            .with_header("X-Algolia-Application-Id", self.config.app_id.as_str())
            .with_header("X-Algolia-API-Key", self.config.api_key.as_str());

        let response = self
            .transport
            .post_json(request)
            .await
            .map_err(|e| BackendError::from_transport(NAME, e))?;

        let page = parse_response(&response, filters)?;
        debug!(index = %index, total = page.pagination.total, "Hosted search completed");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use market_commerce::Price;

    fn config() -> AlgoliaConfig {
        AlgoliaConfig {
            app_id: "APP".into(),
            api_key: "key".into(),
            index_name: "products".into(),
            host: None,
            timeout_ms: None,
        }
    }

    fn hit(id: &str, price: f64) -> Value {
        json!({ "objectID": id, "name": id, "category": "electronics", "price": price })
    }

    #[test]
    fn test_filter_expression() {
        let filters = SearchFilters::new()
            .with_category("electronics")
            .with_store("acme")
            .with_price_range(Some(Price::from_cents(5000)), Some(Price::from_cents(20000)))
            .with_min_rating(4.0);
        assert_eq!(
            filter_expression(&filters),
            "category:\"electronics\" AND store:\"acme\" AND price:50 TO 200 AND rating >= 4"
        );

        let filters = SearchFilters::new().with_price_range(None, Some(Price::from_cents(1999)));
        assert_eq!(filter_expression(&filters), "price <= 19.99");
        assert_eq!(filter_expression(&SearchFilters::new()), "");
    }

    #[test]
    fn test_params_are_zero_based() {
        let params = build_params(" lamp ", &SearchFilters::new().with_pagination(3, 10));
        assert_eq!(params["page"], 2);
        assert_eq!(params["hitsPerPage"], 10);
        assert_eq!(params["query"], "lamp");
        assert!(params.get("filters").is_none());
    }

    #[test]
    fn test_sort_replicas() {
        let backend = AlgoliaBackend::new(config(), Arc::new(MockTransport::new()));
        assert_eq!(backend.index_for_sort(SortMode::Relevance), "products");
        assert_eq!(backend.index_for_sort(SortMode::PriceAsc), "products_price_asc");
    }

    #[test]
    fn test_pages_from_total_hits() {
        let body = json!({ "nbHits": 2, "hits": [hit("b", 149.99), hit("a", 79.99)] });
        let filters = SearchFilters::new().with_sort(SortMode::PriceAsc);
        let page = parse_response(&body, &filters).unwrap();

        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 1);
        let prices: Vec<f64> = page.items.iter().map(|i| i.product.price.to_decimal()).collect();
        assert_eq!(prices, vec![79.99, 149.99]);
    }

    #[tokio::test]
    async fn test_search_request() {
        let transport = Arc::new(MockTransport::new().respond(json!({ "nbHits": 0, "hits": [] })));
        let backend = AlgoliaBackend::new(config(), transport.clone());
        let filters = SearchFilters::new().with_sort(SortMode::RatingDesc);

        let page = backend.search("lamp", &filters).await.unwrap();
        assert_eq!(page.pagination.total_pages, 0);

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "https://APP-dsn.algolia.net/1/indexes/products_rating_desc/query");
        assert_eq!(sent.header("X-Algolia-API-Key"), Some("key"));
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let mut cfg = config();
        cfg.api_key = String::new();
        let backend = AlgoliaBackend::new(cfg, Arc::new(MockTransport::new()));
        let err = backend.search("lamp", &SearchFilters::new()).await.unwrap_err();
        assert!(err.is_not_configured());
    }
}
