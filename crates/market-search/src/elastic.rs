//! Self-hosted full-text index adapter.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use market_commerce::{Pagination, RankedProduct, SearchFilters, SearchResultPage, SortMode};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::backend::{BackendKind, SearchBackend};
use crate::config::ElasticConfig;
use crate::document::decode_product;
use crate::error::BackendError;
use crate::transport::{HttpRequest, HttpTransport};

/// Weighted fields for the keyword query. Name counts most; brand and tags
/// outrank the description.
pub const SEARCH_FIELDS: [&str; 4] = ["name^3", "brand^2", "tags^2", "description"];

const NAME: &str = "elasticsearch";

/// Search tier backed by an Elasticsearch-compatible `_search` endpoint.
pub struct ElasticBackend {
    config: ElasticConfig,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl ElasticBackend {
    pub fn new(config: ElasticConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let timeout = config
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| BackendKind::Elasticsearch.default_timeout());
        Self {
            config,
            transport,
            timeout,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}/_search",
            self.config.node.trim_end_matches('/'),
            self.config.index
        )
    }

    fn request(&self, body: Value) -> HttpRequest {
        let request = HttpRequest::post(self.endpoint(), body);
        match self.config.username.as_deref().filter(|u| !u.is_empty()) {
            Some(username) => request.with_basic_auth(username, self.config.password.clone()),
            None => request,
        }
    }
}

/// Build the `_search` body for a query and canonical filters.
pub fn build_query(query: &str, filters: &SearchFilters) -> Value {
    let query = query.trim();
    let must = if query.is_empty() {
        json!({ "match_all": {} })
    } else {
        json!({
            "multi_match": {
                "query": query,
                "fields": SEARCH_FIELDS,
                "fuzziness": "AUTO"
            }
        })
    };

    let mut filter = Vec::new();
    if let Some(category) = &filters.category {
        filter.push(json!({ "term": { "category": category.as_str() } }));
    }
    if let Some(store) = &filters.store {
        filter.push(json!({ "term": { "store": store.as_str() } }));
    }
    if filters.has_price_range() {
        let mut range = serde_json::Map::new();
        if let Some(min) = filters.min_price {
            range.insert("gte".into(), json!(min.to_decimal()));
        }
        if let Some(max) = filters.max_price {
            range.insert("lte".into(), json!(max.to_decimal()));
        }
        filter.push(json!({ "range": { "price": range } }));
    }
    if let Some(rating) = filters.min_rating {
        filter.push(json!({ "range": { "rating": { "gte": rating } } }));
    }

    let mut body = json!({
        "from": filters.offset(),
        "size": filters.page_size,
        "track_total_hits": true,
        "query": { "bool": { "must": [must], "filter": filter } }
    });
    if let Some(sort) = sort_clause(filters.sort) {
        body["sort"] = sort;
    }
    body
}

fn sort_clause(sort: SortMode) -> Option<Value> {
    let clause = match sort {
        SortMode::Relevance => return None,
        SortMode::PriceAsc => json!({ "price": { "order": "asc" } }),
        SortMode::PriceDesc => json!({ "price": { "order": "desc" } }),
        SortMode::RatingDesc => json!({ "rating": { "order": "desc" } }),
        // Older indices have no `createdAt` mapping; without a type hint the
        // engine rejects the sort instead of returning unsorted hits.
        SortMode::Recency => json!({ "createdAt": { "order": "desc", "unmapped_type": "date" } }),
    };
    Some(json!([clause]))
}

/// Map a `_search` response into a result page.
pub fn parse_response(body: &Value, filters: &SearchFilters) -> Result<SearchResultPage, BackendError> {
    let decode = |message: &str| BackendError::Decode {
        backend: NAME.to_string(),
        message: message.to_string(),
    };

    let hits = body.get("hits").ok_or_else(|| decode("missing hits"))?;
    // `total` is an object on 7.x and later, a bare number before that.
    let total = match hits.get("total") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(obj) => obj.get("value").and_then(Value::as_u64),
        None => None,
    }
    .ok_or_else(|| decode("missing hits.total"))?;

    let raw_hits = hits
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| decode("missing hits.hits"))?;

    let mut items = Vec::with_capacity(raw_hits.len());
    for hit in raw_hits {
        let id = hit
            .get("_id")
            .and_then(Value::as_str)
            .ok_or_else(|| decode("hit without _id"))?;
        let source = hit.get("_source").cloned().unwrap_or_else(|| json!({}));
        let product = decode_product(id, source).map_err(|e| decode(&e.to_string()))?;
        items.push(RankedProduct::new(product, hit.get("_score").and_then(Value::as_f64)));
    }

    Ok(SearchResultPage::new(items, Pagination::for_filters(filters, total)))
}

#[async_trait]
impl SearchBackend for ElasticBackend {
    fn name(&self) -> &str {
        NAME
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Elasticsearch
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
        if self.config.node.trim().is_empty() {
            return Err(BackendError::Unavailable {
                backend: NAME.to_string(),
                reason: "no node configured".to_string(),
            });
        }

        let body = build_query(query, filters);
        let response = self
            .transport
            .post_json(self.request(body))
            .await
            .map_err(|e| BackendError::from_transport(NAME, e))?;

        let page = parse_response(&response, filters)?;
        debug!(total = page.pagination.total, returned = page.len(), "Index search completed");
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, TransportError};
    use market_commerce::Price;

    fn config() -> ElasticConfig {
        ElasticConfig {
            node: "http://search.local:9200/".into(),
            username: Some("elastic".into()),
            password: Some("secret".into()),
            index: "products".into(),
            timeout_ms: None,
        }
    }

    fn response(total: u64, hits: Value) -> Value {
        json!({ "hits": { "total": { "value": total, "relation": "eq" }, "hits": hits } })
    }

    #[test]
    fn test_query_translation() {
        let filters = SearchFilters::new()
            .with_category("electronics")
            .with_price_range(Some(Price::from_cents(5000)), Some(Price::from_cents(20000)))
            .with_min_rating(4.0)
            .with_sort(SortMode::PriceAsc)
            .with_pagination(2, 10);
        let body = build_query("wireless headphones", &filters);

        assert_eq!(body["from"], 10);
        assert_eq!(body["size"], 10);
        let must = &body["query"]["bool"]["must"][0]["multi_match"];
        assert_eq!(must["query"], "wireless headphones");
        assert_eq!(must["fuzziness"], "AUTO");
        assert_eq!(must["fields"][0], "name^3");

        let filter = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filter.len(), 3);
        assert_eq!(filter[0]["term"]["category"], "electronics");
        assert_eq!(filter[1]["range"]["price"]["gte"], 50.0);
        assert_eq!(filter[1]["range"]["price"]["lte"], 200.0);
        assert_eq!(filter[2]["range"]["rating"]["gte"], 4.0);
        assert_eq!(body["sort"][0]["price"]["order"], "asc");
    }

    #[test]
    fn test_empty_query_browses() {
        let body = build_query("  ", &SearchFilters::new());
        assert!(body["query"]["bool"]["must"][0].get("match_all").is_some());
        assert!(body.get("sort").is_none());

        let body = build_query("", &SearchFilters::new().with_sort(SortMode::Recency));
        assert_eq!(body["sort"][0]["createdAt"]["order"], "desc");
    }

    #[test]
    fn test_recency_sort_tolerates_missing_mapping() {
        let body = build_query("lamp", &SearchFilters::new().with_sort(SortMode::Recency));
        assert_eq!(
            body["sort"],
            json!([{ "createdAt": { "order": "desc", "unmapped_type": "date" } }])
        );
    }

    #[test]
    fn test_total_is_overall_matches() {
        let body = response(
            45,
            json!([{ "_id": "a", "_score": 2.5, "_source": { "name": "A", "price": 10.0 } }]),
        );
        let page = parse_response(&body, &SearchFilters::new()).unwrap();
        assert_eq!(page.pagination.total, 45);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.items[0].score, Some(2.5));
        assert_eq!(page.items[0].product.id.as_str(), "a");
    }

    #[test]
    fn test_legacy_total_and_bad_body() {
        let body = json!({ "hits": { "total": 0, "hits": [] } });
        let page = parse_response(&body, &SearchFilters::new()).unwrap();
        assert_eq!(page.pagination.total_pages, 0);

        let err = parse_response(&json!({ "error": "boom" }), &SearchFilters::new()).unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_search_sends_auth() {
        let transport = Arc::new(MockTransport::new().respond(response(0, json!([]))));
        let backend = ElasticBackend::new(config(), transport.clone());

        let page = backend.search("lamp", &SearchFilters::new()).await.unwrap();
        assert!(page.is_empty());

        let sent = transport.requests();
        assert_eq!(sent[0].url, "http://search.local:9200/products/_search");
        assert_eq!(sent[0].basic_auth, Some(("elastic".into(), Some("secret".into()))));
    }

    #[tokio::test]
    async fn test_unconfigured_and_http_errors() {
        let transport = Arc::new(MockTransport::new().fail(TransportError::Http {
            status: 503,
            url: "u".into(),
        }));
        let mut cfg = config();
        cfg.node = String::new();
        let err = ElasticBackend::new(cfg, transport.clone())
            .search("lamp", &SearchFilters::new())
            .await
            .unwrap_err();
        assert!(err.is_not_configured());

        let err = ElasticBackend::new(config(), transport)
            .search("lamp", &SearchFilters::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            BackendError::Http {
                backend: NAME.into(),
                status: 503
            }
        );
    }
}
