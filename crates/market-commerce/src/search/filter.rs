//! Canonical search request and its normalizer.
//!
//! Every backend adapter translates [`SearchFilters`] into its own native
//! query shape; this module is the only place filter semantics are decided.

use crate::ids::{CategoryId, StoreId};
use crate::price::Price;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default page size when none (or an invalid one) is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// Highest possible product rating.
pub const MAX_RATING: f64 = 5.0;

/// Sort modes for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Backend-native relevance score.
    #[default]
    Relevance,
    /// Price, low to high.
    PriceAsc,
    /// Price, high to low.
    PriceDesc,
    /// Highest rated first.
    RatingDesc,
    /// Newest first.
    Recency,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Relevance => "relevance",
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
            SortMode::RatingDesc => "rating_desc",
            SortMode::Recency => "recency",
        }
    }

    /// Parse a sort key. Unknown keys fall back to relevance.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "price_asc" => SortMode::PriceAsc,
            "price_desc" => SortMode::PriceDesc,
            "rating_desc" | "rating" => SortMode::RatingDesc,
            "recency" | "newest" => SortMode::Recency,
            _ => SortMode::Relevance,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortMode::Relevance => "Relevance",
            SortMode::PriceAsc => "Price: Low to High",
            SortMode::PriceDesc => "Price: High to Low",
            SortMode::RatingDesc => "Customer Rating",
            SortMode::Recency => "Newest Arrivals",
        }
    }

    pub fn is_relevance(&self) -> bool {
        matches!(self, SortMode::Relevance)
    }
}

/// Canonical, validated search filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub category: Option<CategoryId>,
    pub store: Option<StoreId>,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
    pub min_rating: Option<f64>,
    pub sort: SortMode,
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            category: None,
            store: None,
            min_price: None,
            max_price: None,
            min_rating: None,
            sort: SortMode::Relevance,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<CategoryId>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_store(mut self, store: impl Into<StoreId>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Set the price range, applying the same clamping as the normalizer.
    pub fn with_price_range(mut self, min: Option<Price>, max: Option<Price>) -> Self {
        let (min, max) = clamp_price_range(min, max);
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = clamp_rating(rating);
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Set pagination. Zero values fall back to the defaults.
    pub fn with_pagination(mut self, page: u32, page_size: u32) -> Self {
        self.page = if page == 0 { 1 } else { page };
        self.page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };
        self
    }

    /// Offset of the first item on the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    /// Page index for backends that count pages from zero.
    pub fn zero_based_page(&self) -> u32 {
        self.page.saturating_sub(1)
    }

    /// Whether any price bound is set.
    pub fn has_price_range(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }
}

/// A normalized search request: cleaned query text plus canonical filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text with whitespace collapsed. Empty means "browse".
    pub query: String,
    pub filters: SearchFilters,
}

/// Untyped filter input as received from a caller (e.g., query parameters).
///
/// Keys are matched case-sensitively against a fixed alias table; anything
/// unrecognized is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilters {
    values: BTreeMap<String, String>,
}

impl RawFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a raw key/value pair.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Parse from a URL query string (`category=audio&minPrice=50`).
    pub fn from_query_string(qs: &str) -> Self {
        let mut raw = Self::new();
        for pair in qs.trim_start_matches('?').split('&') {
            if pair.is_empty() {
                continue;
            }
            let mut parts = pair.splitn(2, '=');
            let key = urlencoding_decode(parts.next().unwrap_or(""));
            let value = urlencoding_decode(parts.next().unwrap_or(""));
            if !key.is_empty() {
                raw.values.insert(key, value);
            }
        }
        raw
    }

    /// First non-blank value among the given key aliases.
    fn get(&self, aliases: &[&str]) -> Option<&str> {
        aliases
            .iter()
            .filter_map(|key| self.values.get(*key))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Normalize a raw query and raw filters into a canonical request.
///
/// Never fails: invalid or missing page values take the defaults, negative
/// prices clamp to zero, an inverted price range is swapped, and ratings are
/// clamped to `0..=5`.
pub fn normalize(raw_query: &str, raw: &RawFilters) -> SearchRequest {
    let query = raw_query.split_whitespace().collect::<Vec<_>>().join(" ");

    let page = raw
        .get(&["page"])
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .map(|p| p.min(i64::from(u32::MAX)) as u32)
        .unwrap_or(1);

    let page_size = raw
        .get(&["pageSize", "page_size", "limit", "per_page"])
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|s| *s >= 1)
        .map(|s| s.min(i64::from(u32::MAX)) as u32)
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let parse_price = |aliases: &[&str]| {
        raw.get(aliases)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(Price::from_decimal)
    };
    let (min_price, max_price) = clamp_price_range(
        parse_price(&["minPrice", "min_price"]),
        parse_price(&["maxPrice", "max_price"]),
    );

    let min_rating = raw
        .get(&["minRating", "min_rating", "rating"])
        .and_then(|v| v.parse::<f64>().ok())
        .and_then(clamp_rating);

    SearchRequest {
        query,
        filters: SearchFilters {
            category: raw.get(&["category"]).map(CategoryId::from),
            store: raw.get(&["store"]).map(StoreId::from),
            min_price,
            max_price,
            min_rating,
            sort: raw.get(&["sort"]).map(SortMode::parse).unwrap_or_default(),
            page,
            page_size,
        },
    }
}

fn clamp_price_range(min: Option<Price>, max: Option<Price>) -> (Option<Price>, Option<Price>) {
    let min = min.map(Price::non_negative);
    let max = max.map(Price::non_negative);
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
        other => other,
    }
}

fn clamp_rating(rating: f64) -> Option<f64> {
    if !rating.is_finite() || rating <= 0.0 {
        return None;
    }
    Some(rating.min(MAX_RATING))
}

/// Simple URL decoding.
fn urlencoding_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let req = normalize("  wireless   headphones ", &RawFilters::new());
        assert_eq!(req.query, "wireless headphones");
        assert_eq!(req.filters.page, 1);
        assert_eq!(req.filters.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(req.filters.sort, SortMode::Relevance);
        assert!(req.filters.category.is_none());
    }

    #[test]
    fn test_invalid_pagination_falls_back() {
        let raw = RawFilters::new().set("page", "0").set("pageSize", "-5");
        let req = normalize("", &raw);
        assert_eq!(req.filters.page, 1);
        assert_eq!(req.filters.page_size, DEFAULT_PAGE_SIZE);

        let raw = RawFilters::new().set("page", "abc").set("limit", "x");
        let req = normalize("", &raw);
        assert_eq!(req.filters.page, 1);
        assert_eq!(req.filters.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_large_page_size_is_kept() {
        let req = normalize("", &RawFilters::new().set("pageSize", "150"));
        assert_eq!(req.filters.page_size, 150);

        let req = normalize("", &RawFilters::new().set("limit", "500").set("page", "2"));
        assert_eq!(req.filters.page_size, 500);
        assert_eq!(req.filters.offset(), 500);
    }

    #[test]
    fn test_full_filter_set() {
        let raw: RawFilters = [
            ("category", "electronics"),
            ("store", "acme"),
            ("minPrice", "50"),
            ("maxPrice", "200"),
            ("rating", "4"),
            ("sort", "price_asc"),
            ("page", "3"),
            ("pageSize", "10"),
        ]
        .into_iter()
        .collect();

        let f = normalize("q", &raw).filters;
        assert_eq!(f.category, Some(CategoryId::new("electronics")));
        assert_eq!(f.store, Some(StoreId::new("acme")));
        assert_eq!(f.min_price, Some(Price::from_cents(5000)));
        assert_eq!(f.max_price, Some(Price::from_cents(20000)));
        assert_eq!(f.min_rating, Some(4.0));
        assert_eq!(f.sort, SortMode::PriceAsc);
        assert_eq!(f.offset(), 20);
        assert_eq!(f.zero_based_page(), 2);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let raw = RawFilters::new().set("color", "red").set("utm_source", "mail");
        assert_eq!(normalize("", &raw).filters, SearchFilters::default());
    }

    #[test]
    fn test_price_clamping_and_swap() {
        let raw = RawFilters::new().set("min_price", "-10").set("max_price", "5");
        let f = normalize("", &raw).filters;
        assert_eq!(f.min_price, Some(Price::from_cents(0)));
        assert_eq!(f.max_price, Some(Price::from_cents(500)));

        let raw = RawFilters::new().set("minPrice", "200").set("maxPrice", "50");
        let f = normalize("", &raw).filters;
        assert_eq!(f.min_price, Some(Price::from_cents(5000)));
        assert_eq!(f.max_price, Some(Price::from_cents(20000)));
    }

    #[test]
    fn test_rating_clamped() {
        let f = normalize("", &RawFilters::new().set("minRating", "9")).filters;
        assert_eq!(f.min_rating, Some(MAX_RATING));
        let f = normalize("", &RawFilters::new().set("minRating", "0")).filters;
        assert_eq!(f.min_rating, None);
    }

    #[test]
    fn test_from_query_string() {
        let raw = RawFilters::from_query_string("?category=home%20office&sort=rating_desc&q=x+y");
        let f = normalize("", &raw).filters;
        assert_eq!(f.category, Some(CategoryId::new("home office")));
        assert_eq!(f.sort, SortMode::RatingDesc);
    }

    #[test]
    fn test_sort_parse_round_trip_keys() {
        for mode in [
            SortMode::Relevance,
            SortMode::PriceAsc,
            SortMode::PriceDesc,
            SortMode::RatingDesc,
            SortMode::Recency,
        ] {
            assert_eq!(SortMode::parse(mode.as_str()), mode);
        }
        assert_eq!(SortMode::parse("bogus"), SortMode::Relevance);
    }

    #[test]
    fn test_builder_pagination() {
        let f = SearchFilters::new().with_pagination(0, 0);
        assert_eq!((f.page, f.page_size), (1, DEFAULT_PAGE_SIZE));
        let f = SearchFilters::new().with_pagination(2, 1000);
        assert_eq!((f.page, f.page_size), (2, 1000));
    }
}
