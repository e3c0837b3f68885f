//! Search result pages and pagination.

use crate::catalog::Product;
use crate::search::{SearchFilters, SortMode};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Total number of matching items across all pages.
    pub total: u64,
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// `ceil(total / page_size)`; zero when there are no hits.
    pub total_pages: u64,
}

impl Pagination {
    /// Create pagination info.
    pub fn new(page: u32, page_size: u32, total: u64) -> Self {
        let per_page = u64::from(page_size.max(1));
        Self {
            total,
            page,
            page_size,
            total_pages: total.div_ceil(per_page),
        }
    }

    /// Pagination for the page described by `filters`.
    pub fn for_filters(filters: &SearchFilters, total: u64) -> Self {
        Self::new(filters.page, filters.page_size, total)
    }

    /// Whether there's a next page.
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }

    /// Whether there's a previous page.
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// A product in a result page, tagged with its rank score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedProduct {
    #[serde(flatten)]
    pub product: Product,
    /// Relevance score as reported by the serving backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RankedProduct {
    pub fn new(product: Product, score: Option<f64>) -> Self {
        Self { product, score }
    }
}

/// One backend's page of search results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResultPage {
    /// The ranked items on this page.
    pub items: Vec<RankedProduct>,
    pub pagination: Pagination,
}

impl SearchResultPage {
    /// Create a result page.
    pub fn new(items: Vec<RankedProduct>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    /// An empty page for the requested filters.
    pub fn empty(filters: &SearchFilters) -> Self {
        Self::new(Vec::new(), Pagination::for_filters(filters, 0))
    }

    /// Stable re-sort of this page by an explicit sort mode.
    ///
    /// Relevance keeps the backend's order.
    pub fn sort_within_page(&mut self, sort: SortMode) {
        let cmp: fn(&RankedProduct, &RankedProduct) -> Ordering = match sort {
            SortMode::Relevance => return,
            SortMode::PriceAsc => |a, b| a.product.price.cmp(&b.product.price),
            SortMode::PriceDesc => |a, b| b.product.price.cmp(&a.product.price),
            SortMode::RatingDesc => |a, b| b.product.rating.total_cmp(&a.product.rating),
            SortMode::Recency => |a, b| b.product.created_at.cmp(&a.product.created_at),
        };
        self.items.sort_by(cmp);
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price::Price;

    fn ranked(id: &str, cents: i64) -> RankedProduct {
        RankedProduct::new(
            Product::new(id, id, "c", "s", Price::from_cents(cents)),
            Some(1.0),
        )
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(Pagination::new(1, 10, 45).total_pages, 5);
        assert_eq!(Pagination::new(1, 10, 40).total_pages, 4);
        assert_eq!(Pagination::new(1, 20, 2).total_pages, 1);
    }

    #[test]
    fn test_no_hits_means_no_pages() {
        let p = Pagination::new(1, 20, 0);
        assert_eq!(p.total, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next());
    }

    #[test]
    fn test_navigation_flags() {
        let p = Pagination::new(2, 10, 45);
        assert!(p.has_next());
        assert!(p.has_prev());
        let p = Pagination::new(5, 10, 45);
        assert!(!p.has_next());
    }

    #[test]
    fn test_sort_within_page_price() {
        let mut page = SearchResultPage::new(
            vec![ranked("b", 14999), ranked("a", 7999), ranked("c", 9999)],
            Pagination::new(1, 20, 3),
        );
        page.sort_within_page(SortMode::PriceAsc);
        let ids: Vec<_> = page.items.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);

        page.sort_within_page(SortMode::Relevance);
        let ids: Vec<_> = page.items.iter().map(|r| r.product.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_ranked_product_serializes_flat() {
        let json = serde_json::to_value(ranked("p", 100)).unwrap();
        assert_eq!(json["id"], "p");
        assert_eq!(json["score"], 1.0);
    }
}
