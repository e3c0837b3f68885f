//! Catalog query builder.

use crate::filter::{matches_all, ProductFilter};
use crate::text;
use market_commerce::Product;
use serde::{Deserialize, Serialize};

/// Sort options for catalog queries. All sorts are stable: ties keep catalog
/// (insertion) order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum ProductSort {
    /// Catalog insertion order.
    #[default]
    Catalog,
    /// Newest first.
    Newest,
    /// Price, low to high.
    PriceAsc,
    /// Price, high to low.
    PriceDesc,
    /// Highest rated first.
    RatingDesc,
    /// Highest rated first, then most reviewed.
    Popularity,
    /// Largest discount first.
    DiscountDesc,
    /// Keyword relevance for the given query text, best first.
    TextScore(String),
}

impl ProductSort {
    /// Sort products in place.
    pub fn apply(&self, products: &mut Vec<Product>) {
        match self {
            ProductSort::Catalog => {}
            ProductSort::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ProductSort::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::RatingDesc => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            ProductSort::Popularity => products.sort_by(|a, b| {
                b.rating
                    .total_cmp(&a.rating)
                    .then_with(|| b.review_count.cmp(&a.review_count))
            }),
            ProductSort::DiscountDesc => products.sort_by(|a, b| {
                b.discount
                    .unwrap_or(0.0)
                    .total_cmp(&a.discount.unwrap_or(0.0))
            }),
            ProductSort::TextScore(query) => {
                let terms = text::query_terms(query);
                let mut scored: Vec<(f64, Product)> = products
                    .drain(..)
                    .map(|p| (text::text_score(&p, &terms), p))
                    .collect();
                scored.sort_by(|a, b| b.0.total_cmp(&a.0));
                products.extend(scored.into_iter().map(|(_, p)| p));
            }
        }
    }
}

/// A query over active products: AND-combined filters, a sort, and a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Filters to apply.
    pub filters: Vec<ProductFilter>,
    /// Sort option.
    pub sort: ProductSort,
    /// Maximum number of products to return.
    pub limit: Option<usize>,
    /// Number of matching products to skip.
    pub offset: usize,
}

impl ProductQuery {
    /// Create a new query matching every active product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter.
    pub fn with_filter(mut self, filter: ProductFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set sort option.
    pub fn with_sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Whether a product satisfies every filter (activity is checked by the store).
    pub fn matches(&self, product: &Product) -> bool {
        matches_all(&self.filters, product)
    }

    /// Sort and window an already-filtered candidate list.
    pub fn paginate(&self, mut products: Vec<Product>) -> Vec<Product> {
        self.sort.apply(&mut products);
        let window = products.into_iter().skip(self.offset);
        match self.limit {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        }
    }
}
