//! Product predicates understood by every catalog store.

use crate::text;
use market_commerce::{CategoryId, Price, Product, ProductId, StoreId};
use serde::{Deserialize, Serialize};

/// A predicate over active products. A list of filters is combined with AND;
/// [`ProductFilter::Any`] expresses OR.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ProductFilter {
    /// Filter by single category.
    Category(CategoryId),
    /// Filter by multiple categories (OR).
    Categories(Vec<CategoryId>),
    /// Filter by single store.
    Store(StoreId),
    /// Filter by multiple stores (OR).
    Stores(Vec<StoreId>),
    /// Filter by single brand.
    Brand(String),
    /// Filter by multiple brands (OR).
    Brands(Vec<String>),
    /// Filter by price range (inclusive).
    PriceRange {
        min: Option<Price>,
        max: Option<Price>,
    },
    /// Filter by minimum rating.
    Rating {
        min: f64,
    },
    /// Filter by minimum review count.
    MinReviews(u32),
    /// Only featured products.
    Featured,
    /// Only products on sale with a positive discount.
    OnSale,
    /// Keyword match on name, brand, tags and description.
    Text(String),
    /// Only these products.
    Ids(Vec<ProductId>),
    /// Anything but these products.
    ExcludeIds(Vec<ProductId>),
    /// At least one of the nested filters.
    Any(Vec<ProductFilter>),
}

impl ProductFilter {
    /// Create a category filter.
    pub fn category(id: impl Into<CategoryId>) -> Self {
        ProductFilter::Category(id.into())
    }

    /// Create a store filter.
    pub fn store(id: impl Into<StoreId>) -> Self {
        ProductFilter::Store(id.into())
    }

    /// Create a brand filter.
    pub fn brand(brand: impl Into<String>) -> Self {
        ProductFilter::Brand(brand.into())
    }

    /// Create a price range filter.
    pub fn price_range(min: Option<Price>, max: Option<Price>) -> Self {
        ProductFilter::PriceRange { min, max }
    }

    /// Create a text search filter.
    pub fn text(query: impl Into<String>) -> Self {
        ProductFilter::Text(query.into())
    }

    /// Exclude a single product.
    pub fn exclude(id: ProductId) -> Self {
        ProductFilter::ExcludeIds(vec![id])
    }

    /// Evaluate against a product.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::Category(id) => &product.category == id,
            ProductFilter::Categories(ids) => ids.contains(&product.category),
            ProductFilter::Store(id) => &product.store == id,
            ProductFilter::Stores(ids) => ids.contains(&product.store),
            ProductFilter::Brand(brand) => product.brand_name() == Some(brand.as_str()),
            ProductFilter::Brands(brands) => product
                .brand_name()
                .is_some_and(|b| brands.iter().any(|candidate| candidate == b)),
            ProductFilter::PriceRange { min, max } => {
                min.map_or(true, |min| product.price >= min)
                    && max.map_or(true, |max| product.price <= max)
            }
            ProductFilter::Rating { min } => product.rating >= *min,
            ProductFilter::MinReviews(min) => product.review_count >= *min,
            ProductFilter::Featured => product.is_featured,
            ProductFilter::OnSale => {
                product.is_on_sale && product.discount.is_some_and(|d| d > 0.0)
            }
            ProductFilter::Text(query) => {
                let terms = text::query_terms(query);
                terms.is_empty() || text::matches_text(product, &terms)
            }
            ProductFilter::Ids(ids) => ids.contains(&product.id),
            ProductFilter::ExcludeIds(ids) => !ids.contains(&product.id),
            ProductFilter::Any(filters) => filters.iter().any(|f| f.matches(product)),
        }
    }
}

/// Evaluate an AND-combined filter list.
pub fn matches_all(filters: &[ProductFilter], product: &Product) -> bool {
    filters.iter().all(|f| f.matches(product))
}
