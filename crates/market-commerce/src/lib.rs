//! Marketplace domain types.
//!
//! This crate provides the read-only records and request/response shapes the
//! resolution engine works with:
//!
//! - **Catalog**: Products with pricing, rating and merchandising flags
//! - **Account**: Shoppers, wishlists and placed orders
//! - **Search**: Canonical filters, the normalizer, result pages
//!
//! # Example
//!
//! ```rust
//! use market_commerce::prelude::*;
//!
//! let raw = RawFilters::from_query_string("category=electronics&minPrice=50&sort=price_asc");
//! let request = normalize("wireless headphones", &raw);
//!
//! assert_eq!(request.filters.sort, SortMode::PriceAsc);
//! assert_eq!(request.filters.page, 1);
//! ```

pub mod ids;
pub mod price;

pub mod account;
pub mod catalog;
pub mod search;

pub use ids::*;
pub use price::Price;

pub use account::{Order, OrderLineItem, User};
pub use catalog::Product;
pub use search::{
    normalize, Pagination, RankedProduct, RawFilters, SearchFilters, SearchRequest,
    SearchResultPage, SortMode,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::price::Price;

    pub use crate::account::{Order, OrderLineItem, User};
    pub use crate::catalog::Product;
    pub use crate::search::{
        normalize, Pagination, RankedProduct, RawFilters, SearchFilters, SearchRequest,
        SearchResultPage, SortMode,
    };
}
