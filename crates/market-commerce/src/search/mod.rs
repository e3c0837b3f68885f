//! Search module.
//!
//! Contains the canonical filter model, its normalizer, and result pages.

mod filter;
mod results;

pub use filter::{
    normalize, RawFilters, SearchFilters, SearchRequest, SortMode, DEFAULT_PAGE_SIZE,
    MAX_RATING,
};
pub use results::{Pagination, RankedProduct, SearchResultPage};
