//! Recommendation surfaces for the storefront.
//!
//! - [`PreferenceProfiler`]: derives category/brand/store affinity from orders
//! - [`RecommendationEngine`]: wishlist-first personalized recommendations
//! - [`RelatedResolver`]: same-category, then same brand or store
//! - [`PopularityRanker`]: well-reviewed products, the terminal fallback
//! - [`DealsFeed`]: products on sale
//!
//! None of these surfaces returns an error. A shopper always sees something,
//! if only generic popular products.

mod deals;
mod engine;
mod popular;
mod profile;
mod related;

pub use deals::DealsFeed;
pub use engine::{RecommendationEngine, WISHLIST_LIMIT};
pub use popular::{PopularityRanker, MIN_POPULAR_RATING, MIN_POPULAR_REVIEWS};
pub use profile::{PreferenceProfile, PreferenceProfiler, TOP_K};
pub use related::RelatedResolver;
