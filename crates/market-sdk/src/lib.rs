//! # Market SDK
//!
//! Search and recommendation resolution for a marketplace catalog.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use market_sdk::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::load("catalog.json")?);
//! let transport = Arc::new(ReqwestTransport::new(std::time::Duration::from_secs(2))?);
//! let market = Marketplace::from_config(&SearchConfig::from_env(), store, transport);
//!
//! let raw = RawFilters::from_query_string("category=electronics&sort=price_asc");
//! let page = market.search_raw("wireless headphones", &raw).await?;
//! let picks = market.recommend(Some(&UserId::new("u-1")), 8).await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Surfaces
//!
//! - **Search**: ordered fallback across a self-hosted index, a hosted
//!   service and the catalog store; fails only when every tier fails
//! - **Recommend**: wishlist-first personalized picks, never fails
//! - **Related / Popular / On sale**: catalog rankings, never fail

mod marketplace;
pub mod prelude;

pub use market_commerce;
pub use market_data;
pub use market_observability;
pub use market_recommend;
pub use market_search;

pub use marketplace::Marketplace;
