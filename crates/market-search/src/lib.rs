//! Search resolution across interchangeable backends.
//!
//! A [`SearchOrchestrator`] holds an ordered chain of [`SearchBackend`]s:
//! a self-hosted full-text index, a hosted search service, and the
//! authoritative catalog store as the last resort. Each tier translates the
//! canonical [`SearchFilters`](market_commerce::SearchFilters) into its own
//! query language and maps the answer back into a
//! [`SearchResultPage`](market_commerce::SearchResultPage).
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use market_commerce::SearchFilters;
//! use market_data::MemoryStore;
//! use market_search::{ReqwestTransport, SearchConfig, SearchOrchestrator};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = Arc::new(ReqwestTransport::new(std::time::Duration::from_secs(2))?);
//! let store = Arc::new(MemoryStore::load("catalog.json")?);
//! let orchestrator = SearchOrchestrator::from_config(&SearchConfig::from_env(), store, transport);
//!
//! let page = orchestrator.search("wireless headphones", &SearchFilters::new()).await?;
//! println!("{} matches", page.pagination.total);
//! # Ok(())
//! # }
//! ```

pub mod algolia;
mod backend;
pub mod config;
mod document;
pub mod elastic;
mod error;
mod orchestrator;
pub mod relational;
mod transport;

pub use algolia::AlgoliaBackend;
pub use backend::{BackendKind, SearchBackend};
pub use config::{AlgoliaConfig, ElasticConfig, RelationalConfig, SearchConfig};
pub use document::IndexedProduct;
pub use elastic::ElasticBackend;
pub use error::{BackendError, SearchError};
pub use orchestrator::{SearchOrchestrator, SearchOutcome};
pub use relational::RelationalBackend;
pub use transport::{HttpRequest, HttpTransport, MockTransport, ReqwestTransport, TransportError};
