//! Prelude for convenient imports.

pub use crate::Marketplace;

pub use market_commerce::prelude::*;
pub use market_data::{CatalogFixture, CatalogStore, DbError, MemoryStore};
pub use market_observability::{init_tracing, FallbackTrace, LogFormat};
pub use market_recommend::PreferenceProfile;
pub use market_search::{
    BackendError, HttpTransport, ReqwestTransport, SearchBackend, SearchConfig, SearchError,
    SearchOrchestrator, SearchOutcome,
};
