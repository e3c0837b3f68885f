//! CLI execution context.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use market_sdk::prelude::{Marketplace, MemoryStore, ReqwestTransport};

use crate::config::CliConfig;
use crate::output::Output;

/// Upper bound for any single HTTP request; per-tier budgets are tighter.
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Execution context for CLI commands.
pub struct Context {
    /// Output handler.
    pub output: Output,
    /// The assembled engine.
    pub market: Marketplace,
}

impl Context {
    /// Load the catalog and assemble the search chain.
    pub fn load(config_path: Option<&str>, catalog: Option<&str>, output: Output) -> Result<Self> {
        let config = match config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let catalog_path = config.catalog_path(catalog);
        let store = MemoryStore::load(&catalog_path)
            .with_context(|| format!("Failed to load catalog: {}", catalog_path))?;
        let transport = ReqwestTransport::new(HTTP_TIMEOUT).context("Failed to build HTTP client")?;

        let market = Marketplace::from_config(&config.search_config(), Arc::new(store), Arc::new(transport));
        output.debug(&format!("Search chain: {}", market.search_chain().join(" -> ")));

        Ok(Self { output, market })
    }
}
