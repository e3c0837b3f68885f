//! CLI configuration.

use anyhow::{Context, Result};
use market_sdk::prelude::SearchConfig;
use serde::{Deserialize, Serialize};

/// Default catalog fixture location.
pub const DEFAULT_CATALOG: &str = "fixtures/catalog.json";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog fixture path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Search chain. When absent, read from the environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// The search chain configuration in effect.
    pub fn search_config(&self) -> SearchConfig {
        self.search.clone().unwrap_or_else(SearchConfig::from_env)
    }

    /// The catalog path in effect, preferring an explicit override.
    pub fn catalog_path(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| self.catalog.clone())
            .unwrap_or_else(|| DEFAULT_CATALOG.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_config() {
        let config: CliConfig = toml::from_str(
            r#"
            catalog = "data/catalog.json"

            [search.elasticsearch]
            node = "http://localhost:9200"
            timeout_ms = 300

            [search.algolia]
            app_id = "APP"
            api_key = "key"
            "#,
        )
        .unwrap();

        let search = config.search_config();
        assert_eq!(search.elasticsearch.unwrap().timeout_ms, Some(300));
        assert_eq!(search.algolia.unwrap().index_name, "products");
        assert_eq!(config.catalog_path(None), "data/catalog.json");
        assert_eq!(config.catalog_path(Some("other.json")), "other.json");
    }

    #[test]
    fn test_default_catalog() {
        assert_eq!(CliConfig::default().catalog_path(None), DEFAULT_CATALOG);
    }
}
