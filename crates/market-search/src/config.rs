//! Search tier configuration.
//!
//! Tiers are configured from the environment or from a config file section.
//! A tier whose section is absent is left out of the chain; a tier whose
//! section is present but incomplete still joins it and reports itself as
//! not configured when attempted.

use serde::{Deserialize, Serialize};

/// Environment variables read by [`SearchConfig::from_env`].
pub mod env {
    pub const ELASTIC_NODE: &str = "ELASTIC_NODE";
    pub const ELASTIC_USERNAME: &str = "ELASTIC_USERNAME";
    pub const ELASTIC_PASSWORD: &str = "ELASTIC_PASSWORD";
    pub const ELASTIC_INDEX: &str = "ELASTIC_INDEX";
    pub const ALGOLIA_APP_ID: &str = "ALGOLIA_APP_ID";
    pub const ALGOLIA_API_KEY: &str = "ALGOLIA_API_KEY";
    pub const ALGOLIA_INDEX_NAME: &str = "ALGOLIA_INDEX_NAME";
    pub const SEARCH_TIMEOUT_MS: &str = "SEARCH_TIMEOUT_MS";
}

/// Self-hosted index settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticConfig {
    /// Base URL of the cluster node.
    pub node: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_index")]
    pub index: String,
    /// Attempt timeout override (milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Hosted search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgoliaConfig {
    pub app_id: String,
    pub api_key: String,
    #[serde(default = "default_index")]
    pub index_name: String,
    /// Override for the API host (defaults to the application's DSN host).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Catalog store tier settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationalConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

/// Configuration for the whole search chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elasticsearch: Option<ElasticConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algolia: Option<AlgoliaConfig>,
    #[serde(default)]
    pub relational: RelationalConfig,
}

fn default_index() -> String {
    "products".to_string()
}

impl SearchConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through a variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let timeout_ms = get(env::SEARCH_TIMEOUT_MS).and_then(|v| v.parse::<u64>().ok());

        let elasticsearch = get(env::ELASTIC_NODE).map(|node| ElasticConfig {
            node,
            username: get(env::ELASTIC_USERNAME),
            password: get(env::ELASTIC_PASSWORD),
            index: get(env::ELASTIC_INDEX).unwrap_or_else(default_index),
            timeout_ms,
        });

        let app_id = get(env::ALGOLIA_APP_ID);
        let api_key = get(env::ALGOLIA_API_KEY);
        let algolia = if app_id.is_some() || api_key.is_some() {
            Some(AlgoliaConfig {
                app_id: app_id.unwrap_or_default(),
                api_key: api_key.unwrap_or_default(),
                index_name: get(env::ALGOLIA_INDEX_NAME).unwrap_or_else(default_index),
                host: None,
                timeout_ms,
            })
        } else {
            None
        };

        Self {
            elasticsearch,
            algolia,
            relational: RelationalConfig::default(),
        }
    }

    /// Names of the tiers this configuration enables, in chain order.
    pub fn enabled_tiers(&self) -> Vec<&'static str> {
        let mut tiers = Vec::new();
        if self.elasticsearch.is_some() {
            tiers.push("elasticsearch");
        }
        if self.algolia.is_some() {
            tiers.push("algolia");
        }
        tiers.push("relational");
        tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let config = SearchConfig::from_lookup(lookup(&[]));
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.enabled_tiers(), vec!["relational"]);
    }

    #[test]
    fn test_full_environment() {
        let config = SearchConfig::from_lookup(lookup(&[
            ("ELASTIC_NODE", "http://localhost:9200"),
            ("ELASTIC_USERNAME", "elastic"),
            ("ALGOLIA_APP_ID", "APP"),
            ("ALGOLIA_API_KEY", "key"),
            ("ALGOLIA_INDEX_NAME", "catalog"),
            ("SEARCH_TIMEOUT_MS", "250"),
        ]));

        let es = config.elasticsearch.clone().unwrap();
        assert_eq!(es.index, "products");
        assert_eq!(es.username.as_deref(), Some("elastic"));
        assert_eq!(es.password, None);
        assert_eq!(es.timeout_ms, Some(250));

        let algolia = config.algolia.clone().unwrap();
        assert_eq!(algolia.index_name, "catalog");
        assert_eq!(config.enabled_tiers(), vec!["elasticsearch", "algolia", "relational"]);
    }

    #[test]
    fn test_partial_credentials_still_join_chain() {
        let config = SearchConfig::from_lookup(lookup(&[("ALGOLIA_APP_ID", "APP"), ("ELASTIC_NODE", " ")]));
        assert!(config.elasticsearch.is_none());
        assert_eq!(config.algolia.unwrap().api_key, "");
    }

    #[test]
    fn test_deserialize_section() {
        let config: SearchConfig = serde_json::from_str(
            r#"{ "algolia": { "app_id": "APP", "api_key": "key" }, "relational": { "timeout_ms": 900 } }"#,
        )
        .unwrap();
        assert_eq!(config.algolia.unwrap().index_name, "products");
        assert_eq!(config.relational.timeout_ms, Some(900));
    }
}
