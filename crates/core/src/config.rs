//! Application configuration: TOML file with full defaults, plus an
//! environment override for the database URL so deployments never need a
//! file just to point at a different database.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::rules::RuleConfig;

pub const DATABASE_URL_ENV: &str = "VITRINE_DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub recommender: RecommenderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { database: DatabaseConfig::default(), recommender: RecommenderConfig::default() }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: "sqlite:vitrine.db".to_owned(), max_connections: 5, timeout_secs: 30 }
    }
}

/// Tuning knobs for the recommendation engine.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Default result size for product-context recommendations.
    pub default_limit: usize,
    /// Default result size for the trending rail.
    pub trending_limit: usize,
    /// Replacement stopword set for the tokenizer. `None` keeps the
    /// built-in English list even though most catalog text is not English;
    /// deployments that care supply their own list here.
    pub stopwords: Option<Vec<String>>,
    pub rules: RuleConfig,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_limit: 4,
            trending_limit: 8,
            stopwords: None,
            rules: RuleConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Load from `path` when it exists, defaults otherwise; then apply the
    /// `VITRINE_DATABASE_URL` environment override.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::from_toml_str(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.is_empty() {
                config.database.url = url;
            }
        }
        Ok(config)
    }
}
