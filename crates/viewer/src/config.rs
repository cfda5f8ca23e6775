use catalog::{HISTORY_LIMIT, StorageKeys};
use geocoding::{
    DEFAULT_RESULT_LIMIT, DEFAULT_USER_AGENT, MIN_QUERY_CHARS, NOMINATIM_ENDPOINT,
    SEARCH_DEBOUNCE_MS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiles::TileKeys;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid viewer config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("history_limit must be at least 1")]
    HistoryLimit,
    #[error("search.min_query_chars must be at least 1")]
    MinQueryChars,
    #[error("search.result_limit must be at least 1")]
    ResultLimit,
    #[error("search.endpoint must be an http(s) URL, got {0:?}")]
    Endpoint(String),
}

/// Viewer settings. Every section has defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub storage: StorageKeys,
    pub history_limit: usize,
    pub search: SearchConfig,
    pub tiles: TileKeys,
    /// `tracing` filter directive for the browser console, e.g. `info,viewer=debug`.
    pub log_filter: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            storage: StorageKeys::default(),
            history_limit: HISTORY_LIMIT,
            search: SearchConfig::default(),
            tiles: TileKeys::default(),
            log_filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    /// Shortest query (in characters) sent to the geocoder.
    pub min_query_chars: usize,
    pub endpoint: String,
    pub result_limit: usize,
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: SEARCH_DEBOUNCE_MS,
            min_query_chars: MIN_QUERY_CHARS,
            endpoint: NOMINATIM_ENDPOINT.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = if raw.trim().is_empty() {
            ViewerConfig::default()
        } else {
            serde_json::from_str(raw)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::HistoryLimit);
        }
        if self.search.min_query_chars == 0 {
            return Err(ConfigError::MinQueryChars);
        }
        if self.search.result_limit == 0 {
            return Err(ConfigError::ResultLimit);
        }
        let endpoint = self.search.endpoint.as_str();
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::Endpoint(self.search.endpoint.clone()));
        }
        Ok(())
    }
}
