use crate::ingest::Credential;
use serde::Deserialize;

/// Main configuration structure for Video-Poller
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Upstream search API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the API; `/search` is appended to it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// The fixed query polled on every cycle
    pub query: String,

    /// Page size requested from the API (1-50)
    #[serde(rename = "max-results")]
    pub max_results: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Optional result ordering passed through to the API (e.g. "date")
    pub order: Option<String>,

    /// API keys in rotation order
    #[serde(rename = "api-keys")]
    pub api_keys: Vec<Credential>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            query: "football in:title OR football in:description".to_string(),
            max_results: 50,
            request_timeout: 30,
            order: None,
            api_keys: Vec::new(),
        }
    }
}

/// Ingestion loop timing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Wait after a result set is exhausted before querying again (milliseconds)
    #[serde(rename = "poll-interval")]
    pub poll_interval: u64,

    /// Wait before retrying after a transient failure or an exhausted key pool (milliseconds)
    #[serde(rename = "retry-backoff")]
    pub retry_backoff: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            poll_interval: 10_000,
            retry_backoff: 10_000,
        }
    }
}

/// HTTP query service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    #[serde(rename = "bind-address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "videos.db".to_string(),
        }
    }
}
