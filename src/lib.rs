//! Video-Poller: a search-API ingester with a keyword query endpoint
//!
//! This crate polls an external video search API for a fixed query, stores every
//! discovered video in SQLite, and serves keyword lookups over the stored rows.
//! Quota exhaustion is survived by rotating through a pool of API keys.

pub mod config;
pub mod ingest;
pub mod search;
pub mod server;
pub mod service;
pub mod storage;

use thiserror::Error;

/// Main error type for Video-Poller operations
#[derive(Debug, Error)]
pub enum PollerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid bind address: {0}")]
    BindAddress(#[from] std::net::AddrParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ingestion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("No search API keys configured")]
    MissingCredentials,
}

/// Result type alias for Video-Poller operations
pub type Result<T> = std::result::Result<T, PollerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use ingest::{Credential, CredentialPool, IngestStats, IngestionLoop};
pub use search::{SearchClient, SearchError, SearchPage};
pub use storage::{SqliteVideoStore, Video, VideoQuery, VideoStore};
