//! Configuration module for Video-Poller
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file, with secrets overlaid from the process environment.
//!
//! # Example
//!
//! ```no_run
//! use video_poller::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("poller.toml")).unwrap();
//! println!("Rotating through {} API keys", config.search.api_keys.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DatabaseConfig, IngestConfig, SearchConfig, ServerConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_from_env,
    load_config_with_hash, ENV_API_KEY, ENV_API_KEYS, ENV_BIND_ADDRESS, ENV_DATABASE_PATH,
};
pub use validation::validate;
