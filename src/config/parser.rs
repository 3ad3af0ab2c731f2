use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ingest::Credential;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Comma-separated API keys, in rotation order
pub const ENV_API_KEYS: &str = "SEARCH_API_KEYS";

/// Single API key, used only when no other keys are configured
pub const ENV_API_KEY: &str = "API_KEY";

pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";

pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Loads and parses a configuration file from the given path
///
/// Environment overrides are applied after parsing and before validation, so
/// secrets never have to live in the file.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use video_poller::config::load_config;
///
/// let config = load_config(Path::new("poller.toml")).unwrap();
/// println!("Polling for: {}", config.search.query);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config: Config = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate(&config)?;

    Ok(config)
}

/// Builds a configuration from defaults and the process environment only
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    let mut config = Config::default();

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate(&config)?;

    Ok(config)
}

/// Overlays environment-sourced values onto a parsed configuration
///
/// `lookup` resolves a variable name to its value; unset or blank variables
/// leave the configuration untouched.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(keys) = non_blank(ENV_API_KEYS) {
        config.search.api_keys = keys
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(Credential::new)
            .collect();
    }

    if config.search.api_keys.is_empty() {
        if let Some(key) = non_blank(ENV_API_KEY) {
            config.search.api_keys = vec![Credential::new(key.trim())];
        }
    }

    if let Some(path) = non_blank(ENV_DATABASE_PATH) {
        config.database.path = path;
    }

    if let Some(addr) = non_blank(ENV_BIND_ADDRESS) {
        config.server.bind_address = addr;
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so operators can tell which file revision a process runs with.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
