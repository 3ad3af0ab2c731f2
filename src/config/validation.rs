use crate::config::types::{Config, DatabaseConfig, IngestConfig, SearchConfig, ServerConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_search_config(&config.search)?;
    validate_ingest_config(&config.ingest)?;
    validate_server_config(&config.server)?;
    validate_database_config(&config.database)?;
    Ok(())
}

/// Validates the upstream search configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.query.trim().is_empty() {
        return Err(ConfigError::Validation("query cannot be empty".to_string()));
    }

    if config.max_results < 1 || config.max_results > 50 {
        return Err(ConfigError::Validation(format!(
            "max-results must be between 1 and 50, got {}",
            config.max_results
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request-timeout must be >= 1s".to_string(),
        ));
    }

    if config.api_keys.is_empty() {
        return Err(ConfigError::MissingCredentials);
    }

    if config.api_keys.iter().any(|key| key.as_str().trim().is_empty()) {
        return Err(ConfigError::Validation(
            "api-keys cannot contain empty keys".to_string(),
        ));
    }

    Ok(())
}

/// Validates loop timing
fn validate_ingest_config(config: &IngestConfig) -> Result<(), ConfigError> {
    if config.poll_interval < 1 {
        return Err(ConfigError::Validation(
            "poll-interval must be >= 1ms".to_string(),
        ));
    }

    if config.retry_backoff < 1 {
        return Err(ConfigError::Validation(
            "retry-backoff must be >= 1ms".to_string(),
        ));
    }

    Ok(())
}

fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid bind-address '{}': {}",
            config.bind_address, e
        ))
    })?;
    Ok(())
}

fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        ));
    }
    Ok(())
}
