//! Video-Poller main entry point
//!
//! This is the command-line interface for the Video-Poller service.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use video_poller::config::{load_config_from_env, load_config_with_hash, Config};
use video_poller::storage::{SqliteVideoStore, VideoStore};

/// Video-Poller: search-API ingester with a keyword query endpoint
///
/// Polls the configured search query forever, storing every video found, and
/// serves `GET /videos?title=..&description=..` over the stored rows. API keys
/// come from SEARCH_API_KEYS (comma separated) or API_KEY.
#[derive(Parser, Debug)]
#[command(name = "video-poller")]
#[command(version)]
#[command(about = "Search-API video ingester and query service", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults plus environment when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and print the effective settings without starting
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show the number of stored videos and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_run(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("video_poller=info,warn"),
            1 => EnvFilter::new("video_poller=debug,tower_http=debug,info"),
            2 => EnvFilter::new("video_poller=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn load(cli: &Cli) -> Result<Config, video_poller::ConfigError> {
    match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::info!("No config file given; using defaults and environment");
            load_config_from_env()
        }
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Video-Poller Dry Run ===\n");

    println!("Search:");
    println!("  Endpoint: {}/search", config.search.base_url.trim_end_matches('/'));
    println!("  Query: {}", config.search.query);
    println!("  Max results per page: {}", config.search.max_results);
    println!("  Request timeout: {}s", config.search.request_timeout);
    if let Some(order) = &config.search.order {
        println!("  Order: {}", order);
    }

    println!("\nAPI keys ({}):", config.search.api_keys.len());
    for (i, key) in config.search.api_keys.iter().enumerate() {
        println!("  {}. {}", i + 1, key);
    }

    println!("\nIngestion:");
    println!("  Poll interval: {}ms", config.ingest.poll_interval);
    println!("  Retry backoff: {}ms", config.ingest.retry_backoff);

    println!("\nServer:");
    println!("  Bind address: {}", config.server.bind_address);

    println!("\nDatabase:");
    println!("  Path: {}", config.database.path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows what the database holds
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.database.path);

    let store = SqliteVideoStore::new(std::path::Path::new(&config.database.path))?;
    println!("Stored videos: {}", store.count()?);

    Ok(())
}

/// Runs ingestion and the query service until Ctrl-C
async fn handle_run(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting with {} API key(s), serving on {}",
        config.search.api_keys.len(),
        config.server.bind_address
    );

    match video_poller::service::run(config, shutdown_signal()).await {
        Ok(stats) => {
            tracing::info!("Shutdown complete ({})", stats);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Service failed: {}", e);
            Err(e.into())
        }
    }
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Received shutdown signal");
}
