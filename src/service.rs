//! Service wiring - ingestion plus the query endpoint
//!
//! Opens the store, starts the ingestion loop in the background and serves
//! HTTP until the caller's shutdown future resolves. The same shutdown then
//! stops the loop, and its counters are returned once it has exited.

use crate::config::Config;
use crate::ingest::{CredentialPool, IngestStats, IngestionLoop};
use crate::server;
use crate::storage::{SqliteVideoStore, VideoStore};
use crate::Result;
use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Runs the service on the configured bind address
pub async fn run<F>(config: Config, shutdown: F) -> Result<IngestStats>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = config.server.bind_address.parse()?;
    let listener = TcpListener::bind(addr).await?;
    run_on(listener, config, shutdown).await
}

/// Runs the service on an already bound listener
pub async fn run_on<F>(listener: TcpListener, config: Config, shutdown: F) -> Result<IngestStats>
where
    F: Future<Output = ()> + Send + 'static,
{
    let pool = CredentialPool::new(config.search.api_keys.clone())?;

    let store: Arc<dyn VideoStore> =
        Arc::new(SqliteVideoStore::new(Path::new(&config.database.path))?);
    tracing::info!("Opened database at {}", config.database.path);

    let (stop_tx, stop_rx) = watch::channel(false);
    let ingestion = IngestionLoop::new(&config, pool, Arc::clone(&store), stop_rx);
    let ingest_handle = tokio::spawn(ingestion.run());

    server::serve(listener, store, async move {
        shutdown.await;
        // The loop may already be gone; nothing to stop then
        let _ = stop_tx.send(true);
    })
    .await?;

    let stats = ingest_handle.await?;
    Ok(stats)
}
