//! Ingestion loop - search polling and persistence
//!
//! This module contains the long-running loop that:
//! - Queries the search API and follows pagination
//! - Normalizes and stores every hit, skipping bad items
//! - Rotates credentials when a quota is exhausted
//! - Backs off on transient failures and between result sets
//!
//! No failure escapes the loop. It stops only when the shutdown signal fires,
//! and only at one of its wait points.

use crate::config::{Config, SearchConfig};
use crate::ingest::state::IngestState;
use crate::ingest::stats::IngestStats;
use crate::ingest::CredentialPool;
use crate::search::{SearchClient, SearchError, SearchPage};
use crate::storage::VideoStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// The polling state machine
pub struct IngestionLoop {
    search: SearchConfig,
    poll_interval: Duration,
    retry_backoff: Duration,
    pool: CredentialPool,
    store: Arc<dyn VideoStore>,
    shutdown: watch::Receiver<bool>,
    state: IngestState,
    stats: IngestStats,
}

impl IngestionLoop {
    /// Creates a loop that starts in `Querying` with the pool's current credential
    ///
    /// # Arguments
    ///
    /// * `config` - Search settings and loop timing
    /// * `pool` - Credentials in rotation order; owned by the loop from here on
    /// * `store` - Where discovered videos are written
    /// * `shutdown` - Set to `true` (or drop the sender) to stop the loop at its next wait
    pub fn new(
        config: &Config,
        pool: CredentialPool,
        store: Arc<dyn VideoStore>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            search: config.search.clone(),
            poll_interval: Duration::from_millis(config.ingest.poll_interval),
            retry_backoff: Duration::from_millis(config.ingest.retry_backoff),
            pool,
            store,
            shutdown,
            state: IngestState::Querying,
            stats: IngestStats::default(),
        }
    }

    /// Runs until shutdown and returns the accumulated counters
    pub async fn run(mut self) -> IngestStats {
        tracing::info!(
            "Starting ingestion for '{}' with {} API key(s)",
            self.search.query,
            self.pool.size()
        );

        let mut client: Option<SearchClient> = None;

        // Pool position where the current run of quota failures began
        let mut exhausted_from: Option<usize> = None;

        loop {
            if self.state == IngestState::Idle {
                if self.pause(self.poll_interval).await {
                    break;
                }
                self.state = IngestState::Querying;
            }

            let active = match client.take() {
                Some(c) => c,
                None => match SearchClient::new(&self.search, self.pool.current().clone()) {
                    Ok(c) => {
                        tracing::debug!("Search client ready for key {}", c.credential());
                        c
                    }
                    Err(e) => {
                        if self.back_off(&e).await {
                            break;
                        }
                        continue;
                    }
                },
            };

            tracing::debug!("Requesting page ({})", self.state);
            let result = active
                .search(&self.search.query, self.state.page_token())
                .await;
            client = Some(active);

            match result {
                Ok(page) => {
                    exhausted_from = None;
                    self.process_page(page);
                }

                Err(SearchError::QuotaExceeded { status, reason }) => {
                    let start = *exhausted_from.get_or_insert(self.pool.position());
                    let exhausted = self.pool.current().clone();
                    let next = self.pool.rotate().clone();
                    self.stats.rotations += 1;
                    client = None;

                    tracing::warn!(
                        "Quota exceeded for key {} (HTTP {}, {}); rotating to key {}",
                        exhausted,
                        status,
                        reason,
                        next
                    );

                    if self.pool.position() == start {
                        exhausted_from = None;
                        self.stats.exhausted_backoffs += 1;
                        tracing::warn!(
                            "All {} API key(s) exhausted; retrying in {:?}",
                            self.pool.size(),
                            self.retry_backoff
                        );
                        if self.pause(self.retry_backoff).await {
                            break;
                        }
                    }
                }

                Err(e @ SearchError::Transient(_)) => {
                    if self.back_off(&e).await {
                        break;
                    }
                }
            }
        }

        tracing::info!("Ingestion stopped: {}", self.stats);
        self.stats
    }

    /// Stores a page's items and moves to the next state
    fn process_page(&mut self, page: SearchPage) {
        let mut inserted = 0;
        let mut skipped = 0;

        for item in &page.items {
            let video = match item.to_video() {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("Skipping item: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            match self.store.insert(&video) {
                Ok(_) => inserted += 1,
                Err(e) => {
                    self.stats.insert_failures += 1;
                    tracing::warn!("Failed to store video {}: {}", item.video_id(), e);
                }
            }
        }

        self.stats.pages += 1;
        self.stats.inserted += inserted;
        self.stats.skipped += skipped;

        tracing::debug!(
            "Page done ({}): {} items, {} inserted, {} skipped",
            self.state,
            page.items.len(),
            inserted,
            skipped
        );

        self.state = IngestState::after_page(page.next_page_token);

        if self.state == IngestState::Idle {
            self.stats.cycles += 1;
            tracing::info!(
                "Result set exhausted (cycle {}): {} videos stored so far; next poll in {:?}",
                self.stats.cycles,
                self.stats.inserted,
                self.poll_interval
            );
        }
    }

    /// Logs a transient failure and waits out the retry backoff
    ///
    /// Returns `true` if shutdown was requested during the wait.
    async fn back_off(&mut self, error: &SearchError) -> bool {
        self.stats.transient_failures += 1;
        tracing::warn!("{}; retrying in {:?}", error, self.retry_backoff);
        self.pause(self.retry_backoff).await
    }

    /// Sleeps for `duration` unless shutdown is requested first
    ///
    /// Returns `true` if the loop should stop.
    async fn pause(&mut self, duration: Duration) -> bool {
        if *self.shutdown.borrow() {
            return true;
        }

        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            _ = self.shutdown.wait_for(|stop| *stop) => true,
        }
    }
}
