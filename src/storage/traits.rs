//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{Video, VideoQuery};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid publish time in row {id}: {value}")]
    InvalidPublishTime { id: i64, value: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for video storage backends
///
/// Each call is a single statement against the backend. Implementations are
/// shared between the ingestion task and request handlers, so they must
/// serialize access internally.
pub trait VideoStore: Send + Sync {
    /// Inserts one video and returns its assigned row ID
    ///
    /// No deduplication is performed; inserting the same video twice yields two rows.
    fn insert(&self, video: &Video) -> StorageResult<i64>;

    /// Returns videos matching every supplied pattern, newest `publish_time` first
    ///
    /// Matching is case-insensitive substring containment on the chosen field(s).
    fn query(&self, query: &VideoQuery) -> StorageResult<Vec<Video>>;

    /// Counts stored videos
    fn count(&self) -> StorageResult<u64>;
}
