//! Storage module for persisting discovered videos
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Appending videos found by the ingestion loop
//! - Keyword lookups for the query service

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteVideoStore;
pub use traits::{StorageError, StorageResult, VideoStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A video as stored and served
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub title: String,
    pub description: String,
    #[serde(rename = "publishTime")]
    pub publish_time: DateTime<Utc>,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
}

/// Keyword filter for [`VideoStore::query`]
///
/// At least one pattern is always present; blank patterns count as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoQuery {
    title: Option<String>,
    description: Option<String>,
}

impl VideoQuery {
    /// Builds a query from optional patterns
    ///
    /// Returns `None` when neither pattern has any content.
    pub fn new(title: Option<String>, description: Option<String>) -> Option<Self> {
        let title = title.filter(|t| !t.is_empty());
        let description = description.filter(|d| !d.is_empty());

        if title.is_none() && description.is_none() {
            return None;
        }

        Some(Self { title, description })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
