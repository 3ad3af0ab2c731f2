//! Search API client and its failure taxonomy
//!
//! Failures are scoped to the unit they affect:
//! - [`SearchError`] covers a whole call (quota exhaustion or a transient fault)
//! - [`ItemError`] covers one hit inside an otherwise good page

mod client;
mod types;

pub use client::{build_http_client, classify_failure, SearchClient};
pub use types::{
    parse_publish_time, ApiErrorBody, ApiErrorDetail, ApiErrorResponse, ItemId,
    SearchItem, SearchListResponse, Snippet, Thumbnail, Thumbnails,
};

use thiserror::Error;

/// Page-scoped search failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The active credential hit its quota or rate limit; rotate and retry
    #[error("Quota exceeded (HTTP {status}, reason: {reason})")]
    QuotaExceeded { status: u16, reason: String },

    /// Network fault, server error or unusable response; retry after a backoff
    #[error("Transient search failure: {0}")]
    Transient(String),
}

/// Item-scoped failure; the item is skipped and the page continues
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item {id} has no snippet")]
    MissingSnippet { id: String },

    #[error("Item {id} has invalid publish time '{value}': {source}")]
    InvalidPublishTime {
        id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// One page of search results
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub items: Vec<SearchItem>,

    /// Token for the following page; never `Some("")`
    pub next_page_token: Option<String>,
}

impl From<SearchListResponse> for SearchPage {
    fn from(response: SearchListResponse) -> Self {
        Self {
            items: response.items,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        }
    }
}
