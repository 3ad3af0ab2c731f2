//! Ingestion loop states
//!
//! A cycle starts in `Querying`, walks `Paginating` for as long as the API
//! hands back continuation tokens, then rests in `Idle` before starting over.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestState {
    /// Fresh search from the top of the upstream ranking
    Querying,

    /// Following a continuation token
    Paginating { page_token: String },

    /// Result set exhausted; waiting out the poll interval
    Idle,
}

impl IngestState {
    /// Token to send with the next request, if any
    pub fn page_token(&self) -> Option<&str> {
        match self {
            Self::Paginating { page_token } => Some(page_token),
            Self::Querying | Self::Idle => None,
        }
    }

    /// State after a page was processed successfully
    pub fn after_page(next_page_token: Option<String>) -> Self {
        match next_page_token {
            Some(page_token) => Self::Paginating { page_token },
            None => Self::Idle,
        }
    }
}

impl fmt::Display for IngestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Querying => write!(f, "querying"),
            Self::Paginating { page_token } => write!(f, "paginating({})", page_token),
            Self::Idle => write!(f, "idle"),
        }
    }
}
