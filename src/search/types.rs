//! Wire types for the search API
//!
//! Every field is defaulted so a sparse or partially malformed item never
//! fails the whole page; item-level problems surface from
//! [`SearchItem::to_video`] instead.

use crate::search::ItemError;
use crate::storage::Video;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body of a successful `search.list` call
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One raw search hit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub snippet: Option<Snippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemId {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snippet {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    pub url: String,
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    pub message: String,
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiErrorDetail {
    pub reason: String,
}

impl SearchItem {
    /// Upstream video ID, or `"<unknown>"` for logging
    pub fn video_id(&self) -> &str {
        self.id
            .as_ref()
            .and_then(|id| id.video_id.as_deref())
            .unwrap_or("<unknown>")
    }

    /// Normalizes the item into a storable video
    ///
    /// A missing default thumbnail becomes an empty URL.
    pub fn to_video(&self) -> Result<Video, ItemError> {
        let snippet = self.snippet.as_ref().ok_or_else(|| ItemError::MissingSnippet {
            id: self.video_id().to_string(),
        })?;

        let publish_time = parse_publish_time(&snippet.published_at).map_err(|source| {
            ItemError::InvalidPublishTime {
                id: self.video_id().to_string(),
                value: snippet.published_at.clone(),
                source,
            }
        })?;

        Ok(Video {
            title: snippet.title.clone(),
            description: snippet.description.clone(),
            publish_time,
            thumbnail_url: snippet
                .thumbnails
                .default
                .as_ref()
                .map(|t| t.url.clone())
                .unwrap_or_default(),
        })
    }
}

/// Parses an RFC 3339 timestamp and normalizes it to UTC
pub fn parse_publish_time(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|t| t.with_timezone(&Utc))
}
