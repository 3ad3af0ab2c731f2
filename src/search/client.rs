//! HTTP client for the search endpoint
//!
//! This module handles:
//! - Building the HTTP client used for API calls
//! - Issuing one `search.list` request per call
//! - Classifying failures into quota exhaustion or transient faults

use crate::config::SearchConfig;
use crate::ingest::Credential;
use crate::search::types::{ApiErrorResponse, SearchListResponse};
use crate::search::{SearchError, SearchPage};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Error reasons the API uses for an exhausted quota or rate limit
const QUOTA_REASONS: &[&str] = &[
    "quotaExceeded",
    "dailyLimitExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
];

/// Builds an HTTP client with the configured request timeout
pub fn build_http_client(config: &SearchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!("video-poller/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A search client bound to one credential
///
/// Rotating keys means building a new client; page tokens stay with the caller.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Client,
    endpoint: Url,
    credential: Credential,
    max_results: u32,
    order: Option<String>,
}

impl SearchClient {
    /// Creates a client for `credential`
    ///
    /// Construction failures are reported as [`SearchError::Transient`] so the
    /// caller can back off and try again.
    pub fn new(config: &SearchConfig, credential: Credential) -> Result<Self, SearchError> {
        let endpoint = Url::parse(&format!("{}/search", config.base_url.trim_end_matches('/')))
            .map_err(|e| SearchError::Transient(format!("Invalid search endpoint: {}", e)))?;

        let http = build_http_client(config)
            .map_err(|e| SearchError::Transient(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            credential,
            max_results: config.max_results,
            order: config.order.clone(),
        })
    }

    /// The credential this client authenticates with
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Fetches one page of results for `query`
    ///
    /// # Arguments
    ///
    /// * `query` - The search string
    /// * `page_token` - Continuation token from the previous page, `None` for the first page
    pub async fn search(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<SearchPage, SearchError> {
        let max_results = self.max_results.to_string();
        let mut request = self.http.get(self.endpoint.clone()).query(&[
            ("part", "id,snippet"),
            ("type", "video"),
            ("q", query),
            ("maxResults", max_results.as_str()),
            ("key", self.credential.as_str()),
        ]);

        if let Some(order) = &self.order {
            request = request.query(&[("order", order.as_str())]);
        }

        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await.map_err(classify_request_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let body: SearchListResponse = response.json().await.map_err(|e| {
            SearchError::Transient(format!("Undecodable search response: {}", e.without_url()))
        })?;

        Ok(SearchPage::from(body))
    }
}

/// Maps a non-success API response to a failure class
///
/// | Condition | Class |
/// |-----------|-------|
/// | HTTP 429 | QuotaExceeded |
/// | HTTP 403 with a quota/rate-limit reason | QuotaExceeded |
/// | Anything else | Transient |
pub fn classify_failure(status: StatusCode, body: &str) -> SearchError {
    let parsed: Option<ApiErrorResponse> = serde_json::from_str(body).ok();
    let reason = parsed
        .as_ref()
        .and_then(|r| r.error.errors.first())
        .map(|d| d.reason.clone())
        .unwrap_or_default();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return SearchError::QuotaExceeded {
            status: status.as_u16(),
            reason: if reason.is_empty() {
                "tooManyRequests".to_string()
            } else {
                reason
            },
        };
    }

    if status == StatusCode::FORBIDDEN {
        let quota_reason = parsed.as_ref().and_then(|r| {
            r.error
                .errors
                .iter()
                .find(|d| QUOTA_REASONS.contains(&d.reason.as_str()))
        });
        if let Some(detail) = quota_reason {
            return SearchError::QuotaExceeded {
                status: status.as_u16(),
                reason: detail.reason.clone(),
            };
        }
    }

    let message = parsed
        .map(|r| r.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());

    SearchError::Transient(format!("HTTP {}: {}", status.as_u16(), message))
}

/// Classifies a request that never produced a response
///
/// The URL is stripped from the message because its query string carries the key.
fn classify_request_error(e: reqwest::Error) -> SearchError {
    if e.is_timeout() {
        SearchError::Transient("Request timeout".to_string())
    } else if e.is_connect() {
        SearchError::Transient(format!("Connection failed: {}", e.without_url()))
    } else {
        SearchError::Transient(e.without_url().to_string())
    }
}
