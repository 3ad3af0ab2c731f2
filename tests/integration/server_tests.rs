//! Integration tests for the query service
//!
//! Router tests drive the axum service directly with `oneshot`; the last test
//! runs the whole service (ingestion plus HTTP) against a mocked search API.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceExt;
use video_poller::config::Config;
use video_poller::ingest::Credential;
use video_poller::server::router;
use video_poller::storage::{
    SqliteVideoStore, StorageError, StorageResult, Video, VideoQuery, VideoStore,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn video(title: &str, description: &str, publish_time: &str) -> Video {
    Video {
        title: title.to_string(),
        description: description.to_string(),
        publish_time: DateTime::parse_from_rfc3339(publish_time)
            .unwrap()
            .with_timezone(&Utc),
        thumbnail_url: format!("https://i.ytimg.com/vi/{}/default.jpg", title.len()),
    }
}

fn seeded_store() -> Arc<SqliteVideoStore> {
    let store = SqliteVideoStore::new_in_memory().unwrap();
    for v in [
        video("Football final", "Cup match at the stadium", "2023-05-01T10:00:00Z"),
        video("FOOTBALL weekly", "Pundits at the bar", "2023-05-03T08:00:00Z"),
        video("Pub quiz", "Football trivia at the bar", "2023-05-02T18:00:00Z"),
        video("foosball tricks", "Table football at the bar", "2023-05-04T09:00:00Z"),
    ] {
        store.insert(&v).unwrap();
    }
    Arc::new(store)
}

async fn get(store: Arc<dyn VideoStore>, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = router(store)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec();

    (status, content_type, body)
}

fn titles(body: &[u8]) -> Vec<String> {
    let videos: Vec<Video> = serde_json::from_slice(body).unwrap();
    videos.into_iter().map(|v| v.title).collect()
}

/// Fails every call, standing in for a broken database
struct BrokenStore;

impl VideoStore for BrokenStore {
    fn insert(&self, _video: &Video) -> StorageResult<i64> {
        Err(StorageError::LockPoisoned)
    }

    fn query(&self, _query: &VideoQuery) -> StorageResult<Vec<Video>> {
        Err(StorageError::LockPoisoned)
    }

    fn count(&self) -> StorageResult<u64> {
        Err(StorageError::LockPoisoned)
    }
}

#[tokio::test]
async fn test_missing_parameters_is_bad_request() {
    for uri in ["/videos", "/videos?title=", "/videos?title=&description=", "/videos?other=x"] {
        let (status, _, body) = get(seeded_store(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body.is_empty(), "{} should have an empty body", uri);
    }
}

#[tokio::test]
async fn test_undecodable_query_is_bare_bad_request() {
    for uri in ["/videos?title=a&title=b", "/videos?description=x&description=y"] {
        let (status, _, body) = get(seeded_store(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(body.is_empty(), "{} leaked {:?}", uri, String::from_utf8_lossy(&body));
    }
}

#[tokio::test]
async fn test_title_search_is_case_insensitive_newest_first() {
    let (status, content_type, body) = get(seeded_store(), "/videos?title=football").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(titles(&body), vec!["FOOTBALL weekly", "Football final"]);
}

#[tokio::test]
async fn test_accented_search_ignores_case() {
    let store = seeded_store();
    store
        .insert(&video("FÚTBOL EN VIVO", "ÉQUIPE locale", "2023-05-05T12:00:00Z"))
        .unwrap();

    let (status, _, body) = get(store.clone(), "/videos?title=f%C3%BAtbol").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["FÚTBOL EN VIVO"]);

    let (_, _, body) = get(store, "/videos?description=%C3%A9quipe").await;
    assert_eq!(titles(&body), vec!["FÚTBOL EN VIVO"]);
}

#[tokio::test]
async fn test_description_only_search() {
    let (status, _, body) = get(seeded_store(), "/videos?description=Bar").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        titles(&body),
        vec!["foosball tricks", "FOOTBALL weekly", "Pub quiz"]
    );
}

#[tokio::test]
async fn test_title_and_description_are_anded() {
    let (status, _, body) =
        get(seeded_store(), "/videos?title=foot&description=bar").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["FOOTBALL weekly"]);
}

#[tokio::test]
async fn test_no_match_is_empty_array() {
    let (status, _, body) = get(seeded_store(), "/videos?title=cricket").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
}

#[tokio::test]
async fn test_response_shape_and_timestamp_round_trip() {
    let store = SqliteVideoStore::new_in_memory().unwrap();
    let original = video(
        "Late winner",
        "Stoppage time",
        "2023-07-08T11:10:11.123456+02:00",
    );
    store.insert(&original).unwrap();

    let (_, _, body) = get(Arc::new(store), "/videos?title=winner").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(
        json,
        json!([{
            "title": "Late winner",
            "description": "Stoppage time",
            "publishTime": "2023-07-08T09:10:11.123456Z",
            "thumbnail": original.thumbnail_url,
        }])
    );

    let served = DateTime::parse_from_rfc3339(json[0]["publishTime"].as_str().unwrap()).unwrap();
    assert_eq!(served, original.publish_time);
}

#[tokio::test]
async fn test_store_failure_is_internal_error_without_detail() {
    let (status, _, body) = get(Arc::new(BrokenStore), "/videos?title=x").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_health_check() {
    let (status, _, body) = get(seeded_store(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_service_ingests_and_serves_until_shutdown() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": { "videoId": "abc" },
                "snippet": {
                    "title": "Derby day",
                    "description": "Matchday vlog",
                    "publishedAt": "2023-09-09T15:00:00Z",
                    "thumbnails": { "default": { "url": "https://i.ytimg.com/vi/abc/default.jpg" } }
                }
            }]
        })))
        .mount(&api)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.search.base_url = api.uri();
    config.search.api_keys = vec![Credential::new("k1")];
    config.ingest.poll_interval = 60_000;
    config.database.path = dir.path().join("videos.db").display().to_string();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let service = tokio::spawn(video_poller::service::run_on(listener, config, async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    let url = format!("http://{}/videos?title=derby", addr);
    let deadline = Instant::now() + Duration::from_secs(10);
    let videos: Vec<Video> = loop {
        let response = client.get(&url).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let videos: Vec<Video> = response.json().await.unwrap();
        if !videos.is_empty() {
            break videos;
        }
        assert!(Instant::now() < deadline, "video never became searchable");
        tokio::time::sleep(Duration::from_millis(20)).await;
    };

    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].thumbnail_url, "https://i.ytimg.com/vi/abc/default.jpg");

    drop(client);
    stop_tx.send(()).unwrap();
    let stats = tokio::time::timeout(Duration::from_secs(5), service)
        .await
        .expect("service stops after shutdown")
        .unwrap()
        .unwrap();

    assert_eq!(stats.inserted, 1);
    assert_eq!(stats.cycles, 1);
}
