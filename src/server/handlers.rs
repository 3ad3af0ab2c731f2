use crate::server::AppState;
use crate::storage::VideoQuery;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

/// Query string of `GET /videos`
#[derive(Debug, Default, Deserialize)]
pub struct VideoSearchParams {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// `GET /videos?title=..&description=..`
///
/// 400 with an empty body when neither parameter is given or the query string
/// does not decode, 500 with an empty body when the store fails, otherwise the
/// matching videos newest first.
pub async fn search_videos(
    State(state): State<AppState>,
    params: Result<Query<VideoSearchParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!("Rejected video search query: {}", rejection);
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let Some(query) = VideoQuery::new(params.title, params.description) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    match state.store.query(&query) {
        Ok(videos) => {
            tracing::debug!("Video search matched {} rows", videos.len());
            Json(videos).into_response()
        }
        Err(e) => {
            tracing::error!("Video search failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
