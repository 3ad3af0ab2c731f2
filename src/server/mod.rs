//! HTTP query service
//!
//! Read-only endpoints over the video store. Handlers never see the
//! ingestion loop; the store is the only thing they share.

mod handlers;

pub use handlers::{health_check, search_videos, VideoSearchParams};

use crate::storage::VideoStore;
use axum::{routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn VideoStore>,
}

/// Builds the service router
pub fn router(store: Arc<dyn VideoStore>) -> Router {
    Router::new()
        .route("/videos", get(search_videos))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { store })
}

/// Serves the router on `listener` until `shutdown` resolves
pub async fn serve<F>(
    listener: TcpListener,
    store: Arc<dyn VideoStore>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("Query service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await
}
