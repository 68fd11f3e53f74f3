//! Router assembly and the serve loop.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH};
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tubecore::MediaDownloader;

use crate::handlers::{download_handler, formats_handler, health_handler, info_handler};

/// Shared handler state. Cloned per request, so everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub downloader: Arc<dyn MediaDownloader>,
    /// Quality label used when a video request omits one
    pub default_quality: String,
}

impl AppState {
    pub fn new(downloader: Arc<dyn MediaDownloader>, default_quality: impl Into<String>) -> Self {
        Self {
            downloader,
            default_quality: default_quality.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([CONTENT_DISPOSITION, CONTENT_LENGTH]);

    Router::new()
        .route("/api/download", post(download_handler))
        .route("/api/formats/{video_id}", get(formats_handler))
        .route("/api/info/{video_id}", get(info_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
///
/// After the signal no new connections are accepted; open responses run to
/// completion.
pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Starting web server on http://{}", listener.local_addr()?);
    tracing::info!("  POST /api/download              - Stream a download");
    tracing::info!("  GET  /api/formats/{{video_id}}   - List formats");
    tracing::info!("  GET  /api/info/{{video_id}}      - Metadata summary");
    tracing::info!("  GET  /health                    - Health check");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
