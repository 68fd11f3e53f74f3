use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    /// Whether `yt-dlp --version` currently succeeds
    pub ytdlp: bool,
}

/// GET /health
///
/// Always 200 while the process is up; a missing yt-dlp is reported in the
/// body rather than as a failure.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        ytdlp: state.downloader.is_installed().await,
    })
}
