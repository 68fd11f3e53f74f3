//! Read-only lookups: format listing and metadata summary.

use axum::extract::{Path, State};
use axum::Json;
use tubecore::download::{FormatDescriptor, VideoSummary};

use crate::error::ApiError;
use crate::handlers::validate_video_id;
use crate::server::AppState;

/// GET /api/formats/{video_id}
pub async fn formats_handler(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<Vec<FormatDescriptor>>, ApiError> {
    validate_video_id(&video_id)?;

    let formats = state
        .downloader
        .resolve_formats(&video_id)
        .await
        .map_err(|e| ApiError::upstream("Failed to list formats", e))?;
    tracing::info!(%video_id, count = formats.len(), "listed formats");

    Ok(Json(formats))
}

/// GET /api/info/{video_id}
pub async fn info_handler(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<VideoSummary>, ApiError> {
    validate_video_id(&video_id)?;

    let metadata = state
        .downloader
        .fetch_metadata(&video_id)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch video info", e))?;

    Ok(Json(metadata.summary()))
}
