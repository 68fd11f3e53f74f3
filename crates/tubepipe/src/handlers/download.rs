//! `POST /api/download`: JSON in, media bytes out.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH,
    CONTENT_TYPE,
};
use axum::http::{HeaderValue, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use tubecore::{sanitize_filename, AppError, DownloadOptions, DownloadResult, MediaKind, QualityCeiling};

use crate::error::ApiError;
use crate::handlers::validate_video_id;
use crate::server::AppState;

pub const MISSING_PARAMS: &str = "Missing required parameters";

/// Request body as sent by the browser. Everything is optional here so that
/// missing fields produce our own 400 instead of a deserializer rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadBody {
    pub video_id: Option<String>,
    /// Kept loose: a non-string title downloads as `download.<ext>` instead of failing the request
    pub title: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub quality: Option<String>,
    /// Accepted for compatibility; the watch URL is always rebuilt from `videoId`
    pub url: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDownload {
    pub options: DownloadOptions,
    /// Attachment name including extension
    pub filename: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Title to sanitize, or `None` to fall back to `video_<id>`.
///
/// Missing, null, empty, `false` and `0` count as absent. Any other
/// non-string value sanitizes to the generic fallback name.
fn title_source(title: Option<Value>) -> Option<String> {
    match title? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        _ => Some(String::new()),
    }
}

/// Validate the body and derive the download options and filename.
///
/// Audio requests ignore quality entirely; for video a malformed label is a
/// validation error rather than a silent fallback.
pub fn prepare_download(body: DownloadBody, default_quality: &str) -> Result<PreparedDownload, AppError> {
    let (Some(video_id), Some(kind)) = (non_blank(body.video_id), non_blank(body.kind)) else {
        return Err(AppError::Validation(MISSING_PARAMS.to_string()));
    };
    validate_video_id(&video_id)?;

    let kind: MediaKind = kind
        .parse()
        .map_err(|_| AppError::Validation(format!("Invalid type {:?}, expected \"audio\" or \"video\"", kind)))?;

    let quality_label = non_blank(body.quality).unwrap_or_else(|| default_quality.to_string());
    let quality = match kind {
        MediaKind::Video => quality_label.parse::<QualityCeiling>()?,
        MediaKind::Audio => quality_label.parse::<QualityCeiling>().unwrap_or_default(),
    };

    let title = title_source(body.title).unwrap_or_else(|| format!("video_{}", video_id));
    let safe_title = sanitize_filename(&title);
    let filename = format!("{}.{}", safe_title, kind.extension());

    Ok(PreparedDownload {
        options: DownloadOptions {
            video_id,
            quality,
            kind,
            title: safe_title,
        },
        filename,
    })
}

/// Build the streaming response for a started download.
pub fn stream_response(kind: MediaKind, filename: &str, result: DownloadResult) -> Result<Response, ApiError> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
        .map_err(|e| ApiError::upstream("Download failed", e))?;

    let mut response = Response::new(Body::from_stream(result.stream));
    *response.status_mut() = StatusCode::OK;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(kind.content_type()));
    headers.insert(CONTENT_DISPOSITION, disposition);
    if result.size > 0 {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(result.size));
    }
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Content-Disposition, Content-Length"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    Ok(response)
}

/// POST /api/download
///
/// Single attempt: any downloader failure becomes a 500 with the raw error
/// text. Once the response is returned, a failing yt-dlp can only truncate
/// the body.
pub async fn download_handler(
    State(state): State<AppState>,
    payload: Result<Json<DownloadBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    if let Some(url) = body.url.as_deref() {
        tracing::debug!(url, "client url ignored, watch url is derived from videoId");
    }

    let prepared = prepare_download(body, &state.default_quality)?;
    let options = &prepared.options;
    tracing::info!(
        video_id = %options.video_id,
        kind = %options.kind,
        quality = %options.quality,
        filename = %prepared.filename,
        "starting download"
    );

    let result = state.downloader.download_video(options).await?;
    tracing::info!(
        video_id = %options.video_id,
        format_id = %result.format_id,
        size = result.size,
        "download stream created"
    );

    stream_response(options.kind, &prepared.filename, result)
}
