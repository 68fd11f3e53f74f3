//! Errors at the HTTP boundary.
//!
//! Two response shapes exist:
//! - 400 `{"error": ...}` for requests we refuse before touching yt-dlp
//! - 500 `{"error", "details", "suggestion"}` for everything that failed after

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::fmt::Display;
use tubecore::{AppError, DownloadError};

/// Static remediation hint attached to every 500
pub const INSTALL_SUGGESTION: &str = "Make sure yt-dlp is installed: pip install yt-dlp";

#[derive(Debug)]
pub enum ApiError {
    /// Bad or incomplete request, nothing was spawned
    Validation(String),
    /// yt-dlp (or something around it) failed
    Upstream { error: &'static str, details: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn upstream(error: &'static str, details: impl Display) -> Self {
        ApiError::Upstream {
            error,
            details: details.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    error: &'a str,
}

#[derive(Serialize)]
struct UpstreamBody<'a> {
    error: &'a str,
    details: &'a str,
    suggestion: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Validation(message) => {
                tracing::warn!(%message, "rejected request");
                (status, Json(ValidationBody { error: message })).into_response()
            }
            ApiError::Upstream { error, details } => {
                tracing::error!(%error, %details, "request failed");
                let body = UpstreamBody {
                    error,
                    details,
                    suggestion: INSTALL_SUGGESTION,
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<DownloadError> for ApiError {
    fn from(err: DownloadError) -> Self {
        ApiError::upstream("Download failed", err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(message) => ApiError::Validation(message),
            AppError::Download(e) => e.into(),
            other => ApiError::upstream("Download failed", other),
        }
    }
}
