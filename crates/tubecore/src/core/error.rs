use thiserror::Error;

use crate::download::DownloadError;

/// Centralized error types for the application
///
/// Everything outside the download path (configuration, logging setup, request
/// validation) ends up here. Download failures keep their own categorized enum
/// and are wrapped via `From`.
///
/// # Example
///
/// ```no_run
/// use tubecore::AppError;
///
/// fn handle_error(err: AppError) {
///     eprintln!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation errors (missing fields, malformed quality, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Download/yt-dlp errors
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anyhow errors (for general error handling)
    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::Config(Box::new(err))
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
