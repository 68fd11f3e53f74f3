//! Request handlers.

pub mod download;
pub mod formats;
pub mod health;

pub use download::download_handler;
pub use formats::{formats_handler, info_handler};
pub use health::health_handler;

use tubecore::AppError;

/// YouTube ids are `[A-Za-z0-9_-]`. Anything else never reaches yt-dlp.
pub fn validate_video_id(video_id: &str) -> Result<(), AppError> {
    let valid = !video_id.is_empty()
        && video_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid videoId: {:?}", video_id)))
    }
}
