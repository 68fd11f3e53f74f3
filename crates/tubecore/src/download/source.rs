//! The seam between the HTTP handler and whatever produces media bytes.
//!
//! [`crate::download::YtDlp`] is the only production implementation; the
//! handler tests plug in a mock.

use async_trait::async_trait;

use crate::download::error::DownloadError;
use crate::download::formats::{FormatDescriptor, MediaKind, QualityCeiling};
use crate::download::metadata::VideoMetadata;
use crate::download::stream::MediaStream;

/// Validated input of a single download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub video_id: String,
    pub quality: QualityCeiling,
    pub kind: MediaKind,
    /// Already sanitized title, used for logging only
    pub title: String,
}

/// A started download: the byte stream plus the size yt-dlp announced.
#[derive(Debug)]
pub struct DownloadResult {
    pub stream: MediaStream,
    /// Declared byte length; 0 means unknown
    pub size: u64,
    pub format_id: String,
}

#[async_trait]
pub trait MediaDownloader: Send + Sync {
    /// Resolve the format via metadata and start streaming it.
    ///
    /// Returns as soon as the streaming process is running. Failures of that
    /// process after this point only show up as an error item in the stream.
    async fn download_video(&self, options: &DownloadOptions) -> Result<DownloadResult, DownloadError>;

    /// Advisory format listing (muxed formats plus a synthetic audio entry).
    async fn resolve_formats(&self, video_id: &str) -> Result<Vec<FormatDescriptor>, DownloadError>;

    /// Full metadata dump.
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, DownloadError>;

    /// `true` iff the tool runs and exits 0. Never fails.
    async fn is_installed(&self) -> bool;
}
