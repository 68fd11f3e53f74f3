//! Download management: yt-dlp invocation, format selection, streaming

pub mod error;
pub mod formats;
pub mod metadata;
pub mod source;
pub mod stream;
pub mod ytdlp;
pub mod ytdlp_errors;

// Re-exports for convenience
pub use error::DownloadError;
pub use formats::{FormatDescriptor, MediaKind, QualityCeiling};
pub use metadata::{watch_url, VideoMetadata, VideoSummary};
pub use source::{DownloadOptions, DownloadResult, MediaDownloader};
pub use stream::MediaStream;
pub use ytdlp::YtDlp;
