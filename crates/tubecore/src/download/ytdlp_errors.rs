//! Classification of yt-dlp stderr output
//!
//! yt-dlp only reports failures as free text, so the logs get a coarse
//! category next to the raw message. The category never changes the HTTP
//! response, which always carries the raw error text.

use strum::AsRefStr;

/// Types of yt-dlp errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum YtDlpErrorType {
    /// Private, removed, region-locked or nonexistent video
    VideoUnavailable,
    /// YouTube demands sign-in / detected automated access
    BotDetection,
    /// Timeouts, DNS, connection resets
    NetworkError,
    /// Anything else
    Unknown,
}

/// Analyze yt-dlp stderr and determine the error type
pub fn analyze_ytdlp_error(stderr: &str) -> YtDlpErrorType {
    let stderr_lower = stderr.to_lowercase();

    if stderr_lower.contains("private video")
        || stderr_lower.contains("video unavailable")
        || stderr_lower.contains("this video is not available")
        || stderr_lower.contains("video has been removed")
        || stderr_lower.contains("this video does not exist")
        || stderr_lower.contains("incomplete youtube id")
    {
        return YtDlpErrorType::VideoUnavailable;
    }

    if stderr_lower.contains("sign in to confirm you're not a bot")
        || stderr_lower.contains("please sign in")
        || stderr_lower.contains("http error 403")
        || stderr_lower.contains("http error 429")
        || stderr_lower.contains("signature extraction failed")
    {
        return YtDlpErrorType::BotDetection;
    }

    if stderr_lower.contains("timed out")
        || stderr_lower.contains("connection")
        || stderr_lower.contains("network is unreachable")
        || stderr_lower.contains("name or service not known")
        || stderr_lower.contains("temporary failure in name resolution")
    {
        return YtDlpErrorType::NetworkError;
    }

    YtDlpErrorType::Unknown
}

/// Last non-empty `ERROR:` line, or the last non-empty line, for compact logs.
pub fn error_summary(stderr: &str) -> &str {
    let mut lines = stderr.lines().map(str::trim).filter(|l| !l.is_empty());
    let last = lines.clone().next_back().unwrap_or_default();
    lines.rfind(|l| l.starts_with("ERROR:")).unwrap_or(last)
}
