use std::time::Duration;
use thiserror::Error;

use crate::download::formats::MediaKind;

/// Structured error type for download operations.
///
/// One variant per way the yt-dlp round trip can go wrong, so the HTTP layer
/// and the logs can tell a missing binary from a broken video.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The binary could not be launched (not installed, bad path, permissions)
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// yt-dlp ran but exited non-zero; carries what it printed on stderr
    #[error("yt-dlp failed with code {}: {}", display_code(.code), .stderr.trim())]
    ExternalTool { code: Option<i32>, stderr: String },

    /// Output that should have been JSON (or a format table) was not
    #[error("Failed to parse yt-dlp output: {0}")]
    Parse(String),

    /// Nothing in the format list satisfies the request
    #[error("Could not find a suitable {kind} format to download{}", ceiling_suffix(.ceiling))]
    NoSuitableFormat { kind: MediaKind, ceiling: Option<u32> },

    /// A captured run exceeded its deadline and was killed
    #[error("{what} timed out after {timeout:?}")]
    Timeout { what: String, timeout: Duration },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

fn ceiling_suffix(ceiling: &Option<u32>) -> String {
    ceiling.map(|c| format!(" at or below {}p", c)).unwrap_or_default()
}

impl DownloadError {
    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::Spawn { .. } => "spawn",
            DownloadError::ExternalTool { .. } => "external_tool",
            DownloadError::Parse(_) => "parse",
            DownloadError::NoSuitableFormat { .. } => "no_suitable_format",
            DownloadError::Timeout { .. } => "timeout",
        }
    }
}

impl From<serde_json::Error> for DownloadError {
    fn from(err: serde_json::Error) -> Self {
        DownloadError::Parse(err.to_string())
    }
}
