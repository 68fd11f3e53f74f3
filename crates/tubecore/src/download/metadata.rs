//! The part of yt-dlp's `--dump-json` output this service reads.
//!
//! Unknown fields are ignored; everything except `format_id` is optional since
//! extractors fill in wildly different subsets.

use serde::{Deserialize, Deserializer, Serialize};

use crate::download::error::DownloadError;

/// Canonical watch URL for a YouTube video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub formats: Vec<MetadataFormat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetadataFormat {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub filesize: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub filesize_approx: Option<u64>,
    #[serde(default)]
    pub format_note: Option<String>,
}

impl MetadataFormat {
    /// Exact size, else the estimate, else 0 (unknown).
    pub fn declared_size(&self) -> u64 {
        self.filesize.or(self.filesize_approx).unwrap_or(0)
    }
}

// yt-dlp emits sizes as integers, but some extractors compute
// `filesize_approx` as a float.
fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite() && *v > 0.0).map(|v| v as u64))
}

impl VideoMetadata {
    /// Parse the stdout of `--dump-json`.
    pub fn from_json(stdout: &[u8]) -> Result<Self, DownloadError> {
        Ok(serde_json::from_slice(stdout)?)
    }

    pub fn summary(&self) -> VideoSummary {
        VideoSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            duration: self.duration.map(|d| d.round() as u64),
            thumbnail: self.thumbnail.clone(),
            uploader: self.uploader.clone(),
            format_count: self.formats.len(),
        }
    }
}

/// Compact view returned by the info endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: Option<String>,
    pub title: Option<String>,
    pub duration: Option<u64>,
    pub thumbnail: Option<String>,
    pub uploader: Option<String>,
    pub format_count: usize,
}
