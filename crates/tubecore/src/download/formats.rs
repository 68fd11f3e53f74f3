//! Format model and selection.
//!
//! Two sources of format information exist: the pipe-delimited listing
//! printed by `--list-formats --print ...` (advisory, shown to clients) and the
//! `formats` array of `--dump-json` (authoritative, used to pick what gets
//! streamed).

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

use crate::core::error::AppError;
use crate::download::metadata::MetadataFormat;

/// Codec value yt-dlp uses for "stream not present"
pub const NO_CODEC: &str = "none";

/// Field delimiter of the `--print` template used for format listings
pub const LISTING_DELIMITER: char = '|';

/// `--print` template matching [`parse_format_listing`]
pub const LISTING_TEMPLATE: &str = "%(format_id)s|%(ext)s|%(resolution)s|%(acodec)s|%(vcodec)s|%(format_note)s";

/// What the client asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// File extension of the attachment
    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Audio => "mp3",
            MediaKind::Video => "mp4",
        }
    }

    /// `Content-Type` of the streamed body
    pub fn content_type(self) -> &'static str {
        match self {
            MediaKind::Audio => "audio/mpeg",
            MediaKind::Video => "video/mp4",
        }
    }
}

/// Highest acceptable vertical resolution, parsed from labels like `720p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QualityCeiling(u32);

impl QualityCeiling {
    pub fn new(height: u32) -> Option<Self> {
        (height > 0).then_some(Self(height))
    }

    pub fn height(self) -> u32 {
        self.0
    }
}

impl Default for QualityCeiling {
    fn default() -> Self {
        Self(720)
    }
}

impl fmt::Display for QualityCeiling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.0)
    }
}

impl FromStr for QualityCeiling {
    type Err = AppError;

    /// Accepts `720p`, `720P` and `720`. Anything else is rejected instead of
    /// silently falling back to a default.
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let trimmed = label.trim();
        let digits = trimmed
            .strip_suffix('p')
            .or_else(|| trimmed.strip_suffix('P'))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::Validation(format!("Invalid quality: {:?}", label)));
        }

        digits
            .parse::<u32>()
            .ok()
            .and_then(QualityCeiling::new)
            .ok_or_else(|| AppError::Validation(format!("Invalid quality: {:?}", label)))
    }
}

/// One row of the format listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatDescriptor {
    pub format_id: String,
    pub extension: String,
    pub resolution: String,
    pub audio_codec: String,
    pub video_codec: String,
    pub note: String,
}

impl FormatDescriptor {
    pub fn has_audio(&self) -> bool {
        codec_present(Some(&self.audio_codec))
    }

    pub fn has_video(&self) -> bool {
        codec_present(Some(&self.video_codec))
    }

    /// Placeholder for "best audio, extracted to mp3"; always last in a listing.
    pub fn audio_only() -> Self {
        Self {
            format_id: "bestaudio".to_string(),
            extension: "mp3".to_string(),
            resolution: "audio only".to_string(),
            audio_codec: "mp3".to_string(),
            video_codec: NO_CODEC.to_string(),
            note: "best audio".to_string(),
        }
    }

    fn from_line(line: &str) -> Option<Self> {
        if !line.contains(LISTING_DELIMITER) {
            return None;
        }
        let mut fields = line.split(LISTING_DELIMITER).map(str::trim);
        let mut next = || fields.next().unwrap_or_default().to_string();

        Some(Self {
            format_id: next(),
            extension: next(),
            resolution: next(),
            audio_codec: next(),
            video_codec: next(),
            note: next(),
        })
    }
}

/// `true` when yt-dlp reported a codec and it is not `none`.
pub fn codec_present(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if !c.is_empty() && c != NO_CODEC)
}

/// Parse the pipe-delimited listing into candidates.
///
/// Lines without the delimiter are skipped, only muxed (audio+video) rows are
/// kept, and the synthetic audio-only entry is appended. Order follows yt-dlp.
pub fn parse_format_listing(output: &str) -> Vec<FormatDescriptor> {
    let mut formats: Vec<FormatDescriptor> = output
        .lines()
        .filter_map(FormatDescriptor::from_line)
        .filter(|f| f.has_audio() && f.has_video())
        .collect();

    formats.push(FormatDescriptor::audio_only());
    formats
}

/// First audio-only entry (audio codec present, video codec exactly `none`).
pub fn select_audio_format(formats: &[MetadataFormat]) -> Option<&MetadataFormat> {
    formats
        .iter()
        .find(|f| codec_present(f.acodec.as_deref()) && f.vcodec.as_deref() == Some(NO_CODEC))
}

/// Best muxed mp4 at or below the ceiling.
///
/// Entries without a height never qualify. On equal heights the first one
/// encountered wins.
pub fn select_video_format(formats: &[MetadataFormat], ceiling: QualityCeiling) -> Option<&MetadataFormat> {
    let mut best: Option<(&MetadataFormat, u32)> = None;

    for format in formats {
        let Some(height) = format.height else {
            continue;
        };
        let eligible = codec_present(format.vcodec.as_deref())
            && codec_present(format.acodec.as_deref())
            && format.ext.as_deref() == Some("mp4")
            && height <= ceiling.height();

        if eligible && best.map_or(true, |(_, h)| height > h) {
            best = Some((format, height));
        }
    }

    best.map(|(format, _)| format)
}

/// Dispatch on the requested kind.
pub fn select_format(formats: &[MetadataFormat], kind: MediaKind, ceiling: QualityCeiling) -> Option<&MetadataFormat> {
    match kind {
        MediaKind::Audio => select_audio_format(formats),
        MediaKind::Video => select_video_format(formats, ceiling),
    }
}
