//! Mock downloader for handler tests
//!
//! Records every call and replays canned results, so the HTTP layer can be
//! tested without spawning anything.

#![allow(dead_code, clippy::unwrap_used)]

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream;
use std::io;
use std::sync::{Arc, Mutex};
use tubecore::download::{FormatDescriptor, VideoMetadata};
use tubecore::{DownloadError, DownloadOptions, DownloadResult, MediaDownloader, MediaStream};

/// What the mock answers to `download_video`.
#[derive(Clone)]
pub enum MockDownload {
    /// Stream these chunks and report `size`
    Body { chunks: Vec<&'static [u8]>, size: u64, format_id: &'static str },
    /// Stream `chunks`, then fail
    Truncated { chunks: Vec<&'static [u8]> },
    /// Fail before any byte, with this stderr
    Fail { stderr: &'static str },
}

pub struct MockDownloader {
    download: MockDownload,
    installed: bool,
    formats: Vec<FormatDescriptor>,
    metadata_json: Option<&'static str>,
    calls: Arc<Mutex<Vec<DownloadOptions>>>,
}

impl MockDownloader {
    pub fn new(download: MockDownload) -> Self {
        Self {
            download,
            installed: true,
            formats: vec![FormatDescriptor::audio_only()],
            metadata_json: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn serving(body: &'static [u8], size: u64) -> Self {
        Self::new(MockDownload::Body {
            chunks: vec![body],
            size,
            format_id: "22",
        })
    }

    pub fn failing(stderr: &'static str) -> Self {
        Self::new(MockDownload::Fail { stderr })
    }

    pub fn with_installed(mut self, installed: bool) -> Self {
        self.installed = installed;
        self
    }

    pub fn with_formats(mut self, formats: Vec<FormatDescriptor>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_metadata(mut self, json: &'static str) -> Self {
        self.metadata_json = Some(json);
        self
    }

    /// Handle on the recorded `download_video` calls.
    pub fn calls(&self) -> Arc<Mutex<Vec<DownloadOptions>>> {
        Arc::clone(&self.calls)
    }
}

fn chunk_stream(chunks: Vec<&'static [u8]>, fail_at_end: bool) -> MediaStream {
    let mut items: Vec<io::Result<Bytes>> = chunks.into_iter().map(|c| Ok(Bytes::from_static(c))).collect();
    if fail_at_end {
        items.push(Err(io::Error::other("yt-dlp exited with code 1")));
    }
    MediaStream::new(stream::iter(items))
}

#[async_trait]
impl MediaDownloader for MockDownloader {
    async fn download_video(&self, options: &DownloadOptions) -> Result<DownloadResult, DownloadError> {
        self.calls.lock().unwrap().push(options.clone());

        match &self.download {
            MockDownload::Body { chunks, size, format_id } => Ok(DownloadResult {
                stream: chunk_stream(chunks.clone(), false),
                size: *size,
                format_id: format_id.to_string(),
            }),
            MockDownload::Truncated { chunks } => Ok(DownloadResult {
                stream: chunk_stream(chunks.clone(), true),
                size: 0,
                format_id: "18".to_string(),
            }),
            MockDownload::Fail { stderr } => Err(DownloadError::ExternalTool {
                code: Some(1),
                stderr: stderr.to_string(),
            }),
        }
    }

    async fn resolve_formats(&self, _video_id: &str) -> Result<Vec<FormatDescriptor>, DownloadError> {
        if let MockDownload::Fail { stderr } = &self.download {
            return Err(DownloadError::ExternalTool {
                code: Some(1),
                stderr: stderr.to_string(),
            });
        }
        Ok(self.formats.clone())
    }

    async fn fetch_metadata(&self, _video_id: &str) -> Result<VideoMetadata, DownloadError> {
        match (&self.download, self.metadata_json) {
            (MockDownload::Fail { stderr }, _) => Err(DownloadError::ExternalTool {
                code: Some(1),
                stderr: stderr.to_string(),
            }),
            (_, Some(json)) => VideoMetadata::from_json(json.as_bytes()),
            (_, None) => Err(DownloadError::Parse("no metadata configured".into())),
        }
    }

    async fn is_installed(&self) -> bool {
        self.installed
    }
}
