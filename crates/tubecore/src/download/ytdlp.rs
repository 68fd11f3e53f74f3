//! yt-dlp backed [`MediaDownloader`].
//!
//! Every invocation builds a fresh `tokio::process::Command` from the injected
//! [`YtDlpConfig`]; no state is shared between calls.

use async_trait::async_trait;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::Instrument;

use crate::core::config::YtDlpConfig;
use crate::core::process::run_with_timeout;
use crate::download::error::DownloadError;
use crate::download::formats::{parse_format_listing, select_format, FormatDescriptor, MediaKind, LISTING_TEMPLATE};
use crate::download::metadata::{watch_url, VideoMetadata};
use crate::download::source::{DownloadOptions, DownloadResult, MediaDownloader};
use crate::download::stream::MediaStream;
use crate::download::ytdlp_errors::{analyze_ytdlp_error, error_summary};

#[derive(Debug, Clone)]
pub struct YtDlp {
    config: YtDlpConfig,
}

impl YtDlp {
    pub fn new(config: YtDlpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &YtDlpConfig {
        &self.config
    }

    fn command(&self) -> Command {
        Command::new(&self.config.bin)
    }

    /// Turn a non-zero exit into `ExternalTool`, keeping stderr.
    fn check_exit(output: Output, what: &str) -> Result<Output, DownloadError> {
        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        tracing::error!(
            what,
            code = ?output.status.code(),
            kind = analyze_ytdlp_error(&stderr).as_ref(),
            stderr = error_summary(&stderr),
            "yt-dlp failed"
        );
        Err(DownloadError::ExternalTool {
            code: output.status.code(),
            stderr,
        })
    }

    /// `yt-dlp --version`, trimmed.
    pub async fn version(&self) -> Result<String, DownloadError> {
        let mut cmd = self.command();
        cmd.arg("--version");

        let output = run_with_timeout(&mut cmd, self.config.version_timeout, "version check").await?;
        let output = Self::check_exit(output, "version check")?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn spawn_stream(&self, format_id: &str, url: &str, label: String) -> Result<MediaStream, DownloadError> {
        let args = ["--format", format_id, "--output", "-", "--no-warnings", url];
        tracing::info!(bin = %self.config.bin, ?args, "starting yt-dlp stream");

        let child = self
            .command()
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| DownloadError::Spawn {
                program: self.config.bin.clone(),
                source,
            })?;

        MediaStream::from_child(child, self.config.stream_idle_timeout, label).map_err(|source| DownloadError::Spawn {
            program: self.config.bin.clone(),
            source,
        })
    }
}

#[async_trait]
impl MediaDownloader for YtDlp {
    async fn download_video(&self, options: &DownloadOptions) -> Result<DownloadResult, DownloadError> {
        let span = tracing::info_span!(
            "download",
            video_id = %options.video_id,
            kind = %options.kind,
            quality = %options.quality,
            title = %options.title,
        );

        async move {
            let url = watch_url(&options.video_id);
            let metadata = self.fetch_metadata(&options.video_id).await?;

            let format = select_format(&metadata.formats, options.kind, options.quality).ok_or_else(|| {
                DownloadError::NoSuitableFormat {
                    kind: options.kind,
                    ceiling: (options.kind == MediaKind::Video).then_some(options.quality.height()),
                }
            })?;
            let size = format.declared_size();
            tracing::info!(
                format_id = %format.format_id,
                ext = format.ext.as_deref().unwrap_or("?"),
                height = ?format.height,
                size,
                "selected format"
            );

            let label = format!("{}:{}", options.video_id, format.format_id);
            let stream = self.spawn_stream(&format.format_id, &url, label).await?;

            Ok(DownloadResult {
                stream,
                size,
                format_id: format.format_id.clone(),
            })
        }
        .instrument(span)
        .await
    }

    async fn resolve_formats(&self, video_id: &str) -> Result<Vec<FormatDescriptor>, DownloadError> {
        let url = watch_url(video_id);
        let mut cmd = self.command();
        cmd.args(["--list-formats", "--no-warnings", "--print", LISTING_TEMPLATE, url.as_str()]);

        tracing::info!(video_id, "listing formats");
        let output = run_with_timeout(&mut cmd, self.config.metadata_timeout, "format listing").await?;
        let output = Self::check_exit(output, "format listing")?;

        let formats = parse_format_listing(&String::from_utf8_lossy(&output.stdout));
        tracing::debug!(video_id, count = formats.len(), "parsed format listing");
        Ok(formats)
    }

    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, DownloadError> {
        let url = watch_url(video_id);
        let mut cmd = self.command();
        cmd.args(["--dump-json", "--no-warnings", "--no-playlist", url.as_str()]);

        tracing::info!(video_id, "fetching metadata");
        let output = run_with_timeout(&mut cmd, self.config.metadata_timeout, "metadata dump").await?;
        let output = Self::check_exit(output, "metadata dump")?;

        VideoMetadata::from_json(&output.stdout)
    }

    async fn is_installed(&self) -> bool {
        match self.version().await {
            Ok(version) => {
                tracing::debug!(%version, "yt-dlp is installed");
                true
            }
            Err(e) => {
                tracing::warn!(bin = %self.config.bin, error = %e, "yt-dlp is not available");
                false
            }
        }
    }
}
