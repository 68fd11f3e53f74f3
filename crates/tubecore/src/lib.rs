//! tubecore - yt-dlp orchestration for the tubepipe download endpoint
//!
//! This library holds everything that is not HTTP: configuration, logging,
//! the yt-dlp wrapper, format selection and the streaming body type.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, process helpers, filename utils
//! - `download`: yt-dlp invocation, metadata parsing, format selection, streaming

pub mod core;
pub mod download;

// Re-export commonly used types for convenience
pub use core::{config::Config, error::AppError, utils::sanitize_filename};
pub use download::{
    DownloadError, DownloadOptions, DownloadResult, MediaDownloader, MediaKind, MediaStream, QualityCeiling, YtDlp,
};
