use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::error::AppResult;

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "tubepipe.toml";

/// Prefix for environment overrides, e.g. `TUBEPIPE_BIND_ADDR`
pub const ENV_PREFIX: &str = "TUBEPIPE_";

/// Runtime configuration for the service.
///
/// Built once at startup and handed to the components that need it; nothing
/// reads the environment after that.
///
/// Sources, lowest priority first:
/// 1. built-in defaults
/// 2. `tubepipe.toml` (or the file passed with `--config`)
/// 3. `TUBEPIPE_*` environment variables
/// 4. `YTDLP_PATH` for the yt-dlp binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// yt-dlp executable, bare name resolved through PATH or an absolute path
    pub ytdlp_path: String,
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Quality label used when a request carries none
    pub default_quality: String,
    /// Upper bound for `--dump-json` and `--list-formats` runs
    pub metadata_timeout_secs: u64,
    /// Upper bound for `--version`
    pub version_timeout_secs: u64,
    /// Max silence on the download stdout before the child is killed
    pub stream_idle_timeout_secs: u64,
    /// Filter directive for the logger, overridden by RUST_LOG
    pub log_level: String,
    /// Optional log file, written in addition to the console
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ytdlp_path: "yt-dlp".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            default_quality: "720p".to_string(),
            metadata_timeout_secs: 60,
            version_timeout_secs: 10,
            stream_idle_timeout_secs: 120,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Layered figment for the given config file (or the default one).
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let file = config_file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Env::raw().only(&["YTDLP_PATH"]))
    }

    /// Load configuration from all sources.
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let config: Config = Self::figment(config_file).extract()?;
        Ok(config)
    }

    /// Settings the yt-dlp wrapper is constructed with.
    pub fn ytdlp(&self) -> YtDlpConfig {
        YtDlpConfig {
            bin: self.ytdlp_path.clone(),
            metadata_timeout: Duration::from_secs(self.metadata_timeout_secs),
            version_timeout: Duration::from_secs(self.version_timeout_secs),
            stream_idle_timeout: Duration::from_secs(self.stream_idle_timeout_secs),
        }
    }
}

/// yt-dlp invocation settings, injected into [`crate::download::YtDlp`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpConfig {
    pub bin: String,
    pub metadata_timeout: Duration,
    pub version_timeout: Duration,
    pub stream_idle_timeout: Duration,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Config::default().ytdlp()
    }
}
