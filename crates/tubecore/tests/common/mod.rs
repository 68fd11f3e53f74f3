//! Common test utilities
//!
//! Builds throwaway shell scripts that impersonate yt-dlp, so the real
//! process plumbing (spawn, pipes, exit codes, timeouts) is exercised without
//! touching the network.

#![allow(dead_code, clippy::unwrap_used)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tubecore::core::config::YtDlpConfig;
use tubecore::YtDlp;

/// Metadata dump with a spread of formats, mirroring real yt-dlp output.
pub const METADATA_JSON: &str = r#"{
    "id": "abc123",
    "title": "My Video!",
    "duration": 95.0,
    "uploader": "Tester",
    "thumbnail": "https://i.ytimg.com/vi/abc123/hq720.jpg",
    "formats": [
        {"format_id": "sb0", "ext": "mhtml", "acodec": "none", "vcodec": "none", "height": 45},
        {"format_id": "139", "ext": "m4a", "acodec": "mp4a.40.5", "vcodec": "none", "filesize": null, "filesize_approx": 812345},
        {"format_id": "140", "ext": "m4a", "acodec": "mp4a.40.2", "vcodec": "none", "filesize": 1534567},
        {"format_id": "18", "ext": "mp4", "acodec": "mp4a.40.2", "vcodec": "avc1.42001E", "height": 360, "filesize": 4000000},
        {"format_id": "22", "ext": "mp4", "acodec": "mp4a.40.2", "vcodec": "avc1.64001F", "height": 720, "filesize": 9000000},
        {"format_id": "37", "ext": "mp4", "acodec": "mp4a.40.2", "vcodec": "avc1.640028", "height": 1080},
        {"format_id": "137", "ext": "mp4", "acodec": "none", "vcodec": "avc1.640028", "height": 1080, "filesize": 50000000}
    ]
}"#;

/// A fake yt-dlp living in its own temp directory.
pub struct FakeYtDlp {
    pub dir: TempDir,
    pub bin: PathBuf,
}

impl FakeYtDlp {
    /// Script whose body is a `case "$1" in ... esac` dispatch on the first argument.
    ///
    /// `{dir}` in the body is replaced with the temp directory path.
    pub fn with_cases(cases: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let body = cases.replace("{dir}", &dir.path().display().to_string());
        let script = format!("#!/bin/sh\ncase \"$1\" in\n{}\nesac\n", body);

        let bin = dir.path().join("yt-dlp");
        fs::write(&bin, script).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir, bin }
    }

    /// The usual happy-path tool: version, metadata, listing and streaming.
    pub fn working() -> Self {
        let fake = Self::with_cases(
            r#"
  --version) echo "2024.12.13" ;;
  --dump-json) cat "{dir}/metadata.json" ;;
  --list-formats)
    echo "[youtube] abc123: Downloading webpage"
    echo "18|mp4|640x360|mp4a.40.2|avc1.42001E|360p"
    echo "137|mp4|1920x1080|none|avc1.640028|1080p"
    echo "22|mp4|1280x720|mp4a.40.2|avc1.64001F|720p"
    ;;
  --format) printf "MEDIA:%s" "$2" ;;
  *) echo "unexpected args: $*" >&2; exit 2 ;;
"#,
        );
        fake.write_file("metadata.json", METADATA_JSON);
        fake
    }

    pub fn write_file(&self, name: &str, contents: &str) {
        fs::write(self.dir.path().join(name), contents).unwrap();
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn config(&self) -> YtDlpConfig {
        YtDlpConfig {
            bin: self.bin.display().to_string(),
            metadata_timeout: Duration::from_secs(10),
            version_timeout: Duration::from_secs(5),
            stream_idle_timeout: Duration::from_secs(10),
        }
    }

    pub fn ytdlp(&self) -> YtDlp {
        YtDlp::new(self.config())
    }
}

/// `true` if the pid is gone or only a zombie waiting to be reaped.
pub fn process_is_dead(pid: u32) -> bool {
    let stat = Path::new("/proc").join(pid.to_string()).join("stat");
    match fs::read_to_string(stat) {
        Ok(contents) => contents
            .rsplit(')')
            .next()
            .and_then(|rest| rest.split_whitespace().next())
            .is_some_and(|state| state == "Z" || state == "X"),
        Err(_) => true,
    }
}
