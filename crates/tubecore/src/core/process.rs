//! Process execution utilities with timeout support
//!
//! yt-dlp can hang on slow extractors or stalled networks, so every captured
//! run goes through [`run_with_timeout`]. Commands are spawned with
//! `kill_on_drop`, which means a timed-out child is killed when the pending
//! `output()` future is dropped.

use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::download::DownloadError;

/// Run a Command to completion with a timeout, capturing stdout and stderr.
///
/// Returns the process Output on success (the exit status is left for the
/// caller to judge), `DownloadError::Spawn` if the binary cannot be launched
/// and `DownloadError::Timeout` if the deadline passes.
pub async fn run_with_timeout(cmd: &mut Command, timeout: Duration, what: &str) -> Result<Output, DownloadError> {
    let program = cmd.as_std().get_program().to_string_lossy().into_owned();

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => Err(DownloadError::Spawn { program, source }),
        Err(_) => {
            tracing::error!(%program, what, timeout_secs = timeout.as_secs(), "process timed out, killed");
            Err(DownloadError::Timeout {
                what: what.to_string(),
                timeout,
            })
        }
    }
}
