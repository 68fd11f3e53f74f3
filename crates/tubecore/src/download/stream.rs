//! Streaming body backed by a yt-dlp child process.
//!
//! The child writes the media to stdout; [`MediaStream`] hands those bytes
//! out chunk by chunk as the consumer asks for them, so a slow client slows
//! down the reads and nothing is buffered beyond one chunk.
//!
//! Lifecycle:
//! - clean EOF + exit 0: the stream ends normally
//! - EOF + non-zero exit: one final `Err` item, the HTTP body is aborted and
//!   the client sees a truncated transfer (headers are long gone by then)
//! - no bytes for `idle_timeout`: child killed, final `Err` item
//! - stream dropped early (client disconnect): child killed via `kill_on_drop`

use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::VecDeque;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr};
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;

use crate::download::ytdlp_errors::{analyze_ytdlp_error, error_summary};

/// How many trailing stderr lines are kept for the exit diagnostic
const STDERR_TAIL_LINES: usize = 20;

/// Read-once byte stream of the selected media format.
pub struct MediaStream {
    inner: BoxStream<'static, io::Result<Bytes>>,
}

impl MediaStream {
    /// Wrap an arbitrary byte stream (used by alternative downloaders and tests).
    pub fn new<S>(inner: S) -> Self
    where
        S: Stream<Item = io::Result<Bytes>> + Send + 'static,
    {
        Self { inner: inner.boxed() }
    }

    /// Stream the stdout of a spawned child.
    ///
    /// The child must have been spawned with piped stdout and `kill_on_drop`.
    /// Piped stderr is drained in the background and its tail is logged if
    /// the process fails.
    pub fn from_child(mut child: Child, idle_timeout: Duration, label: String) -> io::Result<Self> {
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child stdout was not piped"))?;
        let stderr_tail = child.stderr.take().map(|stderr| tokio::spawn(collect_stderr_tail(stderr)));

        let state = ChildStream {
            reader: ReaderStream::new(stdout),
            child,
            stderr_tail,
            idle_timeout,
            label,
            bytes_sent: 0,
            done: false,
        };

        Ok(Self::new(stream::unfold(state, ChildStream::next_chunk)))
    }
}

impl Stream for MediaStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl std::fmt::Debug for MediaStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaStream").finish_non_exhaustive()
    }
}

struct ChildStream {
    reader: ReaderStream<tokio::process::ChildStdout>,
    child: Child,
    stderr_tail: Option<JoinHandle<VecDeque<String>>>,
    idle_timeout: Duration,
    label: String,
    bytes_sent: u64,
    done: bool,
}

impl ChildStream {
    async fn next_chunk(mut self) -> Option<(io::Result<Bytes>, Self)> {
        if self.done {
            return None;
        }

        match tokio::time::timeout(self.idle_timeout, self.reader.next()).await {
            Ok(Some(Ok(chunk))) => {
                self.bytes_sent += chunk.len() as u64;
                Some((Ok(chunk), self))
            }
            Ok(Some(Err(e))) => {
                tracing::error!(label = %self.label, error = %e, "reading yt-dlp stdout failed");
                self.done = true;
                Some((Err(e), self))
            }
            Ok(None) => {
                self.done = true;
                match self.finish().await {
                    Ok(()) => None,
                    Err(e) => Some((Err(e), self)),
                }
            }
            Err(_) => {
                tracing::error!(
                    label = %self.label,
                    idle_secs = self.idle_timeout.as_secs(),
                    bytes_sent = self.bytes_sent,
                    "yt-dlp produced no output within the idle timeout, killing it"
                );
                self.done = true;
                if let Err(e) = self.child.kill().await {
                    tracing::warn!(label = %self.label, error = %e, "failed to kill stalled yt-dlp");
                }
                Some((
                    Err(io::Error::new(
                        io::ErrorKind::TimedOut,
                        format!("yt-dlp stalled for {:?}", self.idle_timeout),
                    )),
                    self,
                ))
            }
        }
    }

    /// Reap the child after EOF and turn a failed exit into a stream error.
    async fn finish(&mut self) -> io::Result<()> {
        let status = self.child.wait().await?;
        let tail = match self.stderr_tail.take() {
            Some(handle) => handle.await.unwrap_or_default(),
            None => VecDeque::new(),
        };

        if status.success() {
            tracing::info!(label = %self.label, bytes_sent = self.bytes_sent, "stream finished");
            return Ok(());
        }

        let stderr = Vec::from(tail).join("\n");
        tracing::error!(
            label = %self.label,
            code = ?status.code(),
            bytes_sent = self.bytes_sent,
            kind = analyze_ytdlp_error(&stderr).as_ref(),
            stderr = error_summary(&stderr),
            "yt-dlp exited with failure mid-stream; client receives a truncated body"
        );
        Err(io::Error::other(format!(
            "yt-dlp exited with code {:?} after {} bytes",
            status.code(),
            self.bytes_sent
        )))
    }
}

impl Drop for ChildStream {
    fn drop(&mut self) {
        if !self.done {
            tracing::warn!(
                label = %self.label,
                bytes_sent = self.bytes_sent,
                "stream dropped before completion, terminating yt-dlp"
            );
        }
    }
}

async fn collect_stderr_tail(stderr: ChildStderr) -> VecDeque<String> {
    let mut lines = BufReader::new(stderr).lines();
    let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);

    while let Ok(Some(line)) = lines.next_line().await {
        tracing::debug!("yt-dlp: {}", line);
        if tail.len() == STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }

    tail
}
