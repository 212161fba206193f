//! Bounded asynchronous capture.
//!
//! A [`CaptureSource`] hands out a stream of encoded chunks. [`capture`]
//! collects them until the time budget elapses, the [`StopHandle`] fires or
//! the source closes. Chunks already produced when capture ends are kept.
//!
//! A source opened with [`CaptureStream::with_finish`] is told when capture
//! ends and may flush a final chunk; capture keeps reading until the source
//! drops its sender or [`FLUSH_GRACE`] passes.

use crate::error::Result;
use async_trait::async_trait;
use montage_core::EncodedAudio;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// How long a finished capture waits for a source to flush and close.
pub const FLUSH_GRACE: Duration = Duration::from_millis(500);

/// Stream of encoded chunks from an opened source.
#[derive(Debug)]
pub struct CaptureStream {
    pub mime: String,
    pub chunks: mpsc::Receiver<Vec<u8>>,
    finish: Option<oneshot::Sender<()>>,
}

impl CaptureStream {
    /// Stream whose producer needs no notice when capture ends.
    pub fn new(mime: impl Into<String>, chunks: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            mime: mime.into(),
            chunks,
            finish: None,
        }
    }

    /// Stream plus the receiver that resolves when capture ends.
    ///
    /// The producer should send any buffered tail and then drop its sender.
    /// The receiver also resolves (with an error) if the capture is abandoned.
    pub fn with_finish(
        mime: impl Into<String>,
        chunks: mpsc::Receiver<Vec<u8>>,
    ) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let stream = Self {
            mime: mime.into(),
            chunks,
            finish: Some(tx),
        };
        (stream, rx)
    }
}

/// Opaque producer of encoded audio (a microphone recorder, a test fixture).
#[async_trait]
pub trait CaptureSource: Send {
    /// Start producing chunks. Fails with [`SessionError::CaptureUnavailable`](crate::SessionError::CaptureUnavailable)
    /// when the device cannot be opened; callers do not retry.
    async fn open(&mut self) -> Result<CaptureStream>;
}

/// Why a capture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEnd {
    BudgetElapsed,
    Stopped,
    SourceClosed,
}

/// Result of a finished capture.
#[derive(Debug, Clone)]
pub struct CapturedAudio {
    pub audio: EncodedAudio,
    pub chunks: usize,
    pub end: CaptureEnd,
}

/// Requests an early end of a running capture.
#[derive(Debug)]
pub struct StopHandle(oneshot::Sender<()>);

impl StopHandle {
    pub fn stop(self) {
        // The capture may already have finished.
        let _ = self.0.send(());
    }
}

/// Receiving side of a [`StopHandle`].
#[derive(Debug)]
pub struct StopSignal(oneshot::Receiver<()>);

/// Create a linked stop handle and signal.
pub fn stop_signal() -> (StopHandle, StopSignal) {
    let (tx, rx) = oneshot::channel();
    (StopHandle(tx), StopSignal(rx))
}

/// Record from `source` for at most `budget`.
///
/// Dropping the [`StopHandle`] without calling `stop` lets the capture run
/// to its budget.
pub async fn capture(
    source: &mut dyn CaptureSource,
    budget: Duration,
    stop: StopSignal,
) -> Result<CapturedAudio> {
    let CaptureStream {
        mime,
        mut chunks,
        finish,
    } = source.open().await?;
    info!(?budget, mime = %mime, "capture started");

    let mut bytes = Vec::new();
    let mut count = 0usize;
    let mut stop = stop.0;
    let mut stop_armed = true;
    let deadline = tokio::time::sleep(budget);
    tokio::pin!(deadline);

    let end = loop {
        tokio::select! {
            chunk = chunks.recv() => match chunk {
                Some(chunk) => {
                    count += 1;
                    bytes.extend_from_slice(&chunk);
                }
                None => break CaptureEnd::SourceClosed,
            },
            signal = &mut stop, if stop_armed => match signal {
                Ok(()) => break CaptureEnd::Stopped,
                Err(_) => stop_armed = false,
            },
            _ = &mut deadline => break CaptureEnd::BudgetElapsed,
        }
    };

    if let Some(finish) = finish.filter(|_| end != CaptureEnd::SourceClosed) {
        // The source may already be gone.
        let _ = finish.send(());
        let flushed = tokio::time::timeout(FLUSH_GRACE, async {
            while let Some(chunk) = chunks.recv().await {
                count += 1;
                bytes.extend_from_slice(&chunk);
            }
        })
        .await;
        if flushed.is_err() {
            warn!(grace = ?FLUSH_GRACE, "source still open after capture ended");
        }
    }

    chunks.close();
    while let Ok(chunk) = chunks.try_recv() {
        count += 1;
        bytes.extend_from_slice(&chunk);
    }

    if bytes.is_empty() {
        warn!(?end, "capture produced no audio");
    }
    debug!(?end, chunks = count, len = bytes.len(), "capture finished");
    Ok(CapturedAudio {
        audio: EncodedAudio::new(bytes, mime),
        chunks: count,
        end,
    })
}
