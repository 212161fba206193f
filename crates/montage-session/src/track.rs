//! Tracks of the linear editor.

use montage_core::SampleBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_TRACK_ID: AtomicU64 = AtomicU64::new(0);

/// Track identifier: creation time in milliseconds, bumped to stay strictly
/// increasing within the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl TrackId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut last = LAST_TRACK_ID.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match LAST_TRACK_ID.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(candidate),
                Err(actual) => last = actual,
            }
        }
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a track's audio entered the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackOrigin {
    Recorded,
    Imported,
}

/// One track of the linear editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    id: TrackId,
    buffer: SampleBuffer,
    origin: TrackOrigin,
    mime: Option<String>,
}

impl Track {
    pub(crate) fn new(buffer: SampleBuffer, origin: TrackOrigin, mime: Option<String>) -> Self {
        Self {
            id: TrackId::next(),
            buffer,
            origin,
            mime,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn origin(&self) -> TrackOrigin {
        self.origin
    }

    /// MIME type of the blob the track was decoded from.
    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.buffer.duration_seconds()
    }

    pub(crate) fn replace_buffer(&mut self, buffer: SampleBuffer, mime: Option<String>) {
        self.buffer = buffer;
        if mime.is_some() {
            self.mime = mime;
        }
    }
}
