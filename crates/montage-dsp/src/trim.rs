//! Sample-accurate trimming.

use crate::{Error, Result};
use montage_core::SampleBuffer;

/// Selected time range in seconds, `start` inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrimRegion {
    pub start: f64,
    pub end: f64,
}

impl TrimRegion {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Region of `duration` seconds beginning at `start`.
    pub fn from_start(start: f64, duration: f64) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Copy the frames `[floor(start * sr), floor(end * sr))` of every channel.
///
/// Fails with [`Error::InvalidRegion`] when the range is empty, starts before
/// frame 0 or runs past the end of the buffer.
pub fn trim(buffer: &SampleBuffer, region: TrimRegion) -> Result<SampleBuffer> {
    if !region.start.is_finite() || !region.end.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "trim bounds must be finite, got {}..{}",
            region.start, region.end
        )));
    }

    let start_frame = buffer.seconds_to_frames(region.start);
    let end_frame = buffer.seconds_to_frames(region.end);
    let frame_count = buffer.frame_count();

    if start_frame < 0 || end_frame <= start_frame || end_frame > frame_count as i64 {
        return Err(Error::InvalidRegion {
            start_frame,
            end_frame,
            frame_count,
        });
    }

    let range = start_frame as usize..end_frame as usize;
    let channels = buffer
        .channels()
        .iter()
        .map(|channel| channel[range.clone()].to_vec())
        .collect();

    Ok(SampleBuffer::new(channels, buffer.sample_rate())?)
}
