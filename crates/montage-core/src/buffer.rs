//! Canonical decoded audio.

use crate::{Error, Result};

/// Decoded, uncompressed multi-channel audio held as planar `f32` channels.
///
/// Every channel holds exactly `frame_count` samples and the sample rate is
/// never zero. The fields are private so the invariant can only be established
/// through the validating constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
    frame_count: usize,
}

impl SampleBuffer {
    /// Most channels a buffer may hold. A 16-bit PCM frame of this many
    /// channels still fits the WAV block-align field.
    pub const MAX_CHANNELS: usize = 256;

    /// Build a buffer from planar channel data.
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidBuffer("sample rate must be positive".into()));
        }
        let Some(first) = channels.first() else {
            return Err(Error::InvalidBuffer("buffer needs at least one channel".into()));
        };
        if channels.len() > Self::MAX_CHANNELS {
            return Err(Error::InvalidBuffer(format!(
                "{} channels exceeds the limit of {}",
                channels.len(),
                Self::MAX_CHANNELS
            )));
        }
        let frame_count = first.len();
        if let Some((index, channel)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != frame_count)
        {
            return Err(Error::InvalidBuffer(format!(
                "channel {} has {} frames, expected {}",
                index,
                channel.len(),
                frame_count
            )));
        }

        Ok(Self {
            channels,
            sample_rate,
            frame_count,
        })
    }

    /// Single-channel buffer.
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        Self::new(vec![samples], sample_rate)
    }

    /// Zero-filled buffer.
    pub fn silent(channel_count: usize, frame_count: usize, sample_rate: u32) -> Result<Self> {
        Self::new(vec![vec![0.0; frame_count]; channel_count], sample_rate)
    }

    /// Split interleaved samples (`L R L R ...`) into planar channels.
    ///
    /// A trailing partial frame is dropped.
    pub fn from_interleaved(samples: &[f32], channel_count: usize, sample_rate: u32) -> Result<Self> {
        if channel_count == 0 {
            return Err(Error::InvalidBuffer("buffer needs at least one channel".into()));
        }
        let frames = samples.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in samples.chunks_exact(channel_count) {
            for (channel, &sample) in channels.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }
        Self::new(channels, sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    /// Mutable views of every channel. Lengths cannot change through a slice.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Interleave channels frame by frame.
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.frame_count * self.channels.len());
        for frame in 0..self.frame_count {
            for channel in &self.channels {
                out.push(channel[frame]);
            }
        }
        out
    }

    /// Convert a time in seconds to a frame index (`floor(seconds * sample_rate)`).
    ///
    /// Products within `1e-6` of a whole frame snap to it, so a duration read
    /// back from [`duration_seconds`](Self::duration_seconds) maps to the same
    /// frame count.
    #[inline]
    pub fn seconds_to_frames(&self, seconds: f64) -> i64 {
        let frames = seconds * self.sample_rate as f64;
        let nearest = frames.round();
        if (frames - nearest).abs() < 1e-6 {
            nearest as i64
        } else {
            frames.floor() as i64
        }
    }
}
