//! Feedback delay line used for echo and reverb.

use crate::{Error, Result};
use montage_core::SampleBuffer;

/// Delay line settings, in the `in_gain:out_gain:delay_ms:decay` order of an
/// `aecho` filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EchoParams {
    pub in_gain: f32,
    pub out_gain: f32,
    pub delay_ms: f64,
    pub decay: f32,
}

impl EchoParams {
    /// Longest accepted delay, matching the `aecho` filter's range.
    pub const MAX_DELAY_MS: f64 = 90_000.0;

    /// Short slap-back echo.
    pub const ECHO: Self = Self {
        in_gain: 0.8,
        out_gain: 0.88,
        delay_ms: 60.0,
        decay: 0.4,
    };

    /// Long, quiet tail.
    pub const REVERB: Self = Self {
        in_gain: 0.7,
        out_gain: 0.9,
        delay_ms: 1000.0,
        decay: 0.3,
    };

    fn validate(&self) -> Result<()> {
        if !self.delay_ms.is_finite() || self.delay_ms < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "delay must be a non-negative number of milliseconds, got {}",
                self.delay_ms
            )));
        }
        if self.delay_ms > Self::MAX_DELAY_MS {
            return Err(Error::InvalidParameter(format!(
                "delay must be at most {} ms, got {}",
                Self::MAX_DELAY_MS,
                self.delay_ms
            )));
        }
        if !self.decay.is_finite() || !(0.0..1.0).contains(&self.decay) {
            return Err(Error::InvalidParameter(format!(
                "decay must be in [0, 1), got {}",
                self.decay
            )));
        }
        if !self.in_gain.is_finite() || !self.out_gain.is_finite() {
            return Err(Error::InvalidParameter("gains must be finite".into()));
        }
        Ok(())
    }

    /// Delay in frames at `sample_rate`, at least one.
    pub fn delay_frames(&self, sample_rate: u32) -> usize {
        let frames = (self.delay_ms * sample_rate as f64 / 1000.0).round() as usize;
        frames.max(1)
    }
}

/// Run every channel through a feedback delay line. Length is unchanged.
///
/// `wet[n] = x[n] * in_gain + wet[n - d] * decay`, output `wet[n] * out_gain`.
pub fn echo(buffer: &SampleBuffer, params: EchoParams) -> Result<SampleBuffer> {
    params.validate()?;
    // Reads past the end of the buffer only ever see silence.
    let delay = params
        .delay_frames(buffer.sample_rate())
        .min(buffer.frame_count().max(1));

    let mut rendered = buffer.clone();
    for channel in rendered.channels_mut() {
        let mut line = vec![0.0f32; delay];
        let mut cursor = 0;
        for sample in channel.iter_mut() {
            let wet = *sample * params.in_gain + line[cursor] * params.decay;
            line[cursor] = wet;
            cursor = (cursor + 1) % delay;
            *sample = wet * params.out_gain;
        }
    }
    Ok(rendered)
}
