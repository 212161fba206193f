//! Linear fade ramps.

use montage_core::SampleBuffer;

/// Ramp the first `seconds` of the buffer up from silence.
///
/// Frame `i` of the ramp is scaled by `i / fade_frames`, so frame 0 is exactly
/// zero. `fade_frames = floor(seconds * sample_rate)` is clamped to the buffer
/// length. A non-positive (or non-finite) duration returns an unchanged copy.
pub fn fade_in(buffer: &SampleBuffer, seconds: f64) -> SampleBuffer {
    let fade_frames = fade_frames(buffer, seconds);
    let mut faded = buffer.clone();
    for channel in faded.channels_mut() {
        for (i, sample) in channel.iter_mut().take(fade_frames).enumerate() {
            *sample *= gain(i, fade_frames);
        }
    }
    faded
}

/// Ramp the last `seconds` of the buffer down to silence.
///
/// Mirror of [`fade_in`]: frame `frame_count - 1 - i` is scaled by
/// `i / fade_frames`, so the last frame is exactly zero.
pub fn fade_out(buffer: &SampleBuffer, seconds: f64) -> SampleBuffer {
    let fade_frames = fade_frames(buffer, seconds);
    let mut faded = buffer.clone();
    for channel in faded.channels_mut() {
        for (i, sample) in channel.iter_mut().rev().take(fade_frames).enumerate() {
            *sample *= gain(i, fade_frames);
        }
    }
    faded
}

fn fade_frames(buffer: &SampleBuffer, seconds: f64) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    let frames = buffer.seconds_to_frames(seconds).max(0) as usize;
    frames.min(buffer.frame_count())
}

#[inline]
fn gain(i: usize, fade_frames: usize) -> f32 {
    (i as f64 / fade_frames as f64) as f32
}
