//! Combining several sources into one buffer.

use crate::{Error, Result};
use montage_core::{MergeNormalization, SampleBuffer};
use tracing::debug;

/// Options for [`merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOptions {
    pub normalization: MergeNormalization,
}

impl MergeOptions {
    pub fn new(normalization: MergeNormalization) -> Self {
        Self { normalization }
    }
}

/// Mix sources that all start at frame 0.
///
/// The result is as long as the longest source; shorter sources are padded
/// with silence. Only the channels every source has are kept. With
/// [`MergeNormalization::Average`] the sum is scaled by `1/N`.
pub fn merge(sources: &[&SampleBuffer], options: MergeOptions) -> Result<SampleBuffer> {
    let (sample_rate, channel_count) = check_sources(sources)?;
    let frame_count = sources.iter().map(|s| s.frame_count()).max().unwrap_or(0);

    let mut channels = vec![vec![0.0f32; frame_count]; channel_count];
    for source in sources {
        for (mixed, channel) in channels.iter_mut().zip(source.channels()) {
            for (out, &sample) in mixed.iter_mut().zip(channel) {
                *out += sample;
            }
        }
    }

    if options.normalization == MergeNormalization::Average {
        let scale = 1.0 / sources.len() as f32;
        for sample in channels.iter_mut().flatten() {
            *sample *= scale;
        }
    }

    debug!(
        sources = sources.len(),
        frame_count,
        channel_count,
        normalization = ?options.normalization,
        "merged sources"
    );
    Ok(SampleBuffer::new(channels, sample_rate)?)
}

/// Join sources back to back in the given order.
pub fn concat(sources: &[&SampleBuffer]) -> Result<SampleBuffer> {
    let (sample_rate, channel_count) = check_sources(sources)?;
    let frame_count: usize = sources.iter().map(|s| s.frame_count()).sum();

    let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
    for source in sources {
        for (joined, channel) in channels.iter_mut().zip(source.channels()) {
            joined.extend_from_slice(channel);
        }
    }

    debug!(sources = sources.len(), frame_count, "concatenated sources");
    Ok(SampleBuffer::new(channels, sample_rate)?)
}

/// Shared sample rate and common channel count of at least two sources.
fn check_sources(sources: &[&SampleBuffer]) -> Result<(u32, usize)> {
    if sources.len() < 2 {
        return Err(Error::InsufficientSources(sources.len()));
    }

    let expected = sources[0].sample_rate();
    if let Some(other) = sources.iter().find(|s| s.sample_rate() != expected) {
        return Err(Error::SampleRateMismatch {
            expected,
            found: other.sample_rate(),
        });
    }

    let channel_count = sources
        .iter()
        .map(|s| s.channel_count())
        .min()
        .unwrap_or(1);
    Ok((expected, channel_count))
}
