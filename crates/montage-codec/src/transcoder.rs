//! Boundary to an external transcoder (an ffmpeg-like tool).

use crate::container::ContainerFormat;
use crate::error::TranscodeError;
use async_trait::async_trait;
use montage_dsp::EchoParams;
use std::fmt;

/// Which end of the audio a fade applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// Work handed to the transcoder, rendered as an ffmpeg-style filter string.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterGraph {
    /// `aecho=in:out:delay:decay`
    Echo(EchoParams),
    /// `afade=t=in:st=0:d=1`
    Fade {
        direction: FadeDirection,
        start: f64,
        duration: f64,
    },
    /// Re-encode into another container, e.g. `encode=mp3`.
    Encode(ContainerFormat),
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterGraph::Echo(params) => write!(
                f,
                "aecho={}:{}:{}:{}",
                params.in_gain, params.out_gain, params.delay_ms, params.decay
            ),
            FilterGraph::Fade {
                direction,
                start,
                duration,
            } => {
                let t = match direction {
                    FadeDirection::In => "in",
                    FadeDirection::Out => "out",
                };
                write!(f, "afade=t={}:st={}:d={}", t, start, duration)
            }
            FilterGraph::Encode(format) => write!(f, "encode={}", format.extension()),
        }
    }
}

/// External transcoder collaborator.
///
/// Receives WAV bytes and returns the encoded result. Implementations report
/// failures as errors; an empty output is returned as an empty vector.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(&self, input: &[u8], graph: &FilterGraph)
        -> Result<Vec<u8>, TranscodeError>;
}
