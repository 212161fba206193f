//! # Montage Codec
//!
//! Turns encoded blobs into [`SampleBuffer`]s and back.
//!
//! - **Decoding**: WAV via hound, compressed containers via symphonia
//! - **Encoding**: canonical 16-bit PCM WAV; other containers through an
//!   external [`Transcoder`]
//!
//! ```ignore
//! use montage_codec::{decode, encode_wav, ContainerHint};
//!
//! let buffer = decode(&bytes, ContainerHint::from_mime("audio/webm"))?;
//! let wav = encode_wav(&buffer);
//! ```
//!
//! ## Feature Flags
//!
//! - `compressed` (default): MP3/Ogg/WebM/FLAC/MP4 decoding via symphonia

pub mod error;
pub mod format;

mod container;
mod transcoder;

pub use container::{ContainerFormat, ContainerHint};
pub use error::{CodecError, Result, TranscodeError};
pub use format::wav::{decode_wav, encode_wav};
pub use transcoder::{FadeDirection, FilterGraph, Transcoder};

use montage_core::{EncodedAudio, SampleBuffer};
use tracing::debug;

/// Decode encoded bytes. An `Unknown` hint falls back to sniffing the bytes.
pub fn decode(bytes: &[u8], hint: ContainerHint) -> Result<SampleBuffer> {
    if bytes.is_empty() {
        return Err(CodecError::DecodeError("empty input".into()));
    }

    let container = hint.resolve(bytes);
    debug!(?hint, ?container, len = bytes.len(), "decoding");
    match container {
        ContainerHint::Wav => decode_wav(bytes),
        other => decode_compressed(bytes, other),
    }
}

/// Decode an [`EncodedAudio`] using its MIME type as the hint.
pub fn decode_audio(audio: &EncodedAudio) -> Result<SampleBuffer> {
    decode(audio.bytes(), ContainerHint::from_mime(audio.mime()))
}

#[cfg(feature = "compressed")]
fn decode_compressed(bytes: &[u8], hint: ContainerHint) -> Result<SampleBuffer> {
    format::compressed::decode_compressed(bytes, hint)
}

#[cfg(not(feature = "compressed"))]
fn decode_compressed(_bytes: &[u8], hint: ContainerHint) -> Result<SampleBuffer> {
    Err(CodecError::UnsupportedFormat(format!(
        "{:?} (built without the `compressed` feature)",
        hint
    )))
}

/// Encode a buffer into `format`.
///
/// WAV is encoded locally; every other container is delegated to the
/// transcoder and fails with [`CodecError::TranscodeUnavailable`] without one.
pub async fn encode_container(
    buffer: &SampleBuffer,
    format: ContainerFormat,
    transcoder: Option<&dyn Transcoder>,
) -> Result<EncodedAudio> {
    let wav = encode_wav(buffer);
    if format == ContainerFormat::Wav {
        return Ok(EncodedAudio::wav(wav));
    }

    let transcoder =
        transcoder.ok_or_else(|| CodecError::TranscodeUnavailable(format.mime().into()))?;
    let graph = FilterGraph::Encode(format);
    debug!(filter = %graph, "delegating encode to transcoder");
    let bytes = transcoder.transcode(&wav, &graph).await?;
    Ok(EncodedAudio::new(bytes, format.mime()))
}

/// Render `graph` over `buffer` with the transcoder and decode the result.
///
/// An empty transcoder output is a [`CodecError::DecodeError`].
pub async fn render_with(
    transcoder: &dyn Transcoder,
    buffer: &SampleBuffer,
    graph: &FilterGraph,
) -> Result<SampleBuffer> {
    debug!(filter = %graph, "delegating render to transcoder");
    let output = transcoder.transcode(&encode_wav(buffer), graph).await?;
    decode(&output, ContainerHint::Unknown)
}
