//! Compressed container decoding using symphonia

use crate::container::ContainerHint;
use crate::error::{CodecError, Result};
use montage_core::SampleBuffer;
use std::io::Cursor;
use symphonia::core::audio::SampleBuffer as PcmBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decode the first audio track of a compressed container.
pub fn decode_compressed(bytes: &[u8], hint: ContainerHint) -> Result<SampleBuffer> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut probe_hint = Hint::new();
    if let Some(extension) = hint.extension() {
        probe_hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe().format(
        &probe_hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| CodecError::DecodeError("no audio track found".into()))?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder =
        symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

    let mut interleaved: Vec<f32> = Vec::new();
    let mut pcm: Option<PcmBuffer<f32>> = None;
    let mut channel_count = codec_params.channels.map(|c| c.count()).unwrap_or(0);
    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                warn!(reason, "skipping undecodable packet");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        channel_count = spec.channels.count();
        sample_rate = spec.rate;

        let needs_alloc = pcm
            .as_ref()
            .map_or(true, |buf| buf.capacity() < decoded.capacity());
        if needs_alloc {
            pcm = Some(PcmBuffer::<f32>::new(decoded.capacity() as u64, spec));
        }
        if let Some(buf) = pcm.as_mut() {
            buf.copy_interleaved_ref(decoded);
            interleaved.extend_from_slice(buf.samples());
        }
    }

    if interleaved.is_empty() || channel_count == 0 || sample_rate == 0 {
        return Err(CodecError::DecodeError(
            "container holds no decodable audio".into(),
        ));
    }

    debug!(
        ?hint,
        channel_count,
        sample_rate,
        frames = interleaved.len() / channel_count,
        "decoded compressed audio"
    );
    Ok(SampleBuffer::from_interleaved(
        &interleaved,
        channel_count,
        sample_rate,
    )?)
}
