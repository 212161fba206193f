//! WAV encoding and decoding
//!
//! Encoding always produces the canonical 44-byte header, 16-bit PCM layout.
//! Decoding accepts 8/16/24/32-bit integer and 32-bit float PCM.
//!
//! The 32-bit size and byte-rate fields saturate at `u32::MAX` when the true
//! value does not fit; the sample data is still written in full. Readers that
//! stream past a saturated `data` size (as with any >4 GiB WAV) see every frame.

use crate::error::{CodecError, Result};
use byteorder::{ByteOrder, LittleEndian};
use hound::{SampleFormat, WavReader};
use montage_core::SampleBuffer;
use std::io::Cursor;

/// Size of the canonical RIFF/WAVE header.
pub const HEADER_LEN: usize = 44;

const BITS_PER_SAMPLE: u16 = 16;
const PCM_FORMAT: u16 = 1;

/// Encode a buffer as 16-bit PCM WAV.
///
/// Samples are clamped to [-1, 1], scaled by 0x8000 when negative and 0x7FFF
/// otherwise, and truncated toward zero.
pub fn encode_wav(buffer: &SampleBuffer) -> Vec<u8> {
    // SampleBuffer::MAX_CHANNELS keeps the block align within u16.
    let channels = u16::try_from(buffer.channel_count()).unwrap_or(u16::MAX);
    let block_align = channels.saturating_mul(BITS_PER_SAMPLE / 8);
    let data_len = buffer.frame_count() * buffer.channel_count() * 2;
    let data_len_u32 = saturate_u32(data_len as u64);

    let mut bytes = vec![0u8; HEADER_LEN + data_len];
    {
        let header = &mut bytes[..HEADER_LEN];
        header[0..4].copy_from_slice(b"RIFF");
        LittleEndian::write_u32(&mut header[4..8], data_len_u32.saturating_add(36));
        header[8..12].copy_from_slice(b"WAVE");
        header[12..16].copy_from_slice(b"fmt ");
        LittleEndian::write_u32(&mut header[16..20], 16);
        LittleEndian::write_u16(&mut header[20..22], PCM_FORMAT);
        LittleEndian::write_u16(&mut header[22..24], channels);
        LittleEndian::write_u32(&mut header[24..28], buffer.sample_rate());
        LittleEndian::write_u32(
            &mut header[28..32],
            saturate_u32(buffer.sample_rate() as u64 * block_align as u64),
        );
        LittleEndian::write_u16(&mut header[32..34], block_align);
        LittleEndian::write_u16(&mut header[34..36], BITS_PER_SAMPLE);
        header[36..40].copy_from_slice(b"data");
        LittleEndian::write_u32(&mut header[40..44], data_len_u32);
    }

    let samples = buffer.to_interleaved();
    for (slot, sample) in bytes[HEADER_LEN..].chunks_exact_mut(2).zip(samples) {
        LittleEndian::write_i16(slot, to_pcm16(sample));
    }
    bytes
}

#[inline]
fn saturate_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[inline]
fn to_pcm16(sample: f32) -> i16 {
    let clamped = sample.clamp(-1.0, 1.0);
    if clamped < 0.0 {
        (clamped * 32768.0) as i16
    } else {
        (clamped * 32767.0) as i16
    }
}

/// Decode WAV bytes into a planar buffer.
///
/// Integer samples are normalised by `2^(bits - 1)`.
pub fn decode_wav(bytes: &[u8]) -> Result<SampleBuffer> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(CodecError::DecodeError("WAV declares zero channels".into()));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(CodecError::UnsupportedFormat(format!(
                    "{}-bit integer WAV",
                    spec.bits_per_sample
                )));
            }
            let scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    Ok(SampleBuffer::from_interleaved(
        &interleaved,
        spec.channels as usize,
        spec.sample_rate,
    )?)
}
