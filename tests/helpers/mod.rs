//! Test helpers and fixtures for Montage integration tests
//!
//! Fixtures are written as 32-bit float WAV through hound so decoded samples
//! match the generated ones exactly. Collaborators (transcoder, export sink,
//! capture source) are in-memory fakes.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (trim, passthrough)
//! - `DSP_EPSILON` (1e-4): Mixing and fades
//! - `INT16_ROUNDTRIP_EPSILON`: Anything re-encoded as 16-bit WAV

#![allow(dead_code)]


use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use montage::codec::TranscodeError;
use montage::prelude::*;
use montage::session::{CaptureStream, SessionError};
use montage::{ExportError, FilterGraph};
use std::io::Cursor;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

/// Sample rate used by the reference scenarios.
pub const TEST_SAMPLE_RATE: u32 = 44100;

/// Engine with default configuration.
pub fn test_engine() -> MontageEngine {
    MontageEngine::builder()
        .build()
        .expect("Failed to create test engine")
}

// =============================================================================
// Signal generators
// =============================================================================

/// Sine wave at `frequency` for `num_samples` samples.
pub fn generate_sine(frequency: f64, sample_rate: u32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (0.5 * (2.0 * std::f64::consts::PI * frequency * t).sin()) as f32
        })
        .collect()
}

/// Constant value.
pub fn generate_dc(value: f32, num_samples: usize) -> Vec<f32> {
    vec![value; num_samples]
}

/// Ramp in `[0, 1)` where sample `i` equals `i / num_samples`.
///
/// Every sample encodes its own position, so trimmed output can be traced
/// back to the source frame it came from.
pub fn generate_position_ramp(num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| (i as f64 / num_samples as f64) as f32)
        .collect()
}

pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

// =============================================================================
// Fixtures
// =============================================================================

/// Planar channels as 32-bit float WAV bytes.
pub fn float_wav_bytes(channels: &[Vec<f32>], sample_rate: u32) -> Vec<u8> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let frames = channels.first().map(Vec::len).unwrap_or(0);
    let mut bytes = Vec::new();
    {
        let mut writer =
            WavWriter::new(Cursor::new(&mut bytes), spec).expect("Failed to create WAV writer");
        for frame in 0..frames {
            for channel in channels {
                writer
                    .write_sample(channel[frame])
                    .expect("Failed to write sample");
            }
        }
        writer.finalize().expect("Failed to finalize WAV");
    }
    bytes
}

/// Mono float WAV wrapped as [`EncodedAudio`].
pub fn mono_wav(samples: Vec<f32>, sample_rate: u32) -> EncodedAudio {
    EncodedAudio::wav(float_wav_bytes(&[samples], sample_rate))
}

/// Mono DC fixture of the given length.
pub fn dc_wav(value: f32, seconds: f64, sample_rate: u32) -> EncodedAudio {
    let frames = (seconds * sample_rate as f64).round() as usize;
    mono_wav(generate_dc(value, frames), sample_rate)
}

/// Build `kinds` as a linear chain and return the node ids in order.
pub fn build_chain(engine: &MontageEngine, kinds: &[NodeKind]) -> Vec<NodeId> {
    let ids: Vec<NodeId> = kinds
        .iter()
        .map(|k| engine.add_node(*k).expect("Failed to add node"))
        .collect();
    for pair in ids.windows(2) {
        engine
            .connect(&pair[0], OUTPUT_PORT, &pair[1], INPUT_PORT)
            .expect("Failed to connect nodes");
    }
    ids
}

// =============================================================================
// Collaborators
// =============================================================================

/// Transcoder that renders echo the way the local operator does and passes
/// encodes through unchanged.
#[derive(Default)]
pub struct LoopbackTranscoder {
    pub requests: Mutex<Vec<String>>,
}

#[async_trait]
impl Transcoder for LoopbackTranscoder {
    async fn transcode(
        &self,
        input: &[u8],
        graph: &FilterGraph,
    ) -> std::result::Result<Vec<u8>, TranscodeError> {
        self.requests.lock().unwrap().push(graph.to_string());
        match graph {
            FilterGraph::Echo(params) => {
                let buffer = montage::codec::decode_wav(input)
                    .map_err(|e| TranscodeError::Failed(e.to_string()))?;
                let echoed = montage::dsp::echo(&buffer, *params)
                    .map_err(|e| TranscodeError::Failed(e.to_string()))?;
                Ok(montage::codec::encode_wav(&echoed))
            }
            FilterGraph::Encode(_) => Ok(input.to_vec()),
            other => Err(TranscodeError::UnsupportedFilter(other.to_string())),
        }
    }
}

/// Transcoder that parks every request until released.
#[derive(Default)]
pub struct GatedTranscoder {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl Transcoder for GatedTranscoder {
    async fn transcode(
        &self,
        input: &[u8],
        _graph: &FilterGraph,
    ) -> std::result::Result<Vec<u8>, TranscodeError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(input.to_vec())
    }
}

/// Export sink that keeps every delivery in memory.
#[derive(Default)]
pub struct MemorySink {
    pub deliveries: Mutex<Vec<(String, EncodedAudio)>>,
}

#[async_trait]
impl ExportSink for MemorySink {
    async fn deliver(
        &self,
        name: &str,
        audio: EncodedAudio,
    ) -> std::result::Result<String, ExportError> {
        self.deliveries
            .lock()
            .unwrap()
            .push((name.to_string(), audio));
        Ok(format!("memory://{}", name))
    }
}

/// Capture source that emits fixed chunks at an interval and then stays open.
pub struct ChunkedSource {
    pub mime: String,
    pub chunks: Vec<Vec<u8>>,
    pub interval: Duration,
}

impl ChunkedSource {
    /// Split `bytes` into `count` roughly equal chunks.
    pub fn split(bytes: &[u8], count: usize, interval: Duration) -> Self {
        let size = bytes.len().div_ceil(count.max(1));
        Self {
            mime: "audio/wav".into(),
            chunks: bytes.chunks(size.max(1)).map(<[u8]>::to_vec).collect(),
            interval,
        }
    }
}

#[async_trait]
impl CaptureSource for ChunkedSource {
    async fn open(&mut self) -> montage::session::Result<CaptureStream> {
        let (tx, rx) = mpsc::channel(16);
        let chunks = std::mem::take(&mut self.chunks);
        let interval = self.interval;
        let (stream, finished) = CaptureStream::with_finish(self.mime.clone(), rx);
        tokio::spawn(async move {
            // Hold the sender so only the budget or a stop ends the capture.
            let produce = async {
                for chunk in chunks {
                    tokio::time::sleep(interval).await;
                    if tx.send(chunk).await.is_err() {
                        return;
                    }
                }
                std::future::pending::<()>().await;
            };
            tokio::select! {
                _ = produce => {}
                _ = finished => {}
            }
        });
        Ok(stream)
    }
}

/// Capture source whose device cannot be opened.
pub struct UnavailableSource;

#[async_trait]
impl CaptureSource for UnavailableSource {
    async fn open(&mut self) -> montage::session::Result<CaptureStream> {
        Err(SessionError::CaptureUnavailable("permission denied".into()))
    }
}
