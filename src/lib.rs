//! # Montage - Audio Editing Pipeline
//!
//! Processing core of a browser-style audio editor, built from modular
//! subsystems.
//!
//! ## Architecture
//!
//! Montage is an umbrella crate that coordinates:
//! - **montage-core** - Data model (SampleBuffer, EncodedAudio, node graph, config)
//! - **montage-dsp** - Pure operators (trim, fade, merge, echo)
//! - **montage-codec** - WAV/compressed decoding, WAV encoding, transcoder boundary
//! - **montage-session** - Linear track session and bounded capture
//!
//! and adds the pipeline executor that runs a node graph end to end.
//!
//! ## Quick Start
//!
//! ```ignore
//! use montage::prelude::*;
//!
//! let engine = MontageEngine::builder().build()?;
//!
//! // Node graph mode
//! engine.load_description_json(FLOW_JSON)?;
//! engine.update_node_parameter(&"1".into(), FILE_KEY, EncodedAudio::wav(bytes))?;
//! let output = engine.run_pipeline().await?;
//!
//! // Linear mode
//! let track = engine.import_audio(EncodedAudio::new(webm, "audio/webm")).await?;
//! engine.trim_selected(Some(TrimRegion::new(1.0, 2.5)))?;
//! engine.fade_out_selected(None)?;
//! let location = engine.export_selected(ContainerFormat::Wav, &sink).await?;
//! ```
//!
//! ## Feature Flags
//!
//! - `compressed` (default) - MP3/Ogg/WebM/FLAC/MP4 decoding via symphonia

/// Re-export of montage-core for direct access
pub use montage_core as core;

pub use montage_core::graph;
pub use montage_core::{
    EffectRendering, EncodedAudio, MergeNormalization, MergeStrategy, MontageConfig,
    SampleBuffer,
};

/// Re-export of montage-dsp
pub use montage_dsp as dsp;

/// Re-export of montage-codec
pub use montage_codec as codec;

pub use montage_codec::{ContainerFormat, ContainerHint, FilterGraph, Transcoder};

/// Re-export of montage-session
pub use montage_session as session;

pub use montage_session::{CaptureSource, StopHandle, Track, TrackId, TrackOrigin, TrackSession};

mod error;
pub use error::{Error, PipelineError, Result};

mod context;
pub use context::EditContext;

pub mod export;
pub use export::{ExportError, ExportSink};

pub mod pipeline;
pub use pipeline::{PipelineExecutor, PipelineOutput, PipelineState};

mod builder;
mod engine;

pub use builder::MontageEngineBuilder;
pub use engine::MontageEngine;

/// Convenience prelude for common imports
pub mod prelude {
    // Main engine
    pub use crate::{MontageEngine, MontageEngineBuilder};

    // Data model
    pub use crate::core::graph::{
        Edge, GraphDescription, NodeId, NodeKind, FILE_KEY, INPUT_PORT, OUTPUT_PORT,
    };
    pub use crate::core::{EncodedAudio, MontageConfig, SampleBuffer};

    // Operators
    pub use crate::dsp::{EchoParams, TrimRegion};

    // Boundaries
    pub use crate::codec::{ContainerFormat, Transcoder};
    pub use crate::export::ExportSink;
    pub use crate::session::{stop_signal, CaptureSource};

    pub use crate::{Error, Result};
}
