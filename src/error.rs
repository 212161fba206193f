//! Centralized error type for the montage umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] montage_core::Error),

    #[error("Graph: {0}")]
    Graph(#[from] montage_core::GraphError),

    #[error("DSP: {0}")]
    Dsp(#[from] montage_dsp::Error),

    #[error("Codec: {0}")]
    Codec(#[from] montage_codec::CodecError),

    #[error("Session: {0}")]
    Session(#[from] montage_session::SessionError),

    #[error("Pipeline: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Export: {0}")]
    Export(#[from] crate::export::ExportError),

    #[error("Graph description: {0}")]
    Description(#[from] serde_json::Error),
}

/// Failures only the pipeline executor can report.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("No audio source found")]
    NoAudioSource,

    #[error("Fade out effect requires a trim node to compute audio duration")]
    MissingTrimForFadeOut,

    #[error("A pipeline run is already in progress")]
    AlreadyProcessing,

    #[error("Merging requires at least two audio sources, found {0}")]
    InsufficientSources(usize),

    #[error("Graph was edited while the pipeline was running")]
    GraphChanged,
}

pub type Result<T> = std::result::Result<T, Error>;
