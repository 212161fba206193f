//! Core data model for the Montage audio editor.
//!
//! # Primary API
//!
//! - [`SampleBuffer`]: canonical decoded audio (planar `f32`, fixed sample rate)
//! - [`EncodedAudio`]: opaque encoded bytes tagged with a MIME-like type
//! - [`graph::Graph`]: node graph model (nodes, ports, edges, validation)
//! - [`MontageConfig`]: editing session configuration
//!
//! # Example
//!
//! ```ignore
//! use montage_core::graph::{Graph, NodeKind, INPUT_PORT, OUTPUT_PORT};
//!
//! let mut graph = Graph::new();
//! let input = graph.add_node(NodeKind::Input);
//! let output = graph.add_node(NodeKind::Output);
//! graph.connect(&input, OUTPUT_PORT, &output, INPUT_PORT)?;
//! graph.validate()?;
//! ```

pub mod error;
pub use error::{Error, GraphError, Result};

mod audio;
pub use audio::EncodedAudio;

mod buffer;
pub use buffer::SampleBuffer;

mod config;
pub use config::{EffectRendering, MergeNormalization, MergeStrategy, MontageConfig};

pub mod graph;
