//! Graph nodes.

use super::params::NodeParams;
use crate::{EncodedAudio, SampleBuffer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Unique, stable node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Input,
    Record,
    Trim,
    Effect,
    Merge,
    Output,
}

impl NodeKind {
    /// Number of input ports; `None` means any number of named ports.
    pub fn input_ports(&self) -> Option<usize> {
        match self {
            NodeKind::Input | NodeKind::Record => Some(0),
            NodeKind::Trim | NodeKind::Effect | NodeKind::Output => Some(1),
            NodeKind::Merge => None,
        }
    }

    pub fn has_output(&self) -> bool {
        !matches!(self, NodeKind::Output)
    }

    /// Input and Record nodes carry source audio.
    pub fn is_source(&self) -> bool {
        matches!(self, NodeKind::Input | NodeKind::Record)
    }
}

/// Audio attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAudio {
    /// Source bytes on an Input or Record node.
    Encoded(EncodedAudio),
    /// Rendered result on an Output node.
    Decoded(Arc<SampleBuffer>),
}

impl ResolvedAudio {
    pub fn as_encoded(&self) -> Option<&EncodedAudio> {
        match self {
            ResolvedAudio::Encoded(audio) => Some(audio),
            ResolvedAudio::Decoded(_) => None,
        }
    }

    pub fn as_decoded(&self) -> Option<&Arc<SampleBuffer>> {
        match self {
            ResolvedAudio::Decoded(buffer) => Some(buffer),
            ResolvedAudio::Encoded(_) => None,
        }
    }
}

/// A typed unit of work in the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    params: NodeParams,
    resolved: Option<ResolvedAudio>,
}

impl Node {
    pub(crate) fn new(id: NodeId, params: NodeParams) -> Self {
        Self {
            id,
            params,
            resolved: None,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.params.kind()
    }

    pub fn params(&self) -> &NodeParams {
        &self.params
    }

    pub fn resolved(&self) -> Option<&ResolvedAudio> {
        self.resolved.as_ref()
    }

    /// Source bytes, if this is an Input/Record node with a file attached.
    pub fn source_audio(&self) -> Option<&EncodedAudio> {
        self.resolved.as_ref().and_then(ResolvedAudio::as_encoded)
    }

    pub(crate) fn params_mut(&mut self) -> &mut NodeParams {
        &mut self.params
    }

    pub(crate) fn set_resolved(&mut self, audio: Option<ResolvedAudio>) {
        self.resolved = audio;
    }
}
