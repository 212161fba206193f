//! Directed connections between node ports.

use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// The single output port every producing node exposes.
pub const OUTPUT_PORT: &str = "out";

/// The single input port of Trim, Effect and Output nodes.
pub const INPUT_PORT: &str = "in";

fn default_output_port() -> String {
    OUTPUT_PORT.to_string()
}

fn default_input_port() -> String {
    INPUT_PORT.to_string()
}

/// Directed edge `(source, source_port) -> (target, target_port)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub source: NodeId,
    #[serde(default = "default_output_port")]
    pub source_port: String,
    pub target: NodeId,
    #[serde(default = "default_input_port")]
    pub target_port: String,
}

impl Edge {
    pub fn new(
        source: impl Into<NodeId>,
        source_port: impl Into<String>,
        target: impl Into<NodeId>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_port: source_port.into(),
            target: target.into(),
            target_port: target_port.into(),
        }
    }

    /// Edge between the default ports.
    pub fn simple(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self::new(source, OUTPUT_PORT, target, INPUT_PORT)
    }

    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }
}
