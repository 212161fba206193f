//! Serializable graph descriptions exchanged with the UI.

use super::params::value_from_json;
use super::{Edge, Graph, NodeId, NodeKind, NodeParams};
use crate::GraphError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `{id, kind, parameters}` as sent by the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Whether audio is attached. Audio itself never travels in a description.
    #[serde(default)]
    pub has_audio: bool,
}

/// Nodes and edges of a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDescription {
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphDescription {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Graph {
    /// Build a graph from a description.
    ///
    /// Nothing is returned unless every node, parameter and edge is valid.
    pub fn from_description(description: &GraphDescription) -> Result<Self, GraphError> {
        let mut graph = Graph::new();

        for descriptor in &description.nodes {
            graph.insert_node(descriptor.id.clone(), NodeParams::defaults(descriptor.kind))?;
            for (key, value) in &descriptor.parameters {
                let value = value_from_json(key, value)?;
                graph.update_node_parameter(&descriptor.id, key, value)?;
            }
        }

        for edge in &description.edges {
            graph.connect(&edge.source, &edge.source_port, &edge.target, &edge.target_port)?;
        }

        Ok(graph)
    }

    pub fn to_description(&self) -> GraphDescription {
        GraphDescription {
            nodes: self
                .nodes()
                .iter()
                .map(|node| NodeDescriptor {
                    id: node.id().clone(),
                    kind: node.kind(),
                    parameters: node.params().to_json(),
                    has_audio: node.resolved().is_some(),
                })
                .collect(),
            edges: self.edges().to_vec(),
        }
    }
}
