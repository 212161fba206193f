//! Node graph model.
//!
//! A [`Graph`] is an insertion-ordered set of typed [`Node`]s plus a set of
//! [`Edge`]s. Nodes carry pure parameter records; the UI mutates them through
//! [`Graph::update_node_parameter`] rather than holding callbacks.
//!
//! ```ignore
//! let mut graph = Graph::new();
//! let input = graph.add_node(NodeKind::Input);
//! let output = graph.add_node(NodeKind::Output);
//! graph.connect(&input, OUTPUT_PORT, &output, INPUT_PORT)?;
//! graph.update_node_parameter(&input, "file", EncodedAudio::wav(bytes).into())?;
//! let topology = graph.validate()?;
//! ```

mod description;
mod edge;
mod node;
mod params;
mod time;
mod validate;

pub use description::{GraphDescription, NodeDescriptor};
pub use edge::{Edge, INPUT_PORT, OUTPUT_PORT};
pub use node::{Node, NodeId, NodeKind, ResolvedAudio};
pub use params::{parse_seconds, EffectName, NodeParams, ParamValue, FILE_KEY};
pub use time::time_str_to_seconds;
pub use validate::Topology;

use crate::GraphError;
use tracing::debug;

/// Directed audio-processing graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_id: u64,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a node with default parameters and a fresh id.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.fresh_id();
        debug!(node = %id, ?kind, "add node");
        self.nodes
            .push(Node::new(id.clone(), NodeParams::defaults(kind)));
        id
    }

    /// Insert a node under a caller-chosen id.
    pub fn insert_node(&mut self, id: NodeId, params: NodeParams) -> Result<(), GraphError> {
        if self.contains(&id) {
            return Err(GraphError::DuplicateNode(id.to_string()));
        }
        if let Ok(numeric) = id.as_str().parse::<u64>() {
            self.next_id = self.next_id.max(numeric.saturating_add(1));
        }
        self.nodes.push(Node::new(id, params));
        Ok(())
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.iter().any(|n| n.id() == id)
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes of one kind, in insertion order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    pub fn first_of_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.nodes_of_kind(kind).next()
    }

    /// Edges arriving at `id`.
    pub fn incoming(&self, id: &NodeId) -> impl Iterator<Item = &Edge> {
        let id = id.clone();
        self.edges.iter().filter(move |e| e.target == id)
    }

    /// Connect `source`'s output to `target_port` on `target`.
    ///
    /// Connecting an edge that already exists is a no-op.
    pub fn connect(
        &mut self,
        source: &NodeId,
        source_port: &str,
        target: &NodeId,
        target_port: &str,
    ) -> Result<(), GraphError> {
        let source_kind = self
            .node(source)
            .ok_or_else(|| GraphError::DanglingReference(source.to_string()))?
            .kind();
        let target_kind = self
            .node(target)
            .ok_or_else(|| GraphError::DanglingReference(target.to_string()))?
            .kind();

        if !source_kind.has_output() || source_port != OUTPUT_PORT {
            return Err(GraphError::InvalidPort {
                node: source.to_string(),
                port: source_port.to_string(),
            });
        }

        let valid_target_port = match target_kind.input_ports() {
            Some(0) => false,
            Some(_) => target_port == INPUT_PORT,
            None => !target_port.is_empty(),
        };
        if !valid_target_port {
            return Err(GraphError::InvalidPort {
                node: target.to_string(),
                port: target_port.to_string(),
            });
        }

        let edge = Edge::new(source.clone(), source_port, target.clone(), target_port);
        if self.edges.contains(&edge) {
            return Ok(());
        }

        if target_kind != NodeKind::Merge
            && self
                .incoming(target)
                .any(|e| e.target_port == target_port)
        {
            return Err(GraphError::PortOccupied {
                node: target.to_string(),
                port: target_port.to_string(),
            });
        }

        debug!(%source, %target, port = target_port, "connect");
        self.edges.push(edge);
        Ok(())
    }

    /// Remove an edge. Returns whether it existed.
    pub fn disconnect(&mut self, edge: &Edge) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e != edge);
        before != self.edges.len()
    }

    /// Update one parameter of a node.
    ///
    /// The `file` key attaches source audio to Input/Record nodes.
    pub fn update_node_parameter(
        &mut self,
        id: &NodeId,
        key: &str,
        value: ParamValue,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;

        if !node.params().has_key(key) {
            return Err(GraphError::UnknownParameter {
                node: id.to_string(),
                key: key.to_string(),
            });
        }

        if key == FILE_KEY {
            let ParamValue::Audio(audio) = value else {
                return Err(GraphError::InvalidParameter {
                    key: key.to_string(),
                    reason: "expected encoded audio".into(),
                });
            };
            debug!(node = %id, mime = audio.mime(), len = audio.len(), "attach source audio");
            node.set_resolved(Some(ResolvedAudio::Encoded(audio)));
            return Ok(());
        }

        node.params_mut().set(key, &value)
    }

    /// Record the rendered result on an Output node.
    pub fn set_output_audio(
        &mut self,
        id: &NodeId,
        audio: ResolvedAudio,
    ) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id() == id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
        if node.kind() != NodeKind::Output {
            return Err(GraphError::InvalidParameter {
                key: "output".into(),
                reason: format!("node '{}' is not an Output node", id),
            });
        }
        node.set_resolved(Some(audio));
        Ok(())
    }

    /// Remove a node together with every edge touching it.
    pub fn delete_node(&mut self, id: &NodeId) -> Result<Node, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id() == id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
        self.edges.retain(|e| !e.touches(id));
        debug!(node = %id, "delete node");
        Ok(self.nodes.remove(index))
    }

    fn fresh_id(&mut self) -> NodeId {
        loop {
            let id = NodeId::new(self.next_id.to_string());
            self.next_id += 1;
            if !self.contains(&id) {
                return id;
            }
        }
    }
}
