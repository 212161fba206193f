//! Graph validation before execution.

use super::{Graph, NodeId, NodeKind};
use crate::GraphError;
use std::collections::{HashMap, VecDeque};

/// Result of a successful validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub output: NodeId,
    pub merge: Option<NodeId>,
    /// Nodes in data-flow order.
    pub order: Vec<NodeId>,
}

impl Graph {
    /// Check the graph can be executed.
    ///
    /// Requires exactly one Output node, at most one Merge node and an acyclic
    /// data flow.
    pub fn validate(&self) -> Result<Topology, GraphError> {
        let mut outputs = self.nodes_of_kind(NodeKind::Output);
        let output = outputs.next().ok_or(GraphError::MissingOutput)?;
        if outputs.next().is_some() {
            return Err(GraphError::AmbiguousTopology(
                "more than one Output node".into(),
            ));
        }

        let mut merges = self.nodes_of_kind(NodeKind::Merge);
        let merge = merges.next().map(|n| n.id().clone());
        if merges.next().is_some() {
            return Err(GraphError::AmbiguousTopology(
                "more than one Merge node".into(),
            ));
        }

        for edge in &self.edges {
            for id in [&edge.source, &edge.target] {
                if !self.contains(id) {
                    return Err(GraphError::DanglingReference(id.to_string()));
                }
            }
        }

        let order = self.topological_order()?;

        Ok(Topology {
            output: output.id().clone(),
            merge,
            order,
        })
    }

    /// Kahn's algorithm; ties resolved by insertion order.
    fn topological_order(&self) -> Result<Vec<NodeId>, GraphError> {
        let mut in_degree: HashMap<&NodeId, usize> =
            self.nodes.iter().map(|n| (n.id(), 0)).collect();
        for edge in &self.edges {
            if let Some(count) = in_degree.get_mut(&edge.target) {
                *count += 1;
            }
        }

        let mut ready: VecDeque<&NodeId> = self
            .nodes
            .iter()
            .map(|n| n.id())
            .filter(|id| in_degree[id] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = ready.pop_front() {
            order.push(id.clone());
            for edge in self.edges.iter().filter(|e| &e.source == id) {
                if let Some(count) = in_degree.get_mut(&edge.target) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(&edge.target);
                    }
                }
            }
        }

        if order.len() != self.nodes.len() {
            return Err(GraphError::CycleDetected);
        }
        Ok(order)
    }
}
