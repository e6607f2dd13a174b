//! Core types for the social graph mirror.
//!
//! Nodes carry nothing but their id; name, email and the rest of the
//! identity record live in the authoritative store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node (a user account id from the authoritative store).
pub type NodeId = i64;

/// A directed connection `from -> to`.
///
/// Edges have no identity of their own. Two edges with the same endpoints
/// are indistinguishable and both count toward degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

impl From<(NodeId, NodeId)> for Edge {
    fn from((from, to): (NodeId, NodeId)) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Degree-based influence of a single node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceMetrics {
    pub user_id: NodeId,
    pub in_degree: usize,
    pub out_degree: usize,
    /// `in_degree / (node_count - 1)`, or 0 when the graph has at most one node.
    pub normalized_in_degree: f64,
}

/// Node and edge totals taken from a single snapshot of the graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes, {} edges", self.node_count, self.edge_count)
    }
}
