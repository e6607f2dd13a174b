//! The concurrent adjacency store.
//!
//! Uses petgraph to hold the directed graph and a single reader-writer
//! lock over the whole structure. Mutations take the lock exclusively,
//! reads take it shared, and every multi-step read happens inside one
//! acquisition so it sees one consistent version of the graph.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

use super::types::{Edge, GraphStats, NodeId};

/// The unlocked adjacency: a petgraph digraph plus an id -> index lookup.
///
/// Successors of a node are kept in edge-insertion order (see
/// [`Adjacency::successors`]). Parallel edges are kept as-is.
#[derive(Debug, Default)]
pub(crate) struct Adjacency {
    /// The directed graph. Node weights are the external node ids.
    graph: DiGraph<NodeId, ()>,
    /// Index: node id -> node index.
    index: HashMap<NodeId, NodeIndex>,
}

impl Adjacency {
    /// Build a complete adjacency from a node and edge enumeration.
    ///
    /// Nodes are inserted in enumeration order, then edges in enumeration
    /// order. Edge endpoints missing from `nodes` are created on the fly.
    pub(crate) fn build(nodes: &[NodeId], edges: &[Edge]) -> Self {
        let mut adjacency = Self {
            graph: DiGraph::with_capacity(nodes.len(), edges.len()),
            index: HashMap::with_capacity(nodes.len()),
        };
        for &id in nodes {
            adjacency.ensure_node(id);
        }
        for edge in edges {
            adjacency.add_edge(edge.from, edge.to);
        }
        adjacency
    }

    // ─── Mutation ───────────────────────────────────────────────

    /// Return the index of `id`, inserting it if absent.
    pub(crate) fn ensure_node(&mut self, id: NodeId) -> NodeIndex {
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.index.insert(id, idx);
        idx
    }

    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId) {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        self.graph.add_edge(a, b, ());
    }

    // ─── Lookup ─────────────────────────────────────────────────

    pub(crate) fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.index.get(&id).copied()
    }

    /// External id stored at `idx`.
    pub(crate) fn id_of(&self, idx: NodeIndex) -> NodeId {
        self.graph[idx]
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    pub(crate) fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub(crate) fn out_degree_at(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Outgoing).count()
    }

    pub(crate) fn in_degree_at(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Incoming).count()
    }

    /// Successors of `idx` in edge-insertion order, duplicates included.
    ///
    /// petgraph walks a node's outgoing edge list newest-first, so the
    /// collected list is reversed.
    pub(crate) fn successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        out.reverse();
        out
    }

    /// Access the underlying petgraph (for whole-graph traversals).
    pub(crate) fn inner_graph(&self) -> &DiGraph<NodeId, ()> {
        &self.graph
    }
}

/// The shared, lock-guarded graph mirror.
///
/// Wrap in an `Arc` to share between request threads. Every method takes
/// `&self`; writers are linearized by the exclusive lock.
#[derive(Debug, Default)]
pub struct GraphStore {
    inner: RwLock<Adjacency>,
}

impl GraphStore {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_adjacency(adjacency: Adjacency) -> Self {
        Self {
            inner: RwLock::new(adjacency),
        }
    }

    /// Shared acquisition. Writers only ever append or swap in a fully
    /// built adjacency, so a poisoned lock still guards a usable graph.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Adjacency> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Adjacency> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── Mutations ──────────────────────────────────────────────

    /// Ensure `id` is present. No-op if it already is.
    pub fn add_node(&self, id: NodeId) {
        self.write().ensure_node(id);
    }

    /// Append `from -> to`, creating either endpoint if missing.
    ///
    /// Repeated calls with the same pair add parallel edges.
    pub fn add_edge(&self, from: NodeId, to: NodeId) {
        self.write().add_edge(from, to);
    }

    /// Discard the current content and install a graph built from
    /// `nodes` and `edges`.
    ///
    /// The replacement is assembled before the lock is taken; readers see
    /// either the old graph or the new one, never anything in between.
    pub fn replace(&self, nodes: &[NodeId], edges: &[Edge]) {
        let replacement = Adjacency::build(nodes, edges);
        self.install(replacement);
    }

    pub(crate) fn install(&self, replacement: Adjacency) {
        let stats = GraphStats {
            node_count: replacement.node_count(),
            edge_count: replacement.edge_count(),
        };
        let previous = {
            let mut guard = self.write();
            std::mem::replace(&mut *guard, replacement)
        };
        // previous is dropped here, after the lock is released
        debug!(
            previous_nodes = previous.node_count(),
            previous_edges = previous.edge_count(),
            "discarding previous adjacency"
        );
        info!(nodes = stats.node_count, edges = stats.edge_count, "graph installed");
    }

    // ─── Reads ──────────────────────────────────────────────────

    pub fn has_node(&self, id: NodeId) -> bool {
        self.read().contains(id)
    }

    pub fn node_count(&self) -> usize {
        self.read().node_count()
    }

    /// Total number of edges, parallel edges counted individually.
    pub fn edge_count(&self) -> usize {
        self.read().edge_count()
    }

    /// Number of outgoing edges of `id`.
    ///
    /// Returns 0 both for an absent node and for a node with no outgoing
    /// edges; use [`GraphStore::has_node`] or [`GraphStore::successors`]
    /// to tell them apart.
    pub fn out_degree(&self, id: NodeId) -> usize {
        let adjacency = self.read();
        adjacency
            .node_index(id)
            .map(|idx| adjacency.out_degree_at(idx))
            .unwrap_or(0)
    }

    /// Successor ids of `id` in insertion order, or `None` if absent.
    pub fn successors(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let adjacency = self.read();
        let idx = adjacency.node_index(id)?;
        Some(
            adjacency
                .successors(idx)
                .into_iter()
                .map(|s| adjacency.id_of(s))
                .collect(),
        )
    }

    /// Node and edge counts from one consistent snapshot.
    pub fn stats(&self) -> GraphStats {
        let adjacency = self.read();
        GraphStats {
            node_count: adjacency.node_count(),
            edge_count: adjacency.edge_count(),
        }
    }
}
