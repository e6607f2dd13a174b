//! Read-only structural queries over the graph mirror.
//!
//! Each query takes the shared lock exactly once and runs to completion
//! while holding it. Two separate queries are two separate snapshots;
//! nothing is guaranteed to hold across them.

use petgraph::graph::NodeIndex;
use petgraph::visit::{Dfs, VisitMap, Visitable};
use std::collections::VecDeque;
use tracing::debug;

use super::store::{Adjacency, GraphStore};
use super::types::{InfluenceMetrics, NodeId};
use crate::error::{GraphError, Result};

impl GraphStore {
    /// In-degree, out-degree and normalized in-degree of `id`.
    pub fn influence(&self, id: NodeId) -> Result<InfluenceMetrics> {
        let adjacency = self.read();
        let idx = lookup(&adjacency, id)?;

        let in_degree = adjacency.in_degree_at(idx);
        let out_degree = adjacency.out_degree_at(idx);
        let total_nodes = adjacency.node_count();

        let normalized_in_degree = if total_nodes > 1 {
            in_degree as f64 / (total_nodes - 1) as f64
        } else {
            0.0
        };

        Ok(InfluenceMetrics {
            user_id: id,
            in_degree,
            out_degree,
            normalized_in_degree,
        })
    }

    /// Minimum-hop path from `src` to `dest`, both ends included.
    ///
    /// Breadth-first along outgoing edges. Among equally short paths the
    /// one found first wins, where each node's successors are explored in
    /// edge-insertion order.
    pub fn shortest_path(&self, src: NodeId, dest: NodeId) -> Result<Vec<NodeId>> {
        let adjacency = self.read();
        let start = lookup(&adjacency, src)?;
        let goal = lookup(&adjacency, dest)?;

        if start == goal {
            return Ok(vec![src]);
        }

        let graph = adjacency.inner_graph();
        let mut visited = graph.visit_map();
        let mut parent: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
        let mut queue = VecDeque::from([start]);
        visited.visit(start);

        while let Some(current) = queue.pop_front() {
            for next in adjacency.successors(current) {
                if !visited.visit(next) {
                    continue;
                }
                parent[next.index()] = Some(current);
                if next == goal {
                    let path = reconstruct_path(&adjacency, &parent, goal);
                    debug!(src, dest, hops = path.len() - 1, "shortest path found");
                    return Ok(path);
                }
                queue.push_back(next);
            }
        }

        Err(GraphError::NoPath {
            from: src,
            to: dest,
        })
    }

    /// Distinct nodes reachable from `id` in 1 to `depth` hops.
    ///
    /// The origin is never included. Results are in breadth-first
    /// discovery order; a node is reported at the first hop it is reached.
    pub fn connections_within_depth(&self, id: NodeId, depth: usize) -> Result<Vec<NodeId>> {
        if depth == 0 {
            return Err(GraphError::InvalidArgument(
                "depth must be at least 1".to_string(),
            ));
        }

        let adjacency = self.read();
        let origin = lookup(&adjacency, id)?;

        let mut visited = adjacency.inner_graph().visit_map();
        let mut queue: VecDeque<(NodeIndex, usize)> = VecDeque::from([(origin, 0)]);
        let mut found = Vec::new();
        visited.visit(origin);

        while let Some((current, hops)) = queue.pop_front() {
            if hops == depth {
                continue;
            }
            for next in adjacency.successors(current) {
                if visited.visit(next) {
                    found.push(adjacency.id_of(next));
                    queue.push_back((next, hops + 1));
                }
            }
        }

        Ok(found)
    }

    /// The `limit` nodes with the highest in-degree.
    ///
    /// Nodes with no inbound edges take part with in-degree 0. Ties are
    /// broken by ascending node id, so the result is reproducible. Returns
    /// `min(limit, node_count)` ids.
    pub fn top_influencers(&self, limit: usize) -> Result<Vec<NodeId>> {
        if limit == 0 {
            return Err(GraphError::InvalidArgument(
                "limit must be at least 1".to_string(),
            ));
        }

        let adjacency = self.read();
        let mut ranked = rank_by_in_degree(&adjacency);
        ranked.truncate(limit);
        Ok(ranked.into_iter().map(|(id, _)| id).collect())
    }

    /// Number of depth-first traversal starts needed to visit every node.
    ///
    /// Traversals follow outgoing edges only and start from each
    /// not-yet-visited node in node insertion order. This counts
    /// directed-reachability groups, not weakly connected components:
    /// `{2 -> 1}` inserted as 1 then 2 counts as two.
    pub fn connected_components(&self) -> usize {
        let adjacency = self.read();
        let graph = adjacency.inner_graph();

        // Dfs keeps its own heap stack, and its discovered set survives move_to.
        let mut dfs = Dfs::empty(graph);
        let mut components = 0;

        for start in graph.node_indices() {
            if dfs.discovered.is_visited(&start) {
                continue;
            }
            dfs.move_to(start);
            while dfs.next(graph).is_some() {}
            components += 1;
        }

        components
    }
}

fn lookup(adjacency: &Adjacency, id: NodeId) -> Result<NodeIndex> {
    adjacency
        .node_index(id)
        .ok_or(GraphError::NodeNotFound(id))
}

fn reconstruct_path(
    adjacency: &Adjacency,
    parent: &[Option<NodeIndex>],
    goal: NodeIndex,
) -> Vec<NodeId> {
    let mut path = vec![adjacency.id_of(goal)];
    let mut at = goal;
    while let Some(prev) = parent[at.index()] {
        path.push(adjacency.id_of(prev));
        at = prev;
    }
    path.reverse();
    path
}

/// Every node paired with its in-degree, highest first, ties by id.
fn rank_by_in_degree(adjacency: &Adjacency) -> Vec<(NodeId, usize)> {
    let graph = adjacency.inner_graph();

    let mut in_degree = vec![0usize; graph.node_count()];
    for edge in graph.raw_edges() {
        in_degree[edge.target().index()] += 1;
    }

    let mut ranked: Vec<(NodeId, usize)> = graph
        .node_indices()
        .map(|idx| (graph[idx], in_degree[idx.index()]))
        .collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}
