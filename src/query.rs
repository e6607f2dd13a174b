//! Query API: the calls the service layer makes, with serializable results.
//!
//! Each function wraps one graph query and shapes its result into the
//! payload the service returns to clients.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{GraphStore, InfluenceMetrics, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_nodes: usize,
    pub total_edges: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResponse {
    pub from: NodeId,
    pub to: NodeId,
    pub path: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionsResponse {
    pub user_id: NodeId,
    pub connections: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopInfluencersResponse {
    pub top_influencers: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentsResponse {
    pub components: usize,
}

/// Node and edge totals.
pub fn graph_stats(store: &GraphStore) -> StatsResponse {
    let stats = store.stats();
    StatsResponse {
        total_nodes: stats.node_count,
        total_edges: stats.edge_count,
    }
}

pub fn user_influence(store: &GraphStore, user_id: NodeId) -> Result<InfluenceMetrics> {
    store.influence(user_id)
}

pub fn shortest_path(store: &GraphStore, from: NodeId, to: NodeId) -> Result<PathResponse> {
    let path = store.shortest_path(from, to)?;
    Ok(PathResponse { from, to, path })
}

pub fn connections(store: &GraphStore, user_id: NodeId, depth: usize) -> Result<ConnectionsResponse> {
    let connections = store.connections_within_depth(user_id, depth)?;
    Ok(ConnectionsResponse {
        user_id,
        connections,
    })
}

pub fn top_influencers(store: &GraphStore, limit: usize) -> Result<TopInfluencersResponse> {
    Ok(TopInfluencersResponse {
        top_influencers: store.top_influencers(limit)?,
    })
}

pub fn components(store: &GraphStore) -> ComponentsResponse {
    ComponentsResponse {
        components: store.connected_components(),
    }
}
