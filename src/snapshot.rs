//! File-backed graph source.
//!
//! Reads the bulk-import document the surrounding service accepts
//! (`users` + `connections`) as JSON or YAML. Only ids are used here;
//! the identity fields are carried through untouched.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::graph::{Edge, GraphSource, NodeId};

/// A user row. Only `id` matters to the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotUser {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: String,
}

/// A connection row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConnection {
    pub from_user_id: NodeId,
    pub to_user_id: NodeId,
}

impl From<SnapshotConnection> for Edge {
    fn from(c: SnapshotConnection) -> Self {
        Edge::new(c.from_user_id, c.to_user_id)
    }
}

/// A decoded bulk-import document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<SnapshotUser>,
    #[serde(default)]
    pub connections: Vec<SnapshotConnection>,
}

impl Snapshot {
    /// Connections whose endpoints are not listed in `users`.
    pub fn dangling_connections(&self) -> usize {
        let known: HashSet<NodeId> = self.users.iter().map(|u| u.id).collect();
        self.connections
            .iter()
            .filter(|c| !known.contains(&c.from_user_id) || !known.contains(&c.to_user_id))
            .count()
    }
}

impl GraphSource for Snapshot {
    fn node_ids(&self) -> Result<Vec<NodeId>> {
        Ok(self.users.iter().map(|u| u.id).collect())
    }

    fn edges(&self) -> Result<Vec<Edge>> {
        Ok(self.connections.iter().copied().map(Edge::from).collect())
    }
}

/// Encoding of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// `.yaml` / `.yml` are YAML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SnapshotFormat::Yaml
            }
            _ => SnapshotFormat::Json,
        }
    }
}

/// A [`GraphSource`] that reads a snapshot file.
///
/// Every load reads the file once, so the nodes and edges it installs
/// always come from the same version of the file.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    path: PathBuf,
    format: SnapshotFormat,
}

impl SnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = SnapshotFormat::from_path(&path);
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    /// Read and decode the snapshot file.
    pub fn read(&self) -> Result<Snapshot> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            GraphError::SourceUnavailable(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let snapshot: Snapshot = match self.format {
            SnapshotFormat::Json => serde_json::from_str(&text)
                .map_err(|e| decode_error(&self.path, e))?,
            SnapshotFormat::Yaml => serde_yaml::from_str(&text)
                .map_err(|e| decode_error(&self.path, e))?,
        };

        let dangling = snapshot.dangling_connections();
        if dangling > 0 {
            warn!(
                path = %self.path.display(),
                dangling,
                "snapshot has connections to unlisted users; endpoints will be created"
            );
        }
        debug!(
            path = %self.path.display(),
            users = snapshot.users.len(),
            connections = snapshot.connections.len(),
            "snapshot read"
        );
        Ok(snapshot)
    }
}

fn decode_error(path: &Path, e: impl std::fmt::Display) -> GraphError {
    GraphError::Internal(format!("cannot decode {}: {}", path.display(), e))
}

impl GraphSource for SnapshotSource {
    fn node_ids(&self) -> Result<Vec<NodeId>> {
        self.read()?.node_ids()
    }

    fn edges(&self) -> Result<Vec<Edge>> {
        self.read()?.edges()
    }

    fn enumerate(&self) -> Result<(Vec<NodeId>, Vec<Edge>)> {
        self.read()?.enumerate()
    }
}
