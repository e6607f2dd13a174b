//! Graph loader: builds or rebuilds the mirror from the authoritative store.
//!
//! Both entry points enumerate the source completely before any lock is
//! taken. A failed enumeration returns the error and installs nothing.

use tracing::{info, warn};

use super::store::{Adjacency, GraphStore};
use super::types::{Edge, NodeId};
use crate::error::Result;

/// A one-shot enumeration of the authoritative node and edge sets.
///
/// Each method is called once per load. Implementations report an
/// incomplete enumeration as [`GraphError::SourceUnavailable`] and a
/// record that cannot be decoded as [`GraphError::Internal`].
///
/// [`GraphError::SourceUnavailable`]: crate::GraphError::SourceUnavailable
/// [`GraphError::Internal`]: crate::GraphError::Internal
pub trait GraphSource {
    /// Every node id in the store.
    fn node_ids(&self) -> Result<Vec<NodeId>>;

    /// Every directed edge in the store.
    fn edges(&self) -> Result<Vec<Edge>>;

    /// Nodes and edges of one load, taken from a single view of the store.
    ///
    /// Sources whose two enumerations could observe different versions
    /// override this to read once.
    fn enumerate(&self) -> Result<(Vec<NodeId>, Vec<Edge>)> {
        Ok((self.node_ids()?, self.edges()?))
    }
}

/// A [`GraphSource`] over rows the caller has already fetched.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    nodes: Vec<NodeId>,
    edges: Vec<Edge>,
}

impl MemorySource {
    pub fn new(nodes: Vec<NodeId>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }
}

impl GraphSource for MemorySource {
    fn node_ids(&self) -> Result<Vec<NodeId>> {
        Ok(self.nodes.clone())
    }

    fn edges(&self) -> Result<Vec<Edge>> {
        Ok(self.edges.clone())
    }
}

/// Enumerate `source` and assemble an unlocked adjacency from it.
fn fetch_and_build(source: &dyn GraphSource) -> Result<Adjacency> {
    let (nodes, edges) = source.enumerate()?;
    Ok(Adjacency::build(&nodes, &edges))
}

/// Build a brand-new store from `source`.
///
/// Returns an empty store when the source is empty. Never touches any
/// existing store.
pub fn load_graph(source: &dyn GraphSource) -> Result<GraphStore> {
    let adjacency = fetch_and_build(source)?;
    info!(
        nodes = adjacency.node_count(),
        edges = adjacency.edge_count(),
        "graph loaded"
    );
    Ok(GraphStore::from_adjacency(adjacency))
}

/// Rebuild `store` from `source` and swap the result in atomically.
///
/// On error the live graph is left exactly as it was.
pub fn reload_graph(store: &GraphStore, source: &dyn GraphSource) -> Result<()> {
    let adjacency = match fetch_and_build(source) {
        Ok(adjacency) => adjacency,
        Err(e) => {
            warn!(error = %e, "reload aborted, keeping current graph");
            return Err(e);
        }
    };
    store.install(adjacency);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use std::cell::Cell;

    /// Fails on the edge enumeration after a successful node enumeration.
    struct BrokenSource {
        node_calls: Cell<usize>,
    }

    impl GraphSource for BrokenSource {
        fn node_ids(&self) -> Result<Vec<NodeId>> {
            self.node_calls.set(self.node_calls.get() + 1);
            Ok(vec![100, 200])
        }

        fn edges(&self) -> Result<Vec<Edge>> {
            Err(GraphError::SourceUnavailable(
                "connection reset while reading connections".to_string(),
            ))
        }
    }

    /// Reads both sets in one go and rejects the per-set calls.
    struct OneShotSource {
        reads: Cell<usize>,
    }

    impl GraphSource for OneShotSource {
        fn node_ids(&self) -> Result<Vec<NodeId>> {
            Err(GraphError::Internal("node_ids called separately".to_string()))
        }

        fn edges(&self) -> Result<Vec<Edge>> {
            Err(GraphError::Internal("edges called separately".to_string()))
        }

        fn enumerate(&self) -> Result<(Vec<NodeId>, Vec<Edge>)> {
            self.reads.set(self.reads.get() + 1);
            Ok((vec![1, 2], vec![Edge::new(1, 2)]))
        }
    }

    #[test]
    fn test_load_graph() {
        let source = MemorySource::new(
            vec![1, 2, 3],
            vec![Edge::new(1, 2), Edge::new(3, 2), Edge::new(1, 2)],
        );
        let store = load_graph(&source).unwrap();
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 3);
        assert_eq!(store.influence(2).unwrap().in_degree, 3);
    }

    #[test]
    fn test_load_empty_source() {
        let store = load_graph(&MemorySource::default()).unwrap();
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_load_creates_unlisted_endpoints() {
        let source = MemorySource::new(vec![1], vec![Edge::new(1, 2)]);
        let store = load_graph(&source).unwrap();
        assert!(store.has_node(2));
        assert_eq!(store.shortest_path(1, 2).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_load_failure_surfaces_error() {
        let source = BrokenSource {
            node_calls: Cell::new(0),
        };
        let err = load_graph(&source).unwrap_err();
        assert!(matches!(err, GraphError::SourceUnavailable(_)));
        assert_eq!(source.node_calls.get(), 1);
    }

    #[test]
    fn test_load_leaves_existing_store_alone() {
        let existing = GraphStore::new();
        existing.add_edge(1, 2);
        let fresh = load_graph(&MemorySource::new(vec![9], vec![])).unwrap();
        assert_eq!(existing.node_count(), 2);
        assert_eq!(fresh.node_count(), 1);
    }

    #[test]
    fn test_reload_replaces_content() {
        let store = GraphStore::new();
        store.add_edge(1, 2);
        store.add_edge(2, 3);

        let source = MemorySource::new(vec![10, 11], vec![Edge::new(10, 11)]);
        reload_graph(&store, &source).unwrap();

        assert!(!store.has_node(1));
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.successors(10), Some(vec![11]));
    }

    #[test]
    fn test_failed_reload_keeps_previous_graph() {
        let store = GraphStore::new();
        store.add_edge(1, 2);
        store.add_edge(2, 3);
        let before = store.stats();

        let source = BrokenSource {
            node_calls: Cell::new(0),
        };
        let err = reload_graph(&store, &source).unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::SourceUnavailable);
        assert_eq!(store.stats(), before);
        assert_eq!(store.shortest_path(1, 3).unwrap(), vec![1, 2, 3]);
        assert!(!store.has_node(100));
    }

    #[test]
    fn test_load_and_reload_enumerate_once() {
        let source = OneShotSource {
            reads: Cell::new(0),
        };
        let store = load_graph(&source).unwrap();
        assert_eq!(source.reads.get(), 1);
        assert_eq!(store.edge_count(), 1);

        reload_graph(&store, &source).unwrap();
        assert_eq!(source.reads.get(), 2);
        assert_eq!(store.successors(1), Some(vec![2]));
    }

    #[test]
    fn test_reload_converges_after_incremental_updates() {
        let source = MemorySource::new(vec![1, 2, 3], vec![Edge::new(1, 2)]);
        let store = load_graph(&source).unwrap();

        // incremental write that the authoritative store never committed
        store.add_edge(3, 4);
        assert_eq!(store.node_count(), 4);

        reload_graph(&store, &source).unwrap();
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 1);
    }
}
