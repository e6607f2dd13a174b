//! # socialgraph
//!
//! An in-memory mirror of a relational users/connections store, answering
//! structural questions about it under concurrent access.
//!
//! The relational store stays authoritative. The mirror is built from a
//! full enumeration at startup, updated incrementally after each committed
//! write, and rebuilt wholesale after batch imports.
//!
//! ## Key Features
//!
//! - **Concurrent**: one reader-writer lock, many parallel readers
//! - **Atomic reloads**: a rebuilt graph is swapped in whole
//! - **Queries**: influence, shortest path, bounded reachability,
//!   top influencers, component count
//!
//! ## Quick Start
//!
//! ```rust
//! use socialgraph::{load_graph, Edge, MemorySource};
//!
//! let source = MemorySource::new(vec![1, 2, 3], vec![Edge::new(1, 2), Edge::new(2, 3)]);
//! let graph = load_graph(&source).unwrap();
//!
//! assert_eq!(graph.shortest_path(1, 3).unwrap(), vec![1, 2, 3]);
//! graph.add_edge(3, 1);
//! assert_eq!(graph.influence(1).unwrap().in_degree, 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod query;
pub mod server;
pub mod snapshot;
pub mod watcher;

// Re-exports for convenience
pub use error::{ErrorKind, GraphError, Result};

// Graph re-exports
pub use graph::{
    load_graph, reload_graph, Edge, GraphSource, GraphStats, GraphStore, InfluenceMetrics,
    MemorySource, NodeId,
};
pub use snapshot::{Snapshot, SnapshotSource};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn bulk_import_source() -> MemorySource {
        MemorySource::new(
            vec![1, 2, 3, 4, 5],
            vec![
                Edge::new(1, 2),
                Edge::new(2, 3),
                Edge::new(4, 5),
            ],
        )
    }

    #[test]
    fn test_service_lifecycle() {
        // startup
        let graph = Arc::new(load_graph(&bulk_import_source()).unwrap());
        assert_eq!(graph.connected_components(), 2);
        assert_eq!(graph.shortest_path(1, 3).unwrap(), vec![1, 2, 3]);
        assert!(graph.shortest_path(1, 5).unwrap_err().is_not_found());

        // committed writes mirrored incrementally
        graph.add_node(6);
        graph.add_edge(3, 4);
        assert_eq!(graph.shortest_path(1, 5).unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(graph.connected_components(), 2);

        // batch import followed by a reload
        let imported = MemorySource::new(
            vec![1, 2, 3, 4, 5, 6, 7],
            vec![
                Edge::new(1, 2),
                Edge::new(2, 3),
                Edge::new(3, 4),
                Edge::new(4, 5),
                Edge::new(6, 2),
                Edge::new(7, 2),
            ],
        );
        reload_graph(&graph, &imported).unwrap();
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.top_influencers(1).unwrap(), vec![2]);
        let metrics = graph.influence(2).unwrap();
        assert_eq!(metrics.in_degree, 3);
        assert_eq!(metrics.normalized_in_degree, 0.5);
    }

    #[test]
    fn test_absent_node_rejections() {
        let graph = load_graph(&bulk_import_source()).unwrap();
        assert!(!graph.has_node(42));
        assert_eq!(graph.influence(42).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(
            graph.shortest_path(42, 1).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            graph.connections_within_depth(42, 1).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_queries_during_concurrent_writes() {
        let graph = load_graph(&bulk_import_source()).unwrap();

        thread::scope(|s| {
            for t in 0..4i64 {
                let graph = &graph;
                s.spawn(move || {
                    for i in 0..100 {
                        graph.add_edge(1000 + t * 100 + i, 1);
                    }
                });
            }
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..100 {
                        let top = graph.top_influencers(3).unwrap();
                        assert_eq!(top.len(), 3);
                        assert!(graph.shortest_path(1, 3).is_ok());
                    }
                });
            }
        });

        assert_eq!(graph.edge_count(), 3 + 400);
        assert_eq!(graph.influence(1).unwrap().in_degree, 400);
        assert_eq!(graph.top_influencers(1).unwrap(), vec![1]);
    }

    #[test]
    fn test_reload_while_reading() {
        let graph = load_graph(&bulk_import_source()).unwrap();
        let replacement = MemorySource::new(
            vec![1, 2, 3],
            vec![Edge::new(1, 2), Edge::new(2, 3)],
        );

        thread::scope(|s| {
            s.spawn(|| {
                for _ in 0..50 {
                    reload_graph(&graph, &replacement).unwrap();
                    reload_graph(&graph, &bulk_import_source()).unwrap();
                }
            });
            s.spawn(|| {
                for _ in 0..500 {
                    // 1 -> 2 -> 3 exists in both versions
                    assert_eq!(graph.shortest_path(1, 3).unwrap(), vec![1, 2, 3]);
                    let components = graph.connected_components();
                    assert!(components == 1 || components == 2);
                }
            });
        });
    }
}
