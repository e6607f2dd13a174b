//! Graph module: the in-memory mirror of the users/connections store.
//!
//! Provides the lock-guarded adjacency store, the read-only structural
//! queries over it, and the load/reload protocol that rebuilds it.

pub mod algorithms;
pub mod loader;
pub mod store;
pub mod types;

pub use loader::{load_graph, reload_graph, GraphSource, MemorySource};
pub use store::GraphStore;
pub use types::{Edge, GraphStats, InfluenceMetrics, NodeId};
