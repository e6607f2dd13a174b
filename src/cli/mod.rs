//! CLI module for socialgraph.
//!
//! Commands:
//! - Query: stats, influence, path, connections, top, components
//! - Service: serve (line server on stdin/stdout, snapshot watcher)

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::graph::NodeId;

#[derive(Parser, Debug)]
#[command(name = "socialgraph")]
#[command(about = "In-memory social graph queries over a users/connections snapshot")]
pub struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "socialgraph.toml")]
    pub config: PathBuf,

    /// Snapshot file (overrides [source].path from the config)
    #[arg(short, long)]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    // ─── Query Commands ─────────────────────────────────────────────
    /// Node and edge totals
    Stats,

    /// In/out degree and normalized in-degree of a user
    Influence {
        /// User id
        id: NodeId,
    },

    /// Shortest directed path between two users
    Path {
        from: NodeId,
        to: NodeId,
    },

    /// Users reachable within a number of hops
    Connections {
        /// User id
        id: NodeId,

        /// Maximum hops (defaults to [query].default_depth)
        #[arg(short, long)]
        depth: Option<usize>,
    },

    /// Users with the most inbound connections
    Top {
        /// How many to return (defaults to [query].default_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Number of traversal components
    Components,

    // ─── Service ─────────────────────────────────────────────────
    /// Serve JSON requests on stdin/stdout, reloading on snapshot changes
    Serve {
        /// Do not watch the snapshot file
        #[arg(long)]
        no_watch: bool,
    },
}
