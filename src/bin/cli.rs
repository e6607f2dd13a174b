//! socialgraph CLI - graph queries over a users/connections snapshot.
//!
//! Usage:
//!   socialgraph -s data.json stats              # Node and edge totals
//!   socialgraph -s data.json influence 2        # Degree metrics for a user
//!   socialgraph -s data.json path 1 3           # Shortest directed path
//!   socialgraph -s data.json connections 1 -d 2 # Reachable within 2 hops
//!   socialgraph -s data.json top -l 5           # Top influencers
//!   socialgraph -s data.json components         # Traversal components
//!   socialgraph -s data.json serve              # JSON lines on stdin/stdout

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};

use socialgraph::cli::{Cli, Commands};
use socialgraph::config::GraphConfig;
use socialgraph::server::Server;
use socialgraph::snapshot::SnapshotSource;
use socialgraph::{load_graph, query, watcher};

fn main() {
    let cli = Cli::parse();
    let (config, config_err) = GraphConfig::load_or_default(&cli.config);

    // Logs go to stderr; stdout carries results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .init();

    if let Some(e) = config_err {
        warn!(path = %cli.config.display(), error = %e, "invalid config, using defaults");
    }

    if let Err(e) = run(cli, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: GraphConfig) -> Result<()> {
    let snapshot_path = cli
        .snapshot
        .or_else(|| config.source.path.clone())
        .context("no snapshot given: pass --snapshot or set [source].path")?;

    let source = SnapshotSource::new(snapshot_path);
    info!(path = %source.path().display(), "loading graph");
    let store = Arc::new(load_graph(&source).context("initial graph load failed")?);

    match cli.command {
        Commands::Stats => print_json(&query::graph_stats(&store)),
        Commands::Influence { id } => print_json(&query::user_influence(&store, id)?),
        Commands::Path { from, to } => print_json(&query::shortest_path(&store, from, to)?),
        Commands::Connections { id, depth } => {
            let depth = depth.unwrap_or(config.query.default_depth);
            print_json(&query::connections(&store, id, depth)?)
        }
        Commands::Top { limit } => {
            let limit = limit.unwrap_or(config.query.default_limit);
            print_json(&query::top_influencers(&store, limit)?)
        }
        Commands::Components => print_json(&query::components(&store)),
        Commands::Serve { no_watch } => {
            let _watch = if config.watch.enabled && !no_watch {
                match watcher::start_watching(
                    source.clone(),
                    Arc::clone(&store),
                    config.watch.debounce_ms,
                ) {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        warn!(error = %e, "snapshot watcher failed to start, graph will only change through requests");
                        None
                    }
                }
            } else {
                None
            };

            let server = Server::new(Arc::clone(&store), config.query.clone()).with_source(source);
            server.run(io::stdin().lock(), io::stdout().lock())?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
