//! Snapshot watcher: reloads the graph when the snapshot file changes.
//!
//! A batch import rewrites the snapshot; the watcher turns that into a
//! full reload so the mirror converges even if some incremental updates
//! were missed. The snapshot's directory is watched (not the file) so
//! writers that replace the file by rename are still seen.

use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{GraphError, Result};
use crate::graph::{reload_graph, GraphStore};
use crate::snapshot::SnapshotSource;

const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Keeps the watcher alive. Dropping it stops watching.
pub struct WatchHandle {
    _debouncer: Debouncer<RecommendedWatcher>,
}

/// Start watching `source`'s file and reload `store` on every change.
///
/// `debounce_ms == 0` uses the default of 500ms. A reload that fails is
/// logged and the current graph is kept.
pub fn start_watching(
    source: SnapshotSource,
    store: Arc<GraphStore>,
    debounce_ms: u64,
) -> Result<WatchHandle> {
    let debounce_ms = if debounce_ms == 0 {
        DEFAULT_DEBOUNCE_MS
    } else {
        debounce_ms
    };

    let file_name = source
        .path()
        .file_name()
        .map(OsStr::to_os_string)
        .ok_or_else(|| {
            GraphError::InvalidArgument(format!(
                "snapshot path {} has no file name",
                source.path().display()
            ))
        })?;
    let dir = source
        .path()
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let handler_source = source.clone();
    let mut debouncer = new_debouncer(
        Duration::from_millis(debounce_ms),
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                if !events.iter().any(|e| touches_snapshot(&e.path, &file_name)) {
                    return;
                }
                debug!(path = %handler_source.path().display(), "snapshot changed");
                match reload_graph(&store, &handler_source) {
                    Ok(()) => info!("graph reloaded from snapshot"),
                    Err(e) => warn!(error = %e, "snapshot reload failed, keeping current graph"),
                }
            }
            Err(e) => warn!(error = ?e, "watch error"),
        },
    )?;

    debouncer
        .watcher()
        .watch(&dir, RecursiveMode::NonRecursive)?;

    info!(
        path = %source.path().display(),
        debounce_ms,
        "watching snapshot for changes"
    );

    Ok(WatchHandle {
        _debouncer: debouncer,
    })
}

/// Whether a change at `event_path` concerns the snapshot file.
fn touches_snapshot(event_path: &Path, file_name: &OsStr) -> bool {
    event_path.file_name() == Some(file_name)
}
