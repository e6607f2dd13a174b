//! Line server: newline-delimited JSON requests in, JSON responses out.
//!
//! Each input line is one request object tagged by `"op"`, for example
//! `{"op":"shortest_path","from":1,"to":3}`. Each request gets exactly one
//! response line: `{"ok":true,"result":...}` or
//! `{"ok":false,"error":{"kind":"not_found","message":"..."}}`.
//! The binary runs this over stdin/stdout; logging goes to stderr.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::QueryConfig;
use crate::error::{ErrorKind, GraphError, Result};
use crate::graph::{reload_graph, GraphSource, GraphStore, NodeId};
use crate::query;

/// An incoming request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    Stats,
    Influence {
        id: NodeId,
    },
    ShortestPath {
        from: NodeId,
        to: NodeId,
    },
    Connections {
        id: NodeId,
        #[serde(default)]
        depth: Option<usize>,
    },
    TopInfluencers {
        #[serde(default)]
        limit: Option<usize>,
    },
    Components,
    AddNode {
        id: NodeId,
    },
    AddEdge {
        from: NodeId,
        to: NodeId,
    },
    Reload,
}

/// An outgoing response.
#[derive(Debug, Serialize)]
pub struct Response {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl Response {
    pub fn success(result: Value) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: &GraphError) -> Self {
        Self {
            ok: false,
            result: None,
            error: Some(ErrorBody {
                kind: error.kind(),
                message: error.to_string(),
            }),
        }
    }
}

/// Routes requests to the graph.
pub struct Server {
    store: Arc<GraphStore>,
    source: Option<Box<dyn GraphSource + Send + Sync>>,
    defaults: QueryConfig,
}

impl Server {
    pub fn new(store: Arc<GraphStore>, defaults: QueryConfig) -> Self {
        Self {
            store,
            source: None,
            defaults,
        }
    }

    /// Source used by `reload` requests.
    pub fn with_source(mut self, source: impl GraphSource + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Execute one request.
    pub fn handle(&self, request: Request) -> Result<Value> {
        let store = self.store.as_ref();
        match request {
            Request::Stats => encode(query::graph_stats(store)),
            Request::Influence { id } => encode(query::user_influence(store, id)?),
            Request::ShortestPath { from, to } => encode(query::shortest_path(store, from, to)?),
            Request::Connections { id, depth } => {
                let depth = depth.unwrap_or(self.defaults.default_depth);
                encode(query::connections(store, id, depth)?)
            }
            Request::TopInfluencers { limit } => {
                let limit = limit.unwrap_or(self.defaults.default_limit);
                encode(query::top_influencers(store, limit)?)
            }
            Request::Components => encode(query::components(store)),
            Request::AddNode { id } => {
                store.add_node(id);
                encode(query::graph_stats(store))
            }
            Request::AddEdge { from, to } => {
                store.add_edge(from, to);
                encode(query::graph_stats(store))
            }
            Request::Reload => {
                let source = self.source.as_deref().ok_or_else(|| {
                    GraphError::InvalidArgument("no graph source configured".to_string())
                })?;
                reload_graph(store, source)?;
                encode(query::graph_stats(store))
            }
        }
    }

    /// Decode and execute one request line.
    pub fn handle_line(&self, line: &str) -> Response {
        let request: Request = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "invalid request");
                return Response::failure(&GraphError::InvalidArgument(format!(
                    "malformed request: {}",
                    e
                )));
            }
        };

        debug!(?request, "handling request");
        match self.handle(request) {
            Ok(result) => Response::success(result),
            Err(e) => {
                debug!(error = %e, kind = %e.kind(), "request failed");
                Response::failure(&e)
            }
        }
    }

    /// Serve requests from `reader` until EOF, one response line each.
    ///
    /// A line that is not valid UTF-8 is answered as a malformed request.
    /// Only errors from the reader or writer themselves end the loop.
    pub fn run<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<()> {
        info!("line server started");

        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.handle_line(trimmed)
                }
                Err(e) => {
                    warn!(error = %e, "request is not valid UTF-8");
                    Response::failure(&GraphError::InvalidArgument(format!(
                        "malformed request: {}",
                        e
                    )))
                }
            };

            serde_json::to_writer(&mut writer, &response).map_err(io::Error::from)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        info!("line server shutting down");
        Ok(())
    }
}

fn encode<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| GraphError::Internal(e.to_string()))
}
