//! Error types for socialgraph.
//!
//! Every failure is surfaced to the immediate caller. Nothing in the
//! engine retries; [`GraphError::kind`] gives callers enough
//! classification to decide what to do.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::graph::NodeId;

/// Errors produced by the graph engine and its surrounding layers.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Malformed identifier, non-positive depth or limit, bad request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The queried node is not in the graph.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// Both endpoints exist but `to` is unreachable from `from`.
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    /// The authoritative store could not be fully enumerated.
    #[error("graph source unavailable: {0}")]
    SourceUnavailable(String),

    /// Unexpected decoding or enumeration failure.
    #[error("internal error: {0}")]
    Internal(String),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Coarse classification of a [`GraphError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    SourceUnavailable,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidArgument => write!(f, "invalid_argument"),
            ErrorKind::NotFound => write!(f, "not_found"),
            ErrorKind::SourceUnavailable => write!(f, "source_unavailable"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

impl GraphError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::InvalidArgument(_) | GraphError::Config(_) => ErrorKind::InvalidArgument,
            GraphError::NodeNotFound(_) | GraphError::NoPath { .. } => ErrorKind::NotFound,
            GraphError::SourceUnavailable(_) => ErrorKind::SourceUnavailable,
            GraphError::Internal(_) | GraphError::Io(_) | GraphError::Watch(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// True for the two not-found cases (absent node, no path).
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            GraphError::InvalidArgument("depth".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(GraphError::NodeNotFound(7).kind(), ErrorKind::NotFound);
        assert_eq!(
            GraphError::NoPath { from: 1, to: 2 }.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            GraphError::SourceUnavailable("down".into()).kind(),
            ErrorKind::SourceUnavailable
        );
        assert_eq!(GraphError::Internal("x".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(GraphError::NodeNotFound(42).to_string(), "node 42 not found");
        assert_eq!(
            GraphError::NoPath { from: 1, to: 5 }.to_string(),
            "no path from 1 to 5"
        );
        assert_eq!(ErrorKind::SourceUnavailable.to_string(), "source_unavailable");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
    }
}
