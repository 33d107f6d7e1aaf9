// Domain errors - Error types for the domain layer

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::model::NodeId;

/// Errors raised by graph mutations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// An operation named a node that is not in the graph
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    /// A node was inserted with an id that is already live
    #[error("node {0} already exists")]
    DuplicateNode(NodeId),
}

/// Errors raised while deriving routes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// A successor was already on the path being explored
    #[error("cycle detected: {}", format_path(.path))]
    CycleDetected { path: Vec<NodeId> },

    /// A path grew past the configured depth budget
    #[error("route depth exceeded {limit} nodes starting at node {start}")]
    DepthExceeded { start: NodeId, limit: usize },
}

/// Errors raised while decoding a persisted document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document is not valid JSON or has the wrong shape
    #[error("malformed canvas document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors surfaced by the application layer and its ports
#[derive(Error, Debug)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// No sequence carries the requested name
    #[error("Sequence not found: {0}")]
    SequenceNotFound(String),

    /// The sequence resolved to zero bound files
    #[error("Nothing to play or export in {0}: no node on the route has a bound file")]
    NothingToPlay(String),

    /// Route derivation failed
    #[error("Route derivation failed: {0}")]
    Route(#[from] RouteError),

    /// Canvas document could not be decoded
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// File system failure
    #[error("File system error: {0}")]
    FsFail(String),

    /// Probe of a media file failed
    #[error("Probe failed: {0}")]
    ProbeFail(String),

    /// External tool failed
    #[error("Processing error: {0}")]
    ProcessingError(String),
}

fn format_path(path: &[NodeId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
