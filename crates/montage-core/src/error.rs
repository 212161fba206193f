//! Error types for montage-core.

use thiserror::Error;

/// Error type for buffer and configuration operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from node graph operations.
///
/// Every variant is detected before any audio is touched, so a failed graph
/// operation never leaves the graph partially mutated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Edge references missing node '{0}'")]
    DanglingReference(String),

    #[error("Port '{port}' on node '{node}' already has an incoming edge")]
    PortOccupied { node: String, port: String },

    #[error("Port '{port}' is not valid on node '{node}'")]
    InvalidPort { node: String, port: String },

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Node '{node}' has no parameter '{key}'")]
    UnknownParameter { node: String, key: String },

    #[error("Invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("Graph contains a cycle")]
    CycleDetected,

    #[error("Graph has no Output node")]
    MissingOutput,

    #[error("Ambiguous topology: {0}")]
    AmbiguousTopology(String),

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),
}
