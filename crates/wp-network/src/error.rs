//! Network-subsystem error type.

use thiserror::Error;

use wp_core::{CoreError, NodeId};

/// Errors produced by `wp-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Load-time validation failed.  Fatal to startup.
    #[error("invalid network: {0}")]
    InvalidNetwork(#[from] Invalid),

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("no edge from {from} to {to}")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("dataset parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why the validation pass rejected a network.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Invalid {
    #[error("sample series: {0}")]
    Series(#[from] CoreError),

    #[error("node {node} has a non-finite position")]
    BadPosition { node: NodeId },

    #[error("edge {from} → {to} references a node outside the network")]
    DanglingEndpoint { from: NodeId, to: NodeId },

    #[error("self-loop at {node}")]
    SelfLoop { node: NodeId },

    #[error("duplicate edge {from} → {to}")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("edge {from} → {to}: {what} must be finite and ≥ 0, got {value}")]
    BadAttribute { from: NodeId, to: NodeId, what: &'static str, value: f64 },

    #[error("edge {from} → {to} has no cost for sample {minute}")]
    MissingSample { from: NodeId, to: NodeId, minute: u32 },

    #[error("edge {from} → {to} has a cost for {minute}, which is not in the sample series")]
    UnknownSample { from: NodeId, to: NodeId, minute: u32 },

    #[error("edge {from} → {to}: cost {cost} at sample {minute} must be finite and ≥ 0")]
    BadCost { from: NodeId, to: NodeId, minute: u32, cost: f64 },

    #[error("edge {from} → {to} carries per-sample widths for some samples only")]
    PartialWidths { from: NodeId, to: NodeId },

    #[error("edge {from} → {to} violates FIFO after sample {minute}: leaving later arrives earlier")]
    FifoViolation { from: NodeId, to: NodeId, minute: u32 },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
