use thiserror::Error;

use wp_core::{CoreError, NodeId};

/// Errors at the query boundary.
///
/// "No feasible path" and "timed out" are not errors; they are reported as
/// [`QueryOutcome::NoFeasiblePath`](crate::QueryOutcome::NoFeasiblePath).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    #[error("node {0} is not in the network")]
    UnknownNode(NodeId),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("router configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("could not build worker pool: {0}")]
    ThreadPool(String),

    /// A search produced a route that contradicts its query.  Indicates a
    /// bug, never bad input.
    #[error("internal fault: {0}")]
    Internal(String),
}

pub type PlanResult<T> = Result<T, QueryError>;
