//! Search-subsystem error type.

use thiserror::Error;

use wp_core::NodeId;

/// Errors produced by `wp-search`.
///
/// An infeasible departure is not an error: searches return an empty
/// candidate list for it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("node {0} is not in the network")]
    UnknownNode(NodeId),

    /// The caller's wall-clock deadline passed mid-search.
    #[error("search deadline exceeded")]
    Timeout,
}

pub type SearchResult<T> = Result<T, SearchError>;
