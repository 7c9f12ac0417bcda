//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant where a core constructor can fail on their behalf.

use thiserror::Error;

/// Errors raised by `wp-core` constructors and validators.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid sample series: {0}")]
    InvalidSeries(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `wp-core`.
pub type CoreResult<T> = Result<T, CoreError>;
