//! Error types for path and identifier construction.

use thiserror::Error;

/// Errors produced while constructing storage paths and identifiers.
///
/// All of these are rejected at construction time, before any store
/// operation is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A path segment is invalid (empty, contains the separator, or
    /// contains forbidden characters).
    #[error("invalid path segment {segment:?}: {reason}")]
    InvalidSegment { segment: String, reason: String },

    /// A path string could not be parsed.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A chain identifier is invalid.
    #[error("invalid chain id {chain:?}: {reason}")]
    InvalidChainId { chain: String, reason: String },

    /// A fork time is invalid.
    #[error("invalid fork time {value:?}: {reason}")]
    InvalidForkTime { value: String, reason: String },
}

/// Convenience alias for path construction results.
pub type Result<T> = std::result::Result<T, PathError>;
