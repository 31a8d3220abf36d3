use thiserror::Error;

/// Persistence faults from key store operations.
///
/// Declined writes and absent entries are *not* errors; they are ordinary
/// return values of [`crate::KeyStore::set`] and [`crate::KeyStore::get`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored entry is malformed or cannot be decoded.
    #[error("corrupt entry at {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
