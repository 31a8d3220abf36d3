use thiserror::Error;

/// Errors from registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An artifact name or identifier does not form a valid path segment.
    /// Rejected before any store operation is attempted.
    #[error(transparent)]
    Path(#[from] artifex_types::PathError),

    /// Persistence fault propagated from the key store.
    #[error(transparent)]
    Store(#[from] artifex_store::StoreError),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
