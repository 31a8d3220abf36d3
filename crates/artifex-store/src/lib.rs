//! Path-addressed key-value storage for Artifex.
//!
//! This crate implements the registry's storage core: a hierarchical
//! path -> document mapping with immutable-by-default writes. Build and
//! deploy artifacts are written once; replacing an existing record requires
//! an explicit overwrite opt-in from the caller.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyStore`] trait:
//!
//! - [`InMemoryKeyStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsKeyStore`] -- one JSON file per entry under a root directory
//!
//! # Design Rules
//!
//! 1. At most one document is stored per path.
//! 2. A write against an occupied path is *declined* (`Ok(false)`) unless
//!    the caller passes `overwrite = true`. Declined is a value, not an
//!    error: only a persistence fault is an `Err`.
//! 3. Reads of absent paths resolve to the caller's default, never an error.
//! 4. The existence check and the mutation of a `set` are atomic per path.
//! 5. The store never interprets stored documents.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use fs::FsKeyStore;
pub use memory::InMemoryKeyStore;
pub use traits::KeyStore;
