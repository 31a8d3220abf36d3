//! Artifact namespace for Artifex.
//!
//! [`ArtifactRegistry`] is a thin addressing layer over a [`KeyStore`]: it
//! constructs canonical paths for each artifact kind and presents
//! kind-specific read/write operations. It owns no state of its own.
//!
//! Path construction follows a fixed segment order:
//!
//! ```text
//! {kind-root} / [chainId] / [deployName] / [forkTime | "deploy"]
//! ```
//!
//! The literal `deploy` leaf addresses the current deployment of a name;
//! a millisecond fork-time leaf addresses a historical redeployment. Both
//! records coexist, so redeploying never destroys a prior deployment.

pub mod error;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::ArtifactRegistry;

// Re-export the addressing types callers need alongside the registry.
pub use artifex_store::{FsKeyStore, InMemoryKeyStore, KeyStore};
pub use artifex_types::{ArtifactKind, ChainId, Document, ForkTime, Path};
