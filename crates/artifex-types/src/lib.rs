//! Foundation types for Artifex.
//!
//! This crate provides the core addressing types used throughout the Artifex
//! system. Every other Artifex crate depends on `artifex-types`.
//!
//! # Key Types
//!
//! - [`Path`] — Hierarchical storage address: an ordered sequence of segments
//! - [`Document`] — Stored value: a JSON mapping/sequence/scalar tree
//! - [`ArtifactKind`] — The recognized artifact roots of the registry namespace
//! - [`ChainId`] — Validated network identifier for deployment addressing
//! - [`ForkTime`] — Millisecond timestamp addressing a historical deployment fork

pub mod artifact;
pub mod error;
pub mod path;

pub use artifact::{ArtifactKind, ChainId, ForkTime, DEPLOY_MARKER};
pub use error::PathError;
pub use path::{Path, SEPARATOR};

/// A stored value: an arbitrary structured document.
///
/// Artifacts are opaque to the store; they are JSON trees produced by the
/// compiler, linker, and deployer collaborators. The conventional default
/// for reads of absent entries is the empty mapping.
pub type Document = serde_json::Value;

/// The conventional read default: an empty mapping.
pub fn empty_document() -> Document {
    serde_json::Value::Object(serde_json::Map::new())
}
