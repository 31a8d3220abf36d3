//! Artifact addressing: kinds, chain identifiers, and fork times.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PathError, Result};
use crate::path::SEPARATOR;

/// Leaf segment addressing the "current" deployment of a name, as opposed
/// to a time-addressed historical fork.
pub const DEPLOY_MARKER: &str = "deploy";

/// The recognized artifact roots of the registry namespace.
///
/// Each kind owns one top-level segment of the key space. The literals match
/// the registry's on-the-wire route names so REST paths and store paths line
/// up one-to-one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Compiled contract records.
    Compile,
    /// Per-source compiler output documents.
    CompileOutput,
    /// Linked-library records.
    Link,
    /// Flattened source files.
    FlattenedSource,
    /// Chain-specific deployments, including historical forks.
    Deploy,
}

impl ArtifactKind {
    /// The root segment this kind owns.
    pub fn root(&self) -> &'static str {
        match self {
            Self::Compile => "compiles",
            Self::CompileOutput => "compileOutputs",
            Self::Link => "links",
            Self::FlattenedSource => "sourcesFlattened",
            Self::Deploy => "deploys",
        }
    }

    /// All recognized kinds.
    pub fn all() -> [ArtifactKind; 5] {
        [
            Self::Compile,
            Self::CompileOutput,
            Self::Link,
            Self::FlattenedSource,
            Self::Deploy,
        ]
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root())
    }
}

/// A validated network identifier.
///
/// Chain ids appear as path segments under the deploy root. Numeric ids
/// (`"1"`, `"1337"`) and test-net names (`"ganache"`) are both accepted;
/// what matters is that the token is non-empty and separator-free.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChainId(String);

impl ChainId {
    pub fn new(chain: impl Into<String>) -> Result<Self> {
        let chain = chain.into();
        if chain.is_empty() {
            return Err(PathError::InvalidChainId {
                chain,
                reason: "chain id must not be empty".into(),
            });
        }
        if !chain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(PathError::InvalidChainId {
                chain,
                reason: "chain id must be alphanumeric (plus '-' and '_')".into(),
            });
        }
        Ok(Self(chain))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ChainId {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ChainId {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<ChainId> for String {
    fn from(chain: ChainId) -> String {
        chain.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainId({})", self.0)
    }
}

/// Millisecond UNIX timestamp addressing a historical deployment fork.
///
/// When a contract is redeployed under the same name on the same chain, the
/// prior record is kept alive under its fork time instead of being
/// destroyed. The reserved literal [`DEPLOY_MARKER`] addresses the current
/// deployment and is rejected here so the two leaf forms cannot collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ForkTime(u64);

impl ForkTime {
    /// A fork time from explicit milliseconds since the UNIX epoch.
    pub fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    /// A fork time for the current wall clock.
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis().max(0) as u64)
    }

    /// Milliseconds since the UNIX epoch.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// The path segment form.
    pub fn segment(&self) -> String {
        self.0.to_string()
    }
}

impl FromStr for ForkTime {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        if s == DEPLOY_MARKER {
            return Err(PathError::InvalidForkTime {
                value: s.to_string(),
                reason: format!("{DEPLOY_MARKER:?} is reserved for the current deployment"),
            });
        }
        if s.contains(SEPARATOR) {
            return Err(PathError::InvalidForkTime {
                value: s.to_string(),
                reason: "fork time must be a single segment".into(),
            });
        }
        s.parse::<u64>().map(Self).map_err(|_| PathError::InvalidForkTime {
            value: s.to_string(),
            reason: "fork time must be a millisecond timestamp".into(),
        })
    }
}

impl fmt::Display for ForkTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ForkTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForkTime({}ms)", self.0)
    }
}
