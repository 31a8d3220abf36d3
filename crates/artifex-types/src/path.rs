//! Hierarchical storage paths.
//!
//! A [`Path`] is an ordered sequence of non-empty string segments. Two paths
//! are equal iff their segment sequences are equal, and `P` is an ancestor of
//! `Q` iff `P`'s segments are a prefix of `Q`'s.
//!
//! Valid segments:
//! - Must be non-empty
//! - Must not contain the separator `/`
//! - Must not contain whitespace or control characters
//! - Must not be `.` or `..` (filesystem traversal)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PathError, Result};

/// The path separator character. No segment may contain it.
pub const SEPARATOR: char = '/';

/// An ordered sequence of validated segments addressing one storage slot.
///
/// # Examples
///
/// ```
/// use artifex_types::Path;
///
/// let p: Path = "links/FirstLink".parse().unwrap();
/// assert_eq!(p.segments(), ["links", "FirstLink"]);
/// assert!("links//bad".parse::<Path>().is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Build a path from segments, validating each one.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self { segments })
    }

    /// The empty path: ancestor of every path. Used as the universal
    /// enumeration prefix, never as a storage slot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The validated segments, in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if this is the empty path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Return a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self> {
        let segment = segment.into();
        validate_segment(&segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// Ancestor test: `true` if `self`'s segments are a prefix of `other`'s.
    ///
    /// Every path is an ancestor of itself.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        other.segments.len() >= self.segments.len()
            && other.segments[..self.segments.len()] == self.segments[..]
    }

    /// The segments of `self` below `prefix`, or `None` if `prefix` is not
    /// an ancestor of `self`.
    pub fn strip_prefix(&self, prefix: &Path) -> Option<&[String]> {
        if prefix.is_ancestor_of(self) {
            Some(&self.segments[prefix.segments.len()..])
        } else {
            None
        }
    }
}

fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(PathError::InvalidSegment {
            segment: segment.to_string(),
            reason: "segment must not be empty".into(),
        });
    }
    if segment.contains(SEPARATOR) {
        return Err(PathError::InvalidSegment {
            segment: segment.to_string(),
            reason: format!("segment must not contain {SEPARATOR:?}"),
        });
    }
    if segment.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(PathError::InvalidSegment {
            segment: segment.to_string(),
            reason: "segment must not contain whitespace or control characters".into(),
        });
    }
    if segment == "." || segment == ".." {
        return Err(PathError::InvalidSegment {
            segment: segment.to_string(),
            reason: "segment must not be '.' or '..'".into(),
        });
    }
    Ok(())
}

impl FromStr for Path {
    type Err = PathError;

    /// Parse from `a/b/c` or `/a/b/c`. A lone leading slash is tolerated
    /// (clients historically address keys that way); any other empty
    /// component is rejected.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.strip_prefix(SEPARATOR).unwrap_or(s);
        if trimmed.is_empty() {
            return Err(PathError::InvalidPath {
                path: s.to_string(),
                reason: "path must contain at least one segment".into(),
            });
        }
        Self::new(trimmed.split(SEPARATOR))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn build_from_segments() {
        let p = Path::new(["links", "FirstLink"]).unwrap();
        assert_eq!(p.segments(), ["links", "FirstLink"]);
        assert_eq!(p.len(), 2);
        assert_eq!(p.to_string(), "links/FirstLink");
    }

    #[test]
    fn parse_with_and_without_leading_slash() {
        let a: Path = "/compiles/FirstContract".parse().unwrap();
        let b: Path = "compiles/FirstContract".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn equality_is_segment_equality() {
        let a = Path::new(["a", "b"]).unwrap();
        let b: Path = "a/b".parse().unwrap();
        assert_eq!(a, b);
        let c = Path::new(["a", "c"]).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn reject_empty_segment() {
        assert!(Path::new(["a", ""]).is_err());
        assert!("a//b".parse::<Path>().is_err());
        assert!("a/".parse::<Path>().is_err());
        assert!("".parse::<Path>().is_err());
        assert!("/".parse::<Path>().is_err());
    }

    #[test]
    fn reject_separator_in_segment() {
        assert!(Path::new(["a/b"]).is_err());
    }

    #[test]
    fn reject_whitespace_and_control() {
        assert!(Path::new(["has space"]).is_err());
        assert!(Path::new(["has\ttab"]).is_err());
        assert!(Path::new(["has\nnewline"]).is_err());
    }

    #[test]
    fn reject_dot_segments() {
        assert!(Path::new(["."]).is_err());
        assert!(Path::new([".."]).is_err());
        assert!("deploys/../links".parse::<Path>().is_err());
    }

    #[test]
    fn ancestor_relation() {
        let root: Path = "deploys".parse().unwrap();
        let leaf: Path = "deploys/1337/FirstDeploy/deploy".parse().unwrap();
        assert!(root.is_ancestor_of(&leaf));
        assert!(!leaf.is_ancestor_of(&root));
        assert!(leaf.is_ancestor_of(&leaf));
        assert!(Path::empty().is_ancestor_of(&root));
    }

    #[test]
    fn sibling_is_not_ancestor() {
        let a: Path = "deploys/1337".parse().unwrap();
        let b: Path = "deploys/2020/X".parse().unwrap();
        assert!(!a.is_ancestor_of(&b));
    }

    #[test]
    fn strip_prefix_returns_tail() {
        let root: Path = "deploys/1337".parse().unwrap();
        let leaf: Path = "deploys/1337/FirstDeploy/deploy".parse().unwrap();
        let tail = leaf.strip_prefix(&root).unwrap();
        assert_eq!(tail, ["FirstDeploy", "deploy"]);

        let other: Path = "links/A".parse().unwrap();
        assert!(other.strip_prefix(&root).is_none());
    }

    #[test]
    fn child_appends_validated_segment() {
        let p: Path = "links".parse().unwrap();
        let c = p.child("FirstLink").unwrap();
        assert_eq!(c.to_string(), "links/FirstLink");
        assert!(p.child("bad/segment").is_err());
    }

    #[test]
    fn serde_round_trip_as_string() {
        let p: Path = "deploys/1337/FirstDeploy/deploy".parse().unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"deploys/1337/FirstDeploy/deploy\"");
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    proptest! {
        #[test]
        fn display_parse_round_trip(segments in proptest::collection::vec("[A-Za-z0-9_.-]{1,12}", 1..6)) {
            prop_assume!(segments.iter().all(|s| s != "." && s != ".."));
            let p = Path::new(segments.clone()).unwrap();
            let back: Path = p.to_string().parse().unwrap();
            prop_assert_eq!(back, p);
        }

        #[test]
        fn parsed_paths_never_contain_separator_in_segments(s in "[a-z/]{1,20}") {
            if let Ok(p) = s.parse::<Path>() {
                prop_assert!(p.segments().iter().all(|seg| !seg.contains(SEPARATOR) && !seg.is_empty()));
            }
        }
    }
}
