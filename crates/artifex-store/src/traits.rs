use serde_json::Map;

use artifex_types::{Document, Path};

use crate::error::StoreResult;

/// Path-addressed document store.
///
/// All implementations must satisfy these invariants:
/// - At most one document is associated with a path at any time.
/// - A `set` against an occupied path with `overwrite = false` is declined
///   and leaves the store unchanged. The existence check and the mutation
///   are atomic as a unit: of N concurrent non-overwrite writes to an empty
///   path, exactly one succeeds.
/// - Writes to disjoint paths are independent.
/// - A read concurrent with a write observes either the old or the new
///   document, never a torn value.
/// - All I/O errors are propagated, never silently ignored.
pub trait KeyStore: Send + Sync {
    /// Read the document at `path`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    /// Returns `Err` only on a persistence fault.
    fn get(&self, path: &Path) -> StoreResult<Option<Document>>;

    /// Write `value` at `path`.
    ///
    /// Returns `Ok(true)` if the document was stored (or replaced under
    /// `overwrite = true`), `Ok(false)` if an existing document declined the
    /// write. A declined write is an expected outcome and must be checked by
    /// the caller; it is distinguishable from a persistence fault (`Err`).
    fn set(&self, path: &Path, value: Document, overwrite: bool) -> StoreResult<bool>;

    /// Remove any document stored at `path`. Idempotent.
    ///
    /// Returns `Ok(true)` iff a document existed and was removed. Intended
    /// for test/reset tooling; the production write path never deletes.
    fn clear(&self, path: &Path) -> StoreResult<bool>;

    /// Enumerate every entry whose path descends from `prefix` (the prefix
    /// itself included), sorted by path.
    ///
    /// Pass [`Path::empty`] to enumerate the whole store.
    fn list(&self, prefix: &Path) -> StoreResult<Vec<(Path, Document)>>;

    /// Read the document at `path`, resolving absence to `default`.
    ///
    /// Never fails merely because nothing is stored; callers probe for
    /// existence with a single call and no not-found branching.
    fn get_or(&self, path: &Path, default: Document) -> StoreResult<Document> {
        Ok(self.get(path)?.unwrap_or(default))
    }

    /// Aggregate all entries below `prefix` into a nested mapping keyed by
    /// successive path segments.
    ///
    /// An entry stored at the prefix itself has no segment to key it under
    /// and is omitted from the aggregate.
    fn subtree(&self, prefix: &Path) -> StoreResult<Document> {
        let mut root = Map::new();
        for (path, value) in self.list(prefix)? {
            let Some(tail) = path.strip_prefix(prefix) else {
                continue;
            };
            if tail.is_empty() {
                continue;
            }
            insert_nested(&mut root, tail, value);
        }
        Ok(Document::Object(root))
    }
}

/// Place `value` at `tail` below `node`, creating intermediate mappings.
///
/// Entries are independent slots: if a scalar entry sits at an ancestor of a
/// deeper entry, the deeper structure wins in the aggregated view.
fn insert_nested(node: &mut Map<String, Document>, tail: &[String], value: Document) {
    match tail {
        [] => {}
        [leaf] => {
            node.insert(leaf.clone(), value);
        }
        [head, rest @ ..] => {
            let child = node
                .entry(head.clone())
                .or_insert_with(|| Document::Object(Map::new()));
            if !child.is_object() {
                *child = Document::Object(Map::new());
            }
            let Document::Object(child_map) = child else {
                unreachable!("child was just forced to an object");
            };
            insert_nested(child_map, rest, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKeyStore;
    use serde_json::json;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn get_or_returns_default_on_miss() {
        let store = InMemoryKeyStore::new();
        let d = store
            .get_or(&path("compiles/NeverCompiled"), json!({}))
            .unwrap();
        assert_eq!(d, json!({}));

        let other = store
            .get_or(&path("compiles/NeverCompiled"), json!({"probe": 1}))
            .unwrap();
        assert_eq!(other, json!({"probe": 1}));
    }

    #[test]
    fn get_or_returns_stored_value_after_write() {
        let store = InMemoryKeyStore::new();
        store
            .set(&path("compiles/NeverCompiled"), json!({"abi": []}), false)
            .unwrap();
        let d = store
            .get_or(&path("compiles/NeverCompiled"), json!({}))
            .unwrap();
        assert_eq!(d, json!({"abi": []}));
    }

    #[test]
    fn subtree_groups_by_next_segment() {
        let store = InMemoryKeyStore::new();
        store
            .set(&path("deploys/1337/First/deploy"), json!({"z": 22}), false)
            .unwrap();
        store
            .set(&path("deploys/1337/Second/deploy"), json!({"y": 23}), false)
            .unwrap();
        store
            .set(&path("deploys/2020/First/deploy"), json!({"x": 1}), false)
            .unwrap();

        let all = store.subtree(&path("deploys")).unwrap();
        assert_eq!(
            all,
            json!({
                "1337": { "First": { "deploy": {"z": 22} }, "Second": { "deploy": {"y": 23} } },
                "2020": { "First": { "deploy": {"x": 1} } },
            })
        );

        let chain = store.subtree(&path("deploys/1337")).unwrap();
        assert_eq!(
            chain,
            json!({
                "First": { "deploy": {"z": 22} },
                "Second": { "deploy": {"y": 23} },
            })
        );
    }

    #[test]
    fn subtree_of_empty_prefix_is_empty_mapping() {
        let store = InMemoryKeyStore::new();
        assert_eq!(store.subtree(&path("links")).unwrap(), json!({}));
    }

    #[test]
    fn subtree_omits_entry_at_prefix_itself() {
        let store = InMemoryKeyStore::new();
        store.set(&path("links"), json!("stray"), false).unwrap();
        store.set(&path("links/A"), json!({"a": 1}), false).unwrap();
        assert_eq!(store.subtree(&path("links")).unwrap(), json!({"A": {"a": 1}}));
    }
}
