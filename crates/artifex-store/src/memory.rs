use std::collections::HashMap;
use std::sync::RwLock;

use artifex_types::{Document, Path};

use crate::error::StoreResult;
use crate::traits::KeyStore;

/// In-memory, HashMap-based key store.
///
/// Intended for tests and embedding. All entries are held in memory behind a
/// `RwLock`; the write lock makes the check-then-insert of `set` atomic per
/// store. Documents are cloned on read.
pub struct InMemoryKeyStore {
    entries: RwLock<HashMap<Path, Document>>,
}

impl InMemoryKeyStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Remove all entries from the store.
    pub fn clear_all(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all stored paths.
    pub fn all_paths(&self) -> Vec<Path> {
        let map = self.entries.read().expect("lock poisoned");
        let mut paths: Vec<Path> = map.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Default for InMemoryKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn get(&self, path: &Path) -> StoreResult<Option<Document>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(path).cloned())
    }

    fn set(&self, path: &Path, value: Document, overwrite: bool) -> StoreResult<bool> {
        let mut map = self.entries.write().expect("lock poisoned");
        if map.contains_key(path) && !overwrite {
            return Ok(false);
        }
        map.insert(path.clone(), value);
        Ok(true)
    }

    fn clear(&self, path: &Path) -> StoreResult<bool> {
        let mut map = self.entries.write().expect("lock poisoned");
        Ok(map.remove(path).is_some())
    }

    fn list(&self, prefix: &Path) -> StoreResult<Vec<(Path, Document)>> {
        let map = self.entries.read().expect("lock poisoned");
        let mut result: Vec<(Path, Document)> = map
            .iter()
            .filter(|(path, _)| prefix.is_ancestor_of(path))
            .map(|(path, value)| (path.clone(), value.clone()))
            .collect();
        result.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(result)
    }
}

impl std::fmt::Debug for InMemoryKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKeyStore")
            .field("entry_count", &self.len())
            .finish()
    }
}
