//! Filesystem-backed key store.
//!
//! One JSON file per entry: the path `deploys/1337/First/deploy` is stored
//! at `<root>/deploys/1337/First/deploy.json`. Intermediate directories are
//! created transparently on write. A path can hold a leaf file while its
//! descendants live in a sibling directory of the same name; the two are
//! independent slots, matching the in-memory backend.

use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::{debug, warn};
use walkdir::WalkDir;

use artifex_types::{Document, Path};

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyStore;

/// Suffix of every entry file under the store root.
const ENTRY_SUFFIX: &str = ".json";

/// Filesystem-backed implementation of [`KeyStore`].
///
/// Writes go through a store-wide mutex so the exists-check and the file
/// creation of `set` are atomic. The document itself is written to a
/// temporary file and renamed into place, so a concurrent reader observes
/// either the previous entry or the new one, never a torn file.
pub struct FsKeyStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsKeyStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// The root directory of this store.
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// The on-disk file for a storage path. Segment validation in
    /// [`Path`] guarantees the result stays under the root. The extension
    /// is appended, not substituted: the segment `Contract.sol` maps to
    /// `Contract.sol.json`.
    fn entry_file(&self, path: &Path) -> PathBuf {
        let mut file = self.root.clone();
        match path.segments().split_last() {
            Some((last, parents)) => {
                for segment in parents {
                    file.push(segment);
                }
                file.push(format!("{last}{ENTRY_SUFFIX}"));
            }
            // The empty path is an enumeration prefix, not a storage slot;
            // map it to a hidden file so get/set stay total.
            None => file.push(ENTRY_SUFFIX),
        }
        file
    }

    /// The on-disk directory holding a path's descendants.
    fn entry_dir(&self, path: &Path) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in path.segments() {
            dir.push(segment);
        }
        dir
    }

    fn read_entry(&self, file: &std::path::Path, path_hint: &str) -> StoreResult<Document> {
        let handle = File::open(file)?;
        serde_json::from_reader(BufReader::new(handle)).map_err(|e| StoreError::Corrupt {
            path: path_hint.to_string(),
            reason: e.to_string(),
        })
    }

    /// Reconstruct the storage path of an entry file relative to the root.
    /// Files that do not parse as valid storage paths are skipped.
    fn storage_path_of(&self, file: &std::path::Path) -> Option<Path> {
        let relative = file.strip_prefix(&self.root).ok()?;
        let mut segments: Vec<String> = Vec::new();
        for component in relative.components() {
            segments.push(component.as_os_str().to_str()?.to_string());
        }
        let last = segments.pop()?;
        let stem = last.strip_suffix(ENTRY_SUFFIX)?;
        segments.push(stem.to_string());
        Path::new(segments).ok()
    }
}

impl KeyStore for FsKeyStore {
    fn get(&self, path: &Path) -> StoreResult<Option<Document>> {
        let file = self.entry_file(path);
        match File::open(&file) {
            Ok(handle) => {
                let value = serde_json::from_reader(BufReader::new(handle)).map_err(|e| {
                    StoreError::Corrupt {
                        path: path.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, path: &Path, value: Document, overwrite: bool) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().expect("store mutex poisoned");

        let file = self.entry_file(path);
        if file.exists() && !overwrite {
            debug!(%path, "declined write: entry exists");
            return Ok(false);
        }

        let parent = file
            .parent()
            .expect("entry file always has the root as an ancestor");
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut tmp, &value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        tmp.flush()?;
        tmp.persist(&file).map_err(|e| StoreError::Io(e.error))?;

        debug!(%path, overwrite, "stored entry");
        Ok(true)
    }

    fn clear(&self, path: &Path) -> StoreResult<bool> {
        let _guard = self.write_lock.lock().expect("store mutex poisoned");

        match fs::remove_file(self.entry_file(path)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self, prefix: &Path) -> StoreResult<Vec<(Path, Document)>> {
        let mut entries: Vec<(Path, Document)> = Vec::new();

        // The entry at the prefix itself, if any.
        if !prefix.is_empty() {
            let own = self.entry_file(prefix);
            if own.is_file() {
                entries.push((prefix.clone(), self.read_entry(&own, &prefix.to_string())?));
            }
        }

        let dir = self.entry_dir(prefix);
        if dir.is_dir() {
            for entry in WalkDir::new(&dir).into_iter().filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(path) = self.storage_path_of(entry.path()) else {
                    warn!(file = %entry.path().display(), "skipping unrecognized file in store");
                    continue;
                };
                entries.push((path.clone(), self.read_entry(entry.path(), &path.to_string())?));
            }
        }

        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(entries)
    }
}

impl std::fmt::Debug for FsKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsKeyStore")
            .field("root", &self.root)
            .finish()
    }
}
