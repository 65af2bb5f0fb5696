use crate::error::EditorError;
use dashmap::DashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key/value storage for exported document snapshots.
///
/// Snapshots are opaque JSON text; parsing them is the caller's job so that a
/// corrupt snapshot can be told apart from a failing store.
pub trait SnapshotStore {
    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, EditorError>;

    fn save(&self, key: &str, snapshot: &str) -> Result<(), EditorError>;

    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), EditorError>;
}

/// Process-local store.
pub struct MemoryStore {
    snapshots: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            snapshots: DashMap::new(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.snapshots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&self) {
        self.snapshots.clear();
        log::debug!("Cleared snapshot store");
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, EditorError> {
        Ok(self
            .snapshots
            .get(key)
            .map(|snapshot| snapshot.value().clone()))
    }

    fn save(&self, key: &str, snapshot: &str) -> Result<(), EditorError> {
        self.snapshots.insert(key.to_string(), snapshot.to_string());
        log::debug!("Stored snapshot '{}' ({} bytes)", key, snapshot.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), EditorError> {
        if self.snapshots.remove(key).is_some() {
            log::debug!("Removed snapshot '{}'", key);
        }
        Ok(())
    }
}

/// One `<key>.json` file per snapshot inside a directory.
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new<P>(directory: P) -> Self
    where
        P: AsRef<Path>,
    {
        FileStore {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn snapshot_path(&self, key: &str) -> Result<PathBuf, EditorError> {
        let plain = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\', '\0']);
        if !plain {
            return Err(EditorError::storage(&format!(
                "'{}' cannot be used as a snapshot key",
                key
            )));
        }
        Ok(self.directory.join(format!("{}.json", key)))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, EditorError> {
        let path = self.snapshot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EditorError::storage(&format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save(&self, key: &str, snapshot: &str) -> Result<(), EditorError> {
        let path = self.snapshot_path(key)?;
        std::fs::create_dir_all(&self.directory)?;
        std::fs::write(&path, snapshot)?;
        log::debug!("Wrote snapshot '{}' to {}", key, path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), EditorError> {
        let path = self.snapshot_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("Removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
