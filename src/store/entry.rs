//! Entry store - Read/write/remove a single cache file
//!
//! An `EntryStore` is built for one operation and dropped afterwards. Its lock only
//! serializes the calls made through that instance; there is no coordination across
//! instances or processes.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::error::{CacheError, Result};

/// Guarded access to the blob stored at one path
#[derive(Debug)]
pub struct EntryStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl EntryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the entry contents, creating missing parent directories
    pub fn write(&self, data: &[u8]) -> Result<()> {
        let _guard = self.write_guard();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| CacheError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&self.path, data).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Read the full entry contents
    pub fn read(&self) -> Result<Vec<u8>> {
        let _guard = self.read_guard();
        fs::read(&self.path).map_err(|e| CacheError::from_io(&self.path, e))
    }

    /// Delete the entry. A missing file is reported as [`CacheError::NotFound`].
    pub fn remove(&self) -> Result<()> {
        let _guard = self.write_guard();
        fs::remove_file(&self.path).map_err(|e| CacheError::from_io(&self.path, e))
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a/b/c/entry.db");
        let store = EntryStore::new(&path);

        store.write(b"payload").unwrap();
        assert!(path.exists());
        assert_eq!(store.read().unwrap(), b"payload");
    }

    #[test]
    fn test_write_replaces_content() {
        let temp = tempdir().unwrap();
        let store = EntryStore::new(temp.path().join("entry.db"));

        store.write(b"a much longer first value").unwrap();
        store.write(b"short").unwrap();
        assert_eq!(store.read().unwrap(), b"short");
    }

    #[test]
    fn test_write_empty() {
        let temp = tempdir().unwrap();
        let store = EntryStore::new(temp.path().join("empty.db"));

        store.write(&[]).unwrap();
        assert!(store.read().unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let temp = tempdir().unwrap();
        let store = EntryStore::new(temp.path().join("missing.db"));

        let err = store.read().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("x/entry.db");
        let store = EntryStore::new(&path);

        store.write(b"v").unwrap();
        store.remove().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_missing_is_error() {
        let temp = tempdir().unwrap();
        let store = EntryStore::new(temp.path().join("missing.db"));

        let err = store.remove().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_write_fails_when_parent_is_a_file() {
        let temp = tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();

        let store = EntryStore::new(blocker.join("entry.db"));
        let err = store.write(b"v").unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
