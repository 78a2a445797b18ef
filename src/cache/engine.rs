//! Cache engine - Get/Put/Delete/Remember over hashed, sharded entry files
//!
//! All public operations go through one reader/writer lock owned by the handle:
//! `get` and `inspect` share it, `put` and `delete` take it exclusively. `remember`
//! does not hold it across its get/produce/put sequence, so two concurrent calls for
//! the same missing key may both run their producer; the last write wins.

use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, SystemTime};

use crate::cache::options::CacheOptions;
use crate::cache::record::{CacheRecord, RecordHeader, HEADER_LEN};
use crate::cache::traits::{CacheReader, CacheWriter, KeyValueCache};
use crate::core::error::{CacheError, Result};
use crate::core::paths::entry_path;
use crate::core::util::{hash_key, now_secs};
use crate::store::EntryStore;

/// A cache rooted at one directory
#[derive(Debug)]
pub struct Cache {
    root: PathBuf,
    options: CacheOptions,
    lock: RwLock<()>,
}

/// Header-level view of a stored entry, see [`Cache::inspect`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: PathBuf,
    /// Seconds since epoch at write time
    pub created_at: u64,
    /// Zero means never expires
    pub expiration: Duration,
    /// Seconds since epoch, `None` if the entry never expires
    pub expires_at: Option<u64>,
    /// Payload length in bytes
    pub size: u64,
    pub expired: bool,
}

impl Cache {
    /// Create a cache under `root` with default options.
    /// No directories are created until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_options(root, CacheOptions::default())
    }

    pub fn with_options(root: impl Into<PathBuf>, options: CacheOptions) -> Self {
        Self {
            root: root.into(),
            options,
            lock: RwLock::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Storage path for `key`. Pure function of the key, the root and the options.
    pub fn path_for(&self, key: &[u8]) -> PathBuf {
        let digest = hash_key(key, self.options.hasher);
        let path = entry_path(&self.root, &digest, &self.options.extension);
        tracing::trace!(path = %path.display(), "derived entry path");
        path
    }

    /// Fetch the payload stored under `key`.
    ///
    /// An expired entry yields [`CacheError::Expired`] and is removed on a best-effort
    /// basis; a removal failure is logged and otherwise ignored.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let _guard = self.read_guard();

        let entry = EntryStore::new(self.path_for(key));
        let data = entry.read()?;
        let record = decode_record(entry.path(), data)?;

        if record.header().is_live_at(SystemTime::now()) {
            return Ok(record.payload);
        }

        if let Err(err) = entry.remove() {
            tracing::debug!(path = %entry.path().display(), error = %err, "expired entry cleanup failed");
        } else {
            tracing::debug!(path = %entry.path().display(), "removed expired entry");
        }

        Err(CacheError::Expired {
            path: entry.path().to_path_buf(),
        })
    }

    /// Store `value` under `key`, replacing any existing entry.
    /// `expiration == Duration::ZERO` means the entry never expires.
    pub fn put(&self, key: &[u8], value: &[u8], expiration: Duration) -> Result<()> {
        let _guard = self.write_guard();

        let record = CacheRecord::new(value.to_vec(), expiration, now_secs());
        let entry = EntryStore::new(self.path_for(key));
        entry.write(&record.encode())?;

        tracing::debug!(
            path = %entry.path().display(),
            size = value.len(),
            expiration = ?expiration,
            "stored entry"
        );
        Ok(())
    }

    /// Remove the entry under `key`. Deleting a missing key is an error.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let _guard = self.write_guard();

        let entry = EntryStore::new(self.path_for(key));
        entry.remove()?;

        tracing::debug!(path = %entry.path().display(), "deleted entry");
        Ok(())
    }

    /// Return the cached value for `key`, or compute it with `producer` and store it.
    ///
    /// Any `get` failure triggers the producer. A producer error is returned as
    /// [`CacheError::Producer`]; if storing the fresh value fails, that error is returned.
    pub fn remember<F, E>(&self, key: &[u8], expiration: Duration, producer: F) -> Result<Vec<u8>>
    where
        F: FnOnce() -> std::result::Result<Vec<u8>, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        <Self as KeyValueCache>::remember(self, key, expiration, producer)
    }

    /// Read the header of the entry under `key` without enforcing expiration
    pub fn inspect(&self, key: &[u8]) -> Result<EntryInfo> {
        let _guard = self.read_guard();

        let entry = EntryStore::new(self.path_for(key));
        let data = entry.read()?;
        let len = data.len();
        let header = RecordHeader::parse(&data).ok_or_else(|| CacheError::Corrupt {
            path: entry.path().to_path_buf(),
            len,
        })?;

        Ok(EntryInfo {
            path: entry.path().to_path_buf(),
            created_at: header.created_at,
            expiration: header.expiration,
            expires_at: header.expires_at(),
            size: (len - HEADER_LEN) as u64,
            expired: !header.is_live_at(SystemTime::now()),
        })
    }

    pub(crate) fn read_guard(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn write_guard(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl CacheReader for Cache {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        Cache::get(self, key)
    }
}

impl CacheWriter for Cache {
    fn put(&self, key: &[u8], value: &[u8], expiration: Duration) -> Result<()> {
        Cache::put(self, key, value, expiration)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        Cache::delete(self, key)
    }
}

impl KeyValueCache for Cache {}

fn decode_record(path: &Path, data: Vec<u8>) -> Result<CacheRecord> {
    let len = data.len();
    CacheRecord::decode(data).ok_or_else(|| CacheError::Corrupt {
        path: path.to_path_buf(),
        len,
    })
}
