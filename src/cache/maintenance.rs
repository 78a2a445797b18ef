//! Cache maintenance - Operations over the whole entry tree
//!
//! Provides:
//! - sweep: remove every expired entry
//! - stats: count entries and bytes
//! - clear: drop the whole cache subtree

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::cache::engine::Cache;
use crate::cache::record::{RecordHeader, HEADER_LEN};
use crate::core::error::{CacheError, Result};
use crate::core::paths::{cache_dir, SHARD_LEVELS};
use crate::store::EntryStore;

/// Outcome of [`Cache::sweep`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// Entry files examined
    pub scanned: u64,
    /// Expired entries deleted
    pub removed: u64,
    /// Entries too short to carry a header (left in place)
    pub corrupt: u64,
    /// Expired entries or unreadable files that could not be handled
    pub failed: u64,
}

/// Snapshot returned by [`Cache::stats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    /// On-disk bytes, headers included
    pub total_bytes: u64,
    /// Entries past their expiration that have not been removed yet
    pub expired: u64,
    pub corrupt: u64,
}

impl Cache {
    /// Remove all expired entries under the cache directory
    pub fn sweep(&self) -> Result<SweepReport> {
        let _guard = self.write_guard();
        let now = SystemTime::now();
        let mut report = SweepReport::default();

        for path in self.entry_files() {
            report.scanned += 1;

            let header = match read_header(&path) {
                Ok(Some(header)) => header,
                Ok(None) => {
                    report.corrupt += 1;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "unreadable entry");
                    report.failed += 1;
                    continue;
                }
            };

            if header.is_live_at(now) {
                continue;
            }

            match EntryStore::new(&path).remove() {
                Ok(()) => report.removed += 1,
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "failed to remove expired entry");
                    report.failed += 1;
                }
            }
        }

        tracing::debug!(
            scanned = report.scanned,
            removed = report.removed,
            corrupt = report.corrupt,
            failed = report.failed,
            "sweep finished"
        );
        Ok(report)
    }

    /// Count entries, bytes and expired entries
    pub fn stats(&self) -> Result<CacheStats> {
        let _guard = self.read_guard();
        let now = SystemTime::now();
        let mut stats = CacheStats::default();

        // Concurrent gets may delete expired entries under the shared lock,
        // so files listed by the walk can disappear before they are read.
        for path in self.entry_files() {
            let size = match fs::metadata(&path) {
                Ok(metadata) => metadata.len(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(CacheError::from_io(&path, e)),
            };
            let header = match read_header(&path) {
                Ok(header) => header,
                Err(err) if err.is_not_found() => continue,
                Err(err) => return Err(err),
            };

            stats.entries += 1;
            stats.total_bytes += size;
            match header {
                Some(header) if !header.is_live_at(now) => stats.expired += 1,
                Some(_) => {}
                None => stats.corrupt += 1,
            }
        }

        Ok(stats)
    }

    /// Delete the whole cache subtree. A missing subtree is not an error.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_guard();
        let dir = cache_dir(self.root());

        match fs::remove_dir_all(&dir) {
            Ok(()) => {
                tracing::debug!(path = %dir.display(), "cleared cache");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { path: dir, source }),
        }
    }

    /// Entry files at the leaf level of the shard tree, in a stable order
    fn entry_files(&self) -> Vec<PathBuf> {
        let dir = cache_dir(self.root());
        if !dir.exists() {
            return Vec::new();
        }

        let extension = self.options().extension.as_str();
        WalkDir::new(&dir)
            .min_depth(SHARD_LEVELS + 1)
            .max_depth(SHARD_LEVELS + 1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable cache path");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| has_extension(path, extension))
            .collect()
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    match path.extension() {
        Some(ext) => ext == extension,
        None => extension.is_empty(),
    }
}

/// Read only the record header. `Ok(None)` means the file is too short.
fn read_header(path: &Path) -> Result<Option<RecordHeader>> {
    let mut file = File::open(path).map_err(|e| CacheError::from_io(path, e))?;
    let mut buf = [0u8; HEADER_LEN];
    match file.read_exact(&mut buf) {
        Ok(()) => Ok(RecordHeader::parse(&buf)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(CacheError::from_io(path, e)),
    }
}
