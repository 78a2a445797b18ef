//! Path derivation utilities
//!
//! Entries live at `<root>/cache/<b0>/<b1>/<b2>/<rest>.<ext>` where `b0..b2` are the
//! first three digest bytes and `rest` is the hex of the remaining bytes.

use std::path::{Path, PathBuf};

/// Subdirectory of the configured root that holds all entries
pub const CACHE_SUBDIR: &str = "cache";

/// Default entry file extension
pub const DEFAULT_EXTENSION: &str = "db";

/// Number of one-byte shard directory levels
pub const SHARD_LEVELS: usize = 3;

/// Get the cache subtree for a given root
pub fn cache_dir(root: &Path) -> PathBuf {
    root.join(CACHE_SUBDIR)
}

/// Build the entry path for a key digest
///
/// Digests shorter than the shard levels plus one byte are not produced by any
/// supported hasher; they still map to a path, with missing levels omitted.
pub fn entry_path(root: &Path, digest: &[u8], extension: &str) -> PathBuf {
    let split = SHARD_LEVELS.min(digest.len());
    let mut path = cache_dir(root);
    for byte in &digest[..split] {
        path.push(hex::encode([*byte]));
    }

    let mut file_name = hex::encode(&digest[split..]);
    if !extension.is_empty() {
        file_name.push('.');
        file_name.push_str(extension);
    }
    path.push(file_name);
    path
}

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}
