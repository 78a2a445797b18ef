//! Cache error types

use std::path::PathBuf;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, CacheError>;

/// Errors returned by the cache engine and the entry store
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// No entry exists at the derived path
    #[error("item not in cache: {}", path.display())]
    NotFound { path: PathBuf },

    /// An entry exists but its expiration has passed
    #[error("item not in cache (expired): {}", path.display())]
    Expired { path: PathBuf },

    /// Storage-level failure other than absence
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry is too short to hold the record header
    #[error("corrupt cache entry at {} ({len} bytes, header needs 16)", path.display())]
    Corrupt { path: PathBuf, len: usize },

    /// The fallback producer passed to `remember` failed; displayed as-is
    #[error(transparent)]
    Producer(Box<dyn std::error::Error + Send + Sync>),
}

impl CacheError {
    /// Map an I/O error for `path`, turning `ErrorKind::NotFound` into [`CacheError::NotFound`]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            CacheError::NotFound { path }
        } else {
            CacheError::Io { path, source }
        }
    }

    /// True for errors that mean "the value is not available" (absent or expired)
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::NotFound { .. } | CacheError::Expired { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }

    /// Short machine-readable code, used by the CLI result model
    pub fn code(&self) -> &'static str {
        match self {
            CacheError::NotFound { .. } => "NOT_FOUND",
            CacheError::Expired { .. } => "EXPIRED",
            CacheError::Io { .. } => "IO_ERROR",
            CacheError::Corrupt { .. } => "CORRUPT",
            CacheError::Producer(_) => "PRODUCER_ERROR",
        }
    }
}
