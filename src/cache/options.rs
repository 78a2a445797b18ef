//! Cache configuration

use crate::core::paths::DEFAULT_EXTENSION;
use crate::core::util::KeyHasher;

/// Options for [`crate::Cache::with_options`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheOptions {
    /// Digest used for path derivation
    pub hasher: KeyHasher,
    /// Entry file extension, without the leading dot (empty for none)
    pub extension: String,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            hasher: KeyHasher::default(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl CacheOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key hasher
    pub fn with_hasher(mut self, hasher: KeyHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Set the entry file extension; a leading dot is stripped
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }
}
