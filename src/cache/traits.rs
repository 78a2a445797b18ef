//! Cache traits - Read/write views over a key/value cache
//!
//! `Cache` implements all three. Code that only reads can take a `&dyn CacheReader`;
//! tests can swap in any other implementation.

use std::time::Duration;

use crate::core::error::{CacheError, Result};

/// Read access to cached values
pub trait CacheReader {
    /// Fetch the live payload stored under `key`
    fn get(&self, key: &[u8]) -> Result<Vec<u8>>;
}

/// Write access to cached values
pub trait CacheWriter {
    /// Store `value` under `key`; `Duration::ZERO` means never expires
    fn put(&self, key: &[u8], value: &[u8], expiration: Duration) -> Result<()>;

    /// Remove the entry under `key`; a missing key is an error
    fn delete(&self, key: &[u8]) -> Result<()>;
}

/// A full cache: reads, writes and read-or-compute
pub trait KeyValueCache: CacheReader + CacheWriter {
    /// Return the value under `key`, or run `producer` and store its result.
    ///
    /// Any `get` failure runs the producer. No lock is held across the sequence,
    /// so concurrent callers missing the same key may each run their producer.
    fn remember<F, E>(&self, key: &[u8], expiration: Duration, producer: F) -> Result<Vec<u8>>
    where
        Self: Sized,
        F: FnOnce() -> std::result::Result<Vec<u8>, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match self.get(key) {
            Ok(data) => Ok(data),
            Err(err) => {
                tracing::debug!(error = %err, "cache miss, running producer");
                let data = producer().map_err(|e| CacheError::Producer(e.into()))?;
                self.put(key, &data, expiration)?;
                Ok(data)
            }
        }
    }
}
