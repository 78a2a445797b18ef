//! shardcache - A filesystem-backed key/value cache with per-entry expiration
//!
//! Keys are hashed and the digest picks the entry file:
//! `<root>/cache/<b0>/<b1>/<b2>/<hex rest>.db`. Each file holds a 16-byte header
//! (expiration, creation time) followed by the raw payload.
//!
//! ```no_run
//! use std::time::Duration;
//! use shardcache::Cache;
//!
//! # fn main() -> shardcache::Result<()> {
//! let cache = Cache::new("/var/tmp/app");
//! cache.put(b"user:42", b"{\"name\":\"ada\"}", Duration::from_secs(300))?;
//! let value = cache.remember(b"user:43", Duration::ZERO, || {
//!     Ok::<_, std::io::Error>(b"computed".to_vec())
//! })?;
//! # let _ = value;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod core;
pub mod store;

pub use crate::cache::{
    Cache, CacheOptions, CacheReader, CacheRecord, CacheStats, CacheWriter, EntryInfo,
    KeyValueCache, SweepReport,
};
pub use crate::core::error::{CacheError, Result};
pub use crate::core::util::KeyHasher;
