//! Cache module - The hashed, sharded key/value engine
//!
//! Provides:
//! - Record encoding (16-byte expiration/timestamp header + payload)
//! - The `Cache` handle: get/put/delete/remember/inspect
//! - Reader/writer traits implemented by `Cache`
//! - Tree maintenance: sweep/stats/clear
//! - Cache options

pub mod engine;
pub mod maintenance;
pub mod options;
pub mod record;
pub mod traits;

pub use engine::{Cache, EntryInfo};
pub use maintenance::{CacheStats, SweepReport};
pub use options::CacheOptions;
pub use record::CacheRecord;
pub use traits::{CacheReader, CacheWriter, KeyValueCache};
