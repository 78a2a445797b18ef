//! Store module - Exclusive access to single entry files
//!
//! Provides:
//! - EntryStore: read/write/remove of one blob at one path, guarded by its own lock

pub mod entry;

pub use entry::EntryStore;
