//! Cache record encoding
//!
//! Layout: `[expiration: u64 BE nanoseconds][created_at: u64 BE seconds][payload..]`.
//! The payload has no length prefix; it is everything after the 16-byte header.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Size of the fixed record header in bytes
pub const HEADER_LEN: usize = 16;

/// The unit persisted for each key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Zero means the record never expires
    pub expiration: Duration,
    /// Seconds since the Unix epoch at write time
    pub created_at: u64,
    pub payload: Vec<u8>,
}

impl CacheRecord {
    pub fn new(payload: Vec<u8>, expiration: Duration, created_at: u64) -> Self {
        Self {
            expiration,
            created_at,
            payload,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.payload.len());
        buf.extend_from_slice(&duration_to_nanos(self.expiration).to_be_bytes());
        buf.extend_from_slice(&self.created_at.to_be_bytes());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Decode a record. Returns `None` if `data` is shorter than the header.
    pub fn decode(mut data: Vec<u8>) -> Option<Self> {
        let header = RecordHeader::parse(&data)?;
        let payload = data.split_off(HEADER_LEN);
        Some(Self {
            expiration: header.expiration,
            created_at: header.created_at,
            payload,
        })
    }

    pub fn header(&self) -> RecordHeader {
        RecordHeader {
            expiration: self.expiration,
            created_at: self.created_at,
        }
    }
}

/// Expiration metadata of a record, readable without taking the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub expiration: Duration,
    pub created_at: u64,
}

impl RecordHeader {
    pub fn parse(data: &[u8]) -> Option<Self> {
        let expiration: [u8; 8] = data.get(0..8)?.try_into().ok()?;
        let created_at: [u8; 8] = data.get(8..HEADER_LEN)?.try_into().ok()?;
        Some(Self {
            expiration: Duration::from_nanos(u64::from_be_bytes(expiration)),
            created_at: u64::from_be_bytes(created_at),
        })
    }

    /// Expiry instant in whole seconds, or `None` for records that never expire
    pub fn expires_at(&self) -> Option<u64> {
        if self.expiration.is_zero() {
            return None;
        }
        Some(
            self.created_at
                .saturating_add(self.expiration.as_secs())
                .saturating_add(u64::from(self.expiration.subsec_nanos() > 0)),
        )
    }

    /// A record is live while `created_at + expiration` is strictly after `now`
    pub fn is_live_at(&self, now: SystemTime) -> bool {
        if self.expiration.is_zero() {
            return true;
        }
        UNIX_EPOCH
            .checked_add(Duration::from_secs(self.created_at))
            .and_then(|created| created.checked_add(self.expiration))
            .map_or(true, |deadline| deadline > now)
    }
}

fn duration_to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
