//! Common utilities

use sha1::{Digest, Sha1};
use std::time::{Duration, SystemTime};

/// Hash algorithm used to derive entry locations from keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyHasher {
    /// 16-byte digest, compatible with existing cache trees
    #[default]
    Md5,
    /// 20-byte digest
    Sha1,
}

impl std::str::FromStr for KeyHasher {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(KeyHasher::Md5),
            "sha1" => Ok(KeyHasher::Sha1),
            _ => Err(format!("Unknown hasher: {}", s)),
        }
    }
}

impl KeyHasher {
    /// Digest length in bytes
    pub fn digest_len(self) -> usize {
        match self {
            KeyHasher::Md5 => 16,
            KeyHasher::Sha1 => 20,
        }
    }
}

/// Compute the raw digest of a key
pub fn hash_key(key: &[u8], hasher: KeyHasher) -> Vec<u8> {
    match hasher {
        KeyHasher::Md5 => md5::compute(key).0.to_vec(),
        KeyHasher::Sha1 => Sha1::digest(key).to_vec(),
    }
}

/// Current time in whole seconds since the Unix epoch
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Format seconds since epoch as RFC 3339 (UTC)
pub fn unix_to_rfc3339(secs: u64) -> Option<String> {
    let secs = i64::try_from(secs).ok()?;
    chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0).map(|dt| dt.to_rfc3339())
}

/// Parse a TTL: bare integers are seconds, anything else goes through humantime
/// (`30s`, `5m`, `2h`, `1d`, `1h 30m`). `0` means never expires.
pub fn parse_ttl(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty TTL".to_string());
    }

    if s.bytes().all(|b| b.is_ascii_digit()) {
        return s
            .parse()
            .map(Duration::from_secs)
            .map_err(|_| format!("TTL too large: {}", s));
    }

    humantime::parse_duration(s).map_err(|e| format!("Invalid TTL {:?}: {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_key_lengths() {
        let key = b"hello world";
        assert_eq!(hash_key(key, KeyHasher::Md5).len(), 16);
        assert_eq!(hash_key(key, KeyHasher::Sha1).len(), 20);
        assert_eq!(KeyHasher::Md5.digest_len(), 16);
        assert_eq!(KeyHasher::Sha1.digest_len(), 20);
    }

    #[test]
    fn test_hash_key_md5_known_value() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(
            hex::encode(hash_key(b"", KeyHasher::Md5)),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_hash_key_deterministic() {
        assert_eq!(
            hash_key(b"user:42", KeyHasher::Sha1),
            hash_key(b"user:42", KeyHasher::Sha1)
        );
        assert_ne!(
            hash_key(b"user:42", KeyHasher::Md5),
            hash_key(b"user:43", KeyHasher::Md5)
        );
    }

    #[test]
    fn test_hasher_from_str() {
        assert_eq!("MD5".parse::<KeyHasher>().unwrap(), KeyHasher::Md5);
        assert_eq!("sha1".parse::<KeyHasher>().unwrap(), KeyHasher::Sha1);
        assert!("crc32".parse::<KeyHasher>().is_err());
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_ttl("90").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_ttl("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_ttl("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_ttl("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_ttl("1d").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_ttl("1h 30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_ttl("250ms").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_parse_ttl_invalid() {
        assert!(parse_ttl("").is_err());
        assert!(parse_ttl("abc").is_err());
        assert!(parse_ttl("10 parsecs").is_err());
        assert!(parse_ttl("-5").is_err());
        assert!(parse_ttl("99999999999999999999999").is_err());
    }

    #[test]
    fn test_unix_to_rfc3339() {
        assert_eq!(
            unix_to_rfc3339(0).as_deref(),
            Some("1970-01-01T00:00:00+00:00")
        );
        assert!(unix_to_rfc3339(u64::MAX).is_none());
    }

    #[test]
    fn test_now_secs_is_recent() {
        // 2020-01-01
        assert!(now_secs() > 1_577_836_800);
    }
}
