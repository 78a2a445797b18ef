//! Result model for the command-line front end
//!
//! CLI commands map their outcome to `ResultItem`s before rendering. `get` and `remember`
//! print raw bytes on success; any failed cache operation becomes an error item.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A single cache entry (put/delete/inspect/remember)
    Entry,
    /// A derived storage path
    Path,
    /// Aggregate outcome of a tree operation (sweep/stats/clear)
    Report,
    Error,
}

/// Entry metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Payload size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Creation time (RFC 3339)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Expiry time (RFC 3339); absent for entries that never expire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,

    /// Expiration in seconds, 0 for never
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,

    #[serde(default)]
    pub expired: bool,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultError {
    pub code: String,
    pub message: String,
}

impl ResultError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// One rendered outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// The key as given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Entry path relative to the cache root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Free-form note (e.g. "stored", "deleted")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Structured payload for reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(default)]
    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ResultError>,
}

impl ResultItem {
    fn with_kind(kind: Kind) -> Self {
        Self {
            kind,
            key: None,
            path: None,
            status: None,
            data: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create an entry result
    pub fn entry(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            path: Some(path.into()),
            ..Self::with_kind(Kind::Entry)
        }
    }

    /// Create a path result
    pub fn path(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            path: Some(path.into()),
            ..Self::with_kind(Kind::Path)
        }
    }

    /// Create a report result carrying structured data
    pub fn report(status: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            status: Some(status.into()),
            data: Some(data),
            ..Self::with_kind(Kind::Report)
        }
    }

    /// Create an error result
    pub fn error(error: ResultError) -> Self {
        Self {
            errors: vec![error],
            ..Self::with_kind(Kind::Error)
        }
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<ResultItem> for ResultSet {
    fn from(item: ResultItem) -> Self {
        Self { items: vec![item] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serialization_skips_empty_fields() {
        let item = ResultItem::entry("user:1", "cache/aa/bb/cc/dd.db").with_status("stored");
        let json = serde_json::to_string(&item).unwrap();

        assert!(json.contains("\"kind\":\"entry\""));
        assert!(json.contains("\"key\":\"user:1\""));
        assert!(json.contains("\"status\":\"stored\""));
        assert!(!json.contains("errors"));
        assert!(!json.contains("\"data\""));
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn test_error_item() {
        let item = ResultItem::error(ResultError::new("NOT_FOUND", "item not in cache"));
        assert_eq!(item.kind, Kind::Error);
        assert_eq!(item.errors.len(), 1);
        assert!(item.key.is_none());
    }

    #[test]
    fn test_report_roundtrip() {
        let item = ResultItem::report("swept", serde_json::json!({"removed": 2}));
        let json = serde_json::to_string(&item).unwrap();
        let back: ResultItem = serde_json::from_str(&json).unwrap();

        assert_eq!(back.kind, Kind::Report);
        assert_eq!(back.data.unwrap()["removed"], 2);
    }

    #[test]
    fn test_result_set_from_item() {
        let set = ResultSet::from(ResultItem::path("k", "cache/a.db"));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert!(ResultSet::new().is_empty());
    }
}
