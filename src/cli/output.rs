//! Output DTOs for the command line front end
//!
//! Every command prints exactly one of these as a JSON object.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheEntry, CacheStats};

/// Output of `get`
#[derive(Debug, Clone, Serialize)]
pub struct GetOutput {
    /// The requested key
    pub key: String,
    pub found: bool,
    /// The cached value, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl GetOutput {
    pub fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            found: value.is_some(),
            value,
        }
    }
}

/// Output of `put`, `remove`, `remove-last` and `clear`
#[derive(Debug, Clone, Serialize)]
pub struct MessageOutput {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl MessageOutput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: None,
        }
    }

    pub fn for_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

/// One index record as shown by `list` and `remove-last`
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub storage_key: String,
    /// Expiry in RFC 3339, or the raw millisecond value if out of range
    pub expires_at: String,
    pub size_bytes: u64,
}

impl From<&CacheEntry> for EntryView {
    fn from(entry: &CacheEntry) -> Self {
        let expires_at = DateTime::<Utc>::from_timestamp_millis(entry.expires_at)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| entry.expires_at.to_string());
        Self {
            storage_key: entry.storage_key.clone(),
            expires_at,
            size_bytes: entry.size_bytes,
        }
    }
}

/// Output of `list`
#[derive(Debug, Clone, Serialize)]
pub struct ListOutput {
    pub namespace: String,
    pub capacity: usize,
    /// Most recently used first
    pub entries: Vec<EntryView>,
}

/// Output of `stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    pub namespace: String,
    pub capacity: usize,
    pub total_entries: usize,
    /// Entries dropped by the sweep when this process opened the cache
    pub expired: u64,
    pub evictions: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl StatsOutput {
    pub fn new(namespace: impl Into<String>, capacity: usize, stats: &CacheStats) -> Self {
        Self {
            namespace: namespace.into(),
            capacity,
            total_entries: stats.total_entries,
            expired: stats.expired,
            evictions: stats.evictions,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate(),
        }
    }
}
