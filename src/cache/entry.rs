//! Cache Entry Module
//!
//! Defines the index record kept for every cached payload.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// One record of the persisted index.
///
/// The payload itself lives in the backing store under `storage_key`; the
/// record only carries the metadata needed for eviction and expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Backing-store key of the payload
    pub storage_key: String,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
    /// Weighted length of the serialized payload
    pub size_bytes: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a record for `payload` expiring `expires_minutes` after `now_ms`.
    pub fn new(storage_key: String, payload: &str, now_ms: i64, expires_minutes: u64) -> Self {
        Self {
            storage_key,
            expires_at: expiry_from(now_ms, expires_minutes),
            size_bytes: byte_len(payload),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is stale only once `now_ms` is strictly
    /// past `expires_at`; at exactly `expires_at` it is still live.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }

    /// Resets expiry and size after the payload was rewritten with a fresh expiry.
    pub fn refresh(&mut self, payload: &str, now_ms: i64, expires_minutes: u64) {
        self.expires_at = expiry_from(now_ms, expires_minutes);
        self.size_bytes = byte_len(payload);
    }
}

fn expiry_from(now_ms: i64, expires_minutes: u64) -> i64 {
    let ttl_ms = i64::try_from(expires_minutes)
        .unwrap_or(i64::MAX)
        .saturating_mul(60_000);
    now_ms.saturating_add(ttl_ms)
}

// == Byte Length ==
/// Weighted payload length: each UTF-16 code unit above U+00FF counts twice.
pub fn byte_len(payload: &str) -> u64 {
    payload
        .chars()
        .map(|c| if u32::from(c) > 0xFF { 2 * c.len_utf16() as u64 } else { 1 })
        .sum()
}
