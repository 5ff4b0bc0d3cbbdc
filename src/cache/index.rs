//! Cache Index Module
//!
//! Recency-ordered list of index records, persisted as one JSON array.

use std::collections::{HashSet, VecDeque};

use tracing::warn;

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

/// Outcome of [`CacheIndex::promote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Promotion {
    /// The record moved to the front
    Moved,
    /// The record was already at the front
    AlreadyHead,
    /// No record has that key
    Missing,
}

impl Promotion {
    pub fn is_indexed(self) -> bool {
        self != Promotion::Missing
    }
}

// == Cache Index ==
/// Tracks access order for LRU eviction.
///
/// Records are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// No two records share a storage key.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CacheIndex {
    /// Records by access time
    order: VecDeque<CacheEntry>,
}

impl CacheIndex {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Decode ==
    /// Parses a persisted index.
    ///
    /// Duplicate storage keys in the stored data are collapsed, keeping the
    /// occurrence nearest the head.
    pub fn from_json(raw: &str) -> Result<Self> {
        let records: Vec<CacheEntry> =
            serde_json::from_str(raw).map_err(CacheError::MalformedIndex)?;

        let mut seen = HashSet::with_capacity(records.len());
        let total = records.len();
        let order: VecDeque<CacheEntry> = records
            .into_iter()
            .filter(|entry| seen.insert(entry.storage_key.clone()))
            .collect();
        if order.len() != total {
            warn!(
                dropped = total - order.len(),
                "persisted index held duplicate storage keys"
            );
        }

        Ok(Self { order })
    }

    // == Encode ==
    /// Serializes the index head-first.
    pub fn to_json(&self) -> String {
        // A sequence of plain structs with string keys cannot fail to encode.
        serde_json::to_string(&self.order).unwrap_or_else(|_| "[]".to_string())
    }

    // == Promote ==
    /// Moves the record for `storage_key` to the front.
    ///
    /// Reports whether anything changed.
    pub fn promote(&mut self, storage_key: &str) -> Promotion {
        match self.position(storage_key) {
            Some(0) => Promotion::AlreadyHead,
            Some(pos) => {
                if let Some(entry) = self.order.remove(pos) {
                    self.order.push_front(entry);
                }
                Promotion::Moved
            }
            None => Promotion::Missing,
        }
    }

    // == Insert ==
    /// Adds a record at the front, replacing any record with the same key.
    pub fn push_front(&mut self, entry: CacheEntry) {
        self.remove(&entry.storage_key);
        self.order.push_front(entry);
    }

    // == Remove ==
    /// Removes and returns the record for `storage_key`.
    pub fn remove(&mut self, storage_key: &str) -> Option<CacheEntry> {
        self.position(storage_key)
            .and_then(|pos| self.order.remove(pos))
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used record.
    ///
    /// Returns None if the index is empty.
    pub fn pop_back(&mut self) -> Option<CacheEntry> {
        self.order.pop_back()
    }

    // == Peek Oldest ==
    /// Returns the least recently used record without removing it.
    #[allow(dead_code)]
    pub fn peek_back(&self) -> Option<&CacheEntry> {
        self.order.back()
    }

    // == Sweep ==
    /// Drops every record expired at `now_ms`, returning the dropped ones.
    ///
    /// The retained sequence is rebuilt in one pass; relative order of the
    /// survivors is unchanged.
    pub fn sweep(&mut self, now_ms: i64) -> Vec<CacheEntry> {
        let (expired, retained): (Vec<_>, Vec<_>) = std::mem::take(&mut self.order)
            .into_iter()
            .partition(|entry| entry.is_expired(now_ms));
        self.order = retained.into();
        expired
    }

    // == Drain ==
    /// Empties the index, returning every record head-first.
    pub fn drain(&mut self) -> Vec<CacheEntry> {
        self.order.drain(..).collect()
    }

    pub fn get(&self, storage_key: &str) -> Option<&CacheEntry> {
        self.order.iter().find(|e| e.storage_key == storage_key)
    }

    pub fn get_mut(&mut self, storage_key: &str) -> Option<&mut CacheEntry> {
        self.order.iter_mut().find(|e| e.storage_key == storage_key)
    }

    // == Length ==
    /// Returns the number of tracked records.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, storage_key: &str) -> bool {
        self.position(storage_key).is_some()
    }

    /// Iterates records from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry> {
        self.order.iter()
    }

    fn position(&self, storage_key: &str) -> Option<usize> {
        self.order.iter().position(|e| e.storage_key == storage_key)
    }
}
