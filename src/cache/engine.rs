//! LRU Cache Engine
//!
//! Size-bounded, recency-ordered cache layered over a `PersistentStore`.
//!
//! Every mutation is written through: the payload under its storage key and
//! the whole index under the namespace's index key. Storage failures are
//! logged and absorbed, so every public operation is total.
//!
//! # Expiry
//! With the default [`ExpiryPolicy::Lazy`], stale entries are only removed by
//! the sweep that runs when a cache is constructed; `get` returns whatever is
//! stored. [`ExpiryPolicy::Eager`] additionally makes `get` drop an entry whose
//! expiry has passed.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::hash;
use crate::cache::index::Promotion;
use crate::cache::{CacheEntry, CacheIndex, CacheStats, Clock, SystemClock};
use crate::config::{CacheConfig, ClearScope, ExpiryPolicy};
use crate::error::{CacheError, StoreError};
use crate::storage::PersistentStore;

// == LRU Cache ==
/// One namespace's bounded pool of cached values.
#[derive(Debug)]
pub struct LruCache<S> {
    /// Human-readable namespace name
    namespace: String,
    /// Storage key the index is persisted under
    index_key: String,
    /// Maximum number of indexed entries
    capacity: usize,
    /// Expiry for puts that do not name one
    default_expires_minutes: u64,
    expiry: ExpiryPolicy,
    clear_scope: ClearScope,
    /// Recency-ordered index records
    index: CacheIndex,
    /// Backing store
    store: S,
    clock: Arc<dyn Clock>,
    stats: CacheStats,
}

impl<S: PersistentStore> LruCache<S> {
    // == Constructor ==
    /// Opens the cache for `namespace` over `store` with default settings.
    ///
    /// # Arguments
    /// * `namespace` - Name partitioning this cache from others on the same store
    /// * `capacity` - Maximum number of entries kept
    /// * `store` - Backing persistent store
    pub fn new(namespace: impl Into<String>, capacity: usize, store: S) -> Self {
        let config = CacheConfig::default().with_capacity(capacity);
        Self::with_config(namespace, &config, store, Arc::new(SystemClock))
    }

    /// Opens the cache with explicit configuration and clock.
    ///
    /// Loads the persisted index (an absent or unreadable index starts the
    /// cache empty), then sweeps expired entries and persists the result once.
    pub fn with_config(
        namespace: impl Into<String>,
        config: &CacheConfig,
        store: S,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let namespace = namespace.into();
        let capacity = if config.capacity == 0 {
            warn!(namespace = %namespace, "capacity 0 requested, using 1");
            1
        } else {
            config.capacity
        };

        let mut cache = Self {
            index_key: hash::index_key(&namespace),
            namespace,
            capacity,
            default_expires_minutes: config.default_expires_minutes,
            expiry: config.expiry,
            clear_scope: config.clear_scope,
            index: CacheIndex::new(),
            store,
            clock,
            stats: CacheStats::new(),
        };
        cache.index = cache.load_index();
        cache.sweep_on_open();
        cache
    }

    // == Put ==
    /// Caches `value` under `key`.
    ///
    /// A key already indexed is promoted to most recently used; its expiry and
    /// size only change when `expires_minutes` is given. A new key evicts the
    /// least recently used entry first if the cache is full.
    ///
    /// # Arguments
    /// * `key` - Logical key
    /// * `value` - Any serializable value
    /// * `expires_minutes` - Lifetime in minutes (uses the configured default if None)
    pub fn put<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
        expires_minutes: Option<u64>,
    ) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(source) => {
                let err = CacheError::Serialize(source);
                warn!(namespace = %self.namespace, error = %err, "put skipped");
                return;
            }
        };

        let storage_key = hash::storage_key(&self.namespace, key);
        let now = self.clock.now_ms();

        // A stale record is replaced, not revived with its old expiry
        let dropped_stale = self.expiry == ExpiryPolicy::Eager
            && self
                .index
                .get(&storage_key)
                .is_some_and(|entry| entry.is_expired(now));
        if dropped_stale {
            self.index.remove(&storage_key);
            self.remove_payload(&storage_key);
            self.stats.record_expired(1);
        }

        // Write before evicting so a failed put costs no other entry
        if let Err(err) = self.store.write(&storage_key, &payload) {
            self.log_store_failure(err, "failed to write payload");
            if dropped_stale {
                self.persist_index();
            }
            return;
        }

        let is_new = !self.index.promote(&storage_key).is_indexed();
        if is_new {
            while self.index.len() >= self.capacity {
                if self.evict_tail().is_none() {
                    break;
                }
            }
            let minutes = expires_minutes.unwrap_or(self.default_expires_minutes);
            self.index
                .push_front(CacheEntry::new(storage_key.clone(), &payload, now, minutes));
        } else if let Some(minutes) = expires_minutes {
            if let Some(entry) = self.index.get_mut(&storage_key) {
                entry.refresh(&payload, now, minutes);
            }
        }
        debug!(namespace = %self.namespace, storage_key = %storage_key, is_new, "put");

        self.persist_index();
    }

    // == Get ==
    /// Returns the value cached under `key`, promoting it to most recently used.
    ///
    /// Returns None when nothing is stored or the stored payload does not
    /// decode as `T`. A payload that fails to decode is left in place.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let storage_key = hash::storage_key(&self.namespace, key);

        if self.expiry == ExpiryPolicy::Eager && self.drop_if_expired(&storage_key) {
            self.stats.record_miss();
            return None;
        }

        if self.index.promote(&storage_key) == Promotion::Moved {
            self.persist_index();
        }

        let raw = match self.store.read(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.stats.record_miss();
                return None;
            }
            Err(err) => {
                self.log_store_failure(err, "failed to read payload");
                self.stats.record_miss();
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                self.stats.record_hit();
                Some(value)
            }
            Err(source) => {
                let err = CacheError::MalformedPayload {
                    storage_key,
                    source,
                };
                warn!(namespace = %self.namespace, error = %err, "payload not returned");
                self.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Drops the entry for `key`. A key that is not cached is a no-op.
    pub fn remove(&mut self, key: &str) {
        let storage_key = hash::storage_key(&self.namespace, key);
        if let Some(entry) = self.index.remove(&storage_key) {
            self.remove_payload(&entry.storage_key);
            self.persist_index();
            debug!(namespace = %self.namespace, storage_key = %storage_key, "removed");
        }
    }

    // == Move To Head ==
    /// Marks `key` as most recently used without reading its payload.
    ///
    /// Returns false if `key` is not cached.
    pub fn move_to_head(&mut self, key: &str) -> bool {
        let storage_key = hash::storage_key(&self.namespace, key);
        match self.index.promote(&storage_key) {
            Promotion::Moved => {
                self.persist_index();
                true
            }
            Promotion::AlreadyHead => true,
            Promotion::Missing => false,
        }
    }

    // == Remove Last ==
    /// Evicts the least recently used entry, returning its index record.
    pub fn remove_last(&mut self) -> Option<CacheEntry> {
        let evicted = self.evict_tail();
        if evicted.is_some() {
            self.persist_index();
        }
        evicted
    }

    // == Clear ==
    /// Empties the cache.
    ///
    /// With [`ClearScope::Namespace`] only this cache's payloads and index are
    /// deleted; [`ClearScope::Store`] wipes the entire backing store.
    pub fn clear(&mut self) {
        let entries = self.index.drain();
        match self.clear_scope {
            ClearScope::Namespace => {
                for entry in &entries {
                    self.remove_payload(&entry.storage_key);
                }
                if let Err(err) = self.store.remove(&self.index_key) {
                    self.log_store_failure(err, "failed to remove index");
                }
            }
            ClearScope::Store => {
                if let Err(err) = self.store.clear() {
                    self.log_store_failure(err, "failed to clear store");
                }
            }
        }
        info!(namespace = %self.namespace, cleared = entries.len(), scope = ?self.clear_scope, "cache cleared");
    }

    // == Accessors ==
    /// Returns true if `key` has an index record.
    pub fn contains(&self, key: &str) -> bool {
        self.index
            .contains(&hash::storage_key(&self.namespace, key))
    }

    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Index records, most recently used first.
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry> {
        self.index.iter()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Releases the backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    // == Internals ==
    fn load_index(&self) -> CacheIndex {
        match self.store.read(&self.index_key) {
            Ok(Some(raw)) => CacheIndex::from_json(&raw).unwrap_or_else(|err| {
                warn!(namespace = %self.namespace, error = %err, "starting with empty index");
                CacheIndex::new()
            }),
            Ok(None) => CacheIndex::new(),
            Err(err) => {
                self.log_store_failure(err, "failed to read index");
                CacheIndex::new()
            }
        }
    }

    fn sweep_on_open(&mut self) {
        let expired = self.index.sweep(self.clock.now_ms());
        for entry in &expired {
            self.remove_payload(&entry.storage_key);
        }
        self.stats.record_expired(expired.len());

        // Capacity may have shrunk since the index was written
        let mut trimmed = 0usize;
        while self.index.len() > self.capacity {
            if self.evict_tail().is_none() {
                break;
            }
            trimmed += 1;
        }

        if !expired.is_empty() || trimmed > 0 {
            self.persist_index();
        }
        info!(
            namespace = %self.namespace,
            entries = self.index.len(),
            expired = expired.len(),
            trimmed,
            "cache opened"
        );
    }

    fn drop_if_expired(&mut self, storage_key: &str) -> bool {
        let now = self.clock.now_ms();
        let expired = self
            .index
            .get(storage_key)
            .is_some_and(|entry| entry.is_expired(now));
        if expired {
            self.index.remove(storage_key);
            self.remove_payload(storage_key);
            self.persist_index();
            self.stats.record_expired(1);
            debug!(namespace = %self.namespace, storage_key = %storage_key, "expired on read");
        }
        expired
    }

    fn log_store_failure(&self, err: StoreError, action: &str) {
        let err = CacheError::from(err);
        warn!(namespace = %self.namespace, error = %err, "{}", action);
    }

    fn evict_tail(&mut self) -> Option<CacheEntry> {
        let entry = self.index.pop_back()?;
        self.remove_payload(&entry.storage_key);
        self.stats.record_eviction();
        debug!(namespace = %self.namespace, storage_key = %entry.storage_key, "evicted");
        Some(entry)
    }

    fn remove_payload(&mut self, storage_key: &str) {
        if let Err(err) = self.store.remove(storage_key) {
            self.log_store_failure(err, "failed to remove payload");
        }
    }

    fn persist_index(&mut self) {
        let encoded = self.index.to_json();
        if let Err(err) = self.store.write(&self.index_key, &encoded) {
            self.log_store_failure(err, "failed to persist index");
        }
    }
}
