//! Thread-safe handle over one namespace's cache.
//!
//! Every operation on the index is a read-modify-persist sequence, so all of
//! them run under one mutex per namespace.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::{CacheEntry, CacheStats, LruCache};
use crate::storage::PersistentStore;

/// Cloneable, lock-protected `LruCache`.
#[derive(Debug)]
pub struct SharedCache<S> {
    inner: Arc<Mutex<LruCache<S>>>,
}

impl<S> Clone for SharedCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: PersistentStore> SharedCache<S> {
    pub fn new(cache: LruCache<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T, expires_minutes: Option<u64>) {
        self.lock().put(key, value, expires_minutes)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lock().get(key)
    }

    pub fn remove(&self, key: &str) {
        self.lock().remove(key)
    }

    pub fn move_to_head(&self, key: &str) -> bool {
        self.lock().move_to_head(key)
    }

    pub fn remove_last(&self) -> Option<CacheEntry> {
        self.lock().remove_last()
    }

    pub fn clear(&self) {
        self.lock().clear()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Runs `f` with exclusive access, for sequences that must not interleave.
    pub fn with<R>(&self, f: impl FnOnce(&mut LruCache<S>) -> R) -> R {
        f(&mut *self.lock())
    }

    // Poisoned locks are recovered; the next persist rewrites the whole index.
    fn lock(&self) -> MutexGuard<'_, LruCache<S>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
