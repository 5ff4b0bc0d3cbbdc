//! Storage Module
//!
//! Durable string key-value stores the cache persists its index and payloads to.

mod file;
mod memory;
mod noop;

use std::path::Path;

use tracing::warn;

use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use noop::NoopStore;

// == Persistent Store ==
/// A durable mapping from string keys to string values.
///
/// No expiry or size limit is applied by the store itself. Last write wins
/// per key; nothing beyond that is assumed.
pub trait PersistentStore {
    /// Returns the value stored under `key`, if any.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Deletes every key in the store.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Store handle chosen at runtime.
pub type DynStore = Box<dyn PersistentStore + Send>;

impl<S: PersistentStore + ?Sized> PersistentStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

// == Open Or Noop ==
/// Opens a file-backed store at `dir`, degrading to a `NoopStore` on failure.
///
/// With the fallback in place the cache keeps working but never retains
/// anything.
pub fn open_or_noop(dir: impl AsRef<Path>) -> DynStore {
    match FileStore::open(dir.as_ref()) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "persistent storage unavailable, caching disabled");
            Box::new(NoopStore)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_or_noop_uses_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = open_or_noop(dir.path());

        store.write("abc", "1").unwrap();
        assert_eq!(store.read("abc").unwrap(), Some("1".to_string()));
    }

    #[test]
    fn test_open_or_noop_degrades() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let mut store = open_or_noop(&blocker);
        store.write("abc", "1").unwrap();
        assert_eq!(store.read("abc").unwrap(), None);
    }
}
