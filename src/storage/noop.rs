//! Fallback store used when real storage is unavailable.

use crate::error::StoreError;
use crate::storage::PersistentStore;

/// Discards every write; every read finds nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl PersistentStore for NoopStore {
    fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
