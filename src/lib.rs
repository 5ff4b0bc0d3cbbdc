//! Persistent LRU - a size-bounded cache persisted to a local key-value store
//!
//! Entries are evicted least-recently-used first once a namespace reaches its
//! capacity, and expired entries are swept when a cache is opened.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod storage;

pub use cache::{CacheEntry, CacheStats, LruCache, SharedCache};
pub use config::{CacheConfig, ClearScope, ExpiryPolicy};
pub use error::{CacheError, StoreError};
pub use storage::{open_or_noop, DynStore, FileStore, MemoryStore, NoopStore, PersistentStore};
