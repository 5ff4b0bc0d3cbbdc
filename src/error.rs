//! Error types for the persistent cache
//!
//! Provides unified error handling using thiserror. None of these errors
//! reach callers of `LruCache`: the engine logs and absorbs them.

use std::path::PathBuf;

use thiserror::Error;

// == Store Error Enum ==
/// Failures reported by a `PersistentStore` backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing storage could not be opened
    #[error("Storage unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key cannot be represented by this backend
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Read, write or remove failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// == Cache Error Enum ==
/// Failures inside a cache operation, logged rather than returned.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Stored index data could not be decoded
    #[error("Malformed index: {0}")]
    MalformedIndex(#[source] serde_json::Error),

    /// Stored payload could not be decoded into the requested type
    #[error("Malformed payload for {storage_key}: {source}")]
    MalformedPayload {
        storage_key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be encoded for storage
    #[error("Unserializable value: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Backend failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
