//! Storage key derivation.
//!
//! The same SHA-256 primitive serves two independent purposes:
//!
//! - **Namespace scoping.** [`index_key`] names the record holding a
//!   namespace's index. It only has to keep namespaces apart and keep the
//!   literal namespace name out of storage.
//! - **Logical-key obfuscation.** [`storage_key`] names the record holding one
//!   payload. It is qualified by the namespace so two caches using the same
//!   logical key never share a payload.
//!
//! A distinct domain tag on each input keeps an index key from ever equalling
//! a payload key.

use sha2::{Digest, Sha256};

const INDEX_DOMAIN: &[u8] = b"index";
const ENTRY_DOMAIN: &[u8] = b"entry";

/// Backing-store key of the index for `namespace`.
pub fn index_key(namespace: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(INDEX_DOMAIN);
    hasher.update([0u8]);
    hasher.update(namespace.as_bytes());
    hex::encode(hasher.finalize())
}

/// Backing-store key of the payload cached under `key` in `namespace`.
pub fn storage_key(namespace: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ENTRY_DOMAIN);
    hasher.update([0u8]);
    hasher.update(namespace.as_bytes());
    hasher.update([0u8]);
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}
