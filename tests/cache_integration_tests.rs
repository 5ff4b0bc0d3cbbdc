//! Integration Tests for the persistent cache
//!
//! Exercises full cache lifecycles over a directory-backed store, reopening
//! the cache the way a restarted process would.

use std::fs;
use std::sync::Arc;

use persistent_lru::cache::{hash, ManualClock, SystemClock};
use persistent_lru::{
    open_or_noop, CacheConfig, CacheEntry, ClearScope, FileStore, LruCache, PersistentStore,
};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

const START_MS: i64 = 1_704_067_200_000;

// == Helper Functions ==

fn open(dir: &TempDir, namespace: &str, capacity: usize) -> LruCache<FileStore> {
    LruCache::new(namespace, capacity, FileStore::open(dir.path()).unwrap())
}

fn open_at(dir: &TempDir, capacity: usize, clock: &ManualClock) -> LruCache<FileStore> {
    let config = CacheConfig::default().with_capacity(capacity);
    LruCache::with_config(
        "redis_keys",
        &config,
        FileStore::open(dir.path()).unwrap(),
        Arc::new(clock.clone()),
    )
}

fn payload_exists(dir: &TempDir, namespace: &str, key: &str) -> bool {
    dir.path()
        .join(format!("{}.kv", hash::storage_key(namespace, key)))
        .exists()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RedisKey {
    name: String,
    kind: String,
    ttl: i64,
}

// == Lifecycle ==

#[test]
fn test_values_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let key = RedisKey {
        name: "session:42".to_string(),
        kind: "hash".to_string(),
        ttl: -1,
    };

    let mut cache = open(&dir, "redis_keys", 10);
    cache.put("session:42", &key, None);
    drop(cache);

    let mut cache = open(&dir, "redis_keys", 10);
    assert_eq!(cache.get::<RedisKey>("session:42"), Some(key));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_capacity_example_over_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = open(&dir, "redis_keys", 2);

    cache.put("a", &1, None);
    cache.put("b", &2, None);
    cache.put("c", &3, None);

    assert_eq!(cache.get::<i32>("a"), None);
    assert_eq!(cache.get::<i32>("b"), Some(2));
    assert_eq!(cache.get::<i32>("c"), Some(3));
    assert!(!payload_exists(&dir, "redis_keys", "a"));
}

#[test]
fn test_recency_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let mut cache = open(&dir, "redis_keys", 2);
    cache.put("A", &"a", None);
    cache.put("B", &"b", None);
    cache.get::<String>("A");
    drop(cache);

    let mut cache = open(&dir, "redis_keys", 2);
    cache.put("C", &"c", None);

    assert_eq!(cache.get::<String>("A"), Some("a".to_string()));
    assert_eq!(cache.get::<String>("B"), None);
    assert_eq!(cache.get::<String>("C"), Some("c".to_string()));
}

// == Persisted Layout ==

#[test]
fn test_index_layout() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(START_MS);
    let mut cache = open_at(&dir, 5, &clock);

    cache.put("first", &"x", Some(1));
    cache.put("second", &"缓存", Some(2));

    let raw = fs::read_to_string(dir.path().join(format!("{}.kv", hash::index_key("redis_keys"))))
        .unwrap();
    let records: Vec<CacheEntry> = serde_json::from_str(&raw).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].storage_key, hash::storage_key("redis_keys", "second"));
    assert_eq!(records[0].expires_at, START_MS + 2 * 60_000);
    assert_eq!(records[0].size_bytes, 6);
    assert_eq!(records[1].size_bytes, 3);
    assert!(raw.contains("\"storageKey\""));
    assert!(!raw.contains("redis_keys"), "namespace name must not leak into storage");
}

#[test]
fn test_corrupt_index_file_is_cold_start() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(format!("{}.kv", hash::index_key("redis_keys"))),
        "[{\"storageKey\":",
    )
    .unwrap();

    let mut cache = open(&dir, "redis_keys", 3);
    assert!(cache.is_empty());

    cache.put("k", &true, None);
    assert_eq!(cache.get::<bool>("k"), Some(true));
}

// == Expiry ==

#[test]
fn test_expired_entries_swept_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::new(START_MS);

    let mut cache = open_at(&dir, 10, &clock);
    cache.put("a", &1, Some(1));
    cache.put("b", &2, Some(1));
    cache.put("c", &3, Some(30));
    cache.put("d", &4, Some(1));
    drop(cache);

    clock.advance_minutes(5);
    let mut cache = open_at(&dir, 10, &clock);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().expired, 3);
    for key in ["a", "b", "d"] {
        assert!(!payload_exists(&dir, "redis_keys", key), "{} should be swept", key);
    }
    assert_eq!(cache.get::<i32>("c"), Some(3));
}

// == Namespaces ==

#[test]
fn test_namespaces_share_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut keys = open(&dir, "redis_keys", 2);
    let mut weather = open(&dir, "weather", 2);

    keys.put("shanghai", &"string", None);
    weather.put("shanghai", &"sunny", None);
    weather.put("beijing", &"windy", None);
    weather.put("shenzhen", &"rain", None);

    assert_eq!(keys.get::<String>("shanghai"), Some("string".to_string()));
    assert_eq!(weather.get::<String>("shanghai"), None);
    assert_eq!(keys.len(), 1);
}

#[test]
fn test_clear_scopes() {
    let dir = tempfile::tempdir().unwrap();
    let mut keys = open(&dir, "redis_keys", 5);
    let mut weather = open(&dir, "weather", 5);
    keys.put("a", &1, None);
    weather.put("a", &2, None);

    keys.clear();
    assert_eq!(keys.get::<i32>("a"), None);
    assert_eq!(weather.get::<i32>("a"), Some(2));

    // Reopening finds nothing left for the cleared namespace
    drop(keys);
    assert!(open(&dir, "redis_keys", 5).is_empty());

    let config = CacheConfig {
        clear_scope: ClearScope::Store,
        ..CacheConfig::default()
    };
    let mut wiper = LruCache::with_config(
        "redis_keys",
        &config,
        FileStore::open(dir.path()).unwrap(),
        Arc::new(SystemClock),
    );
    wiper.clear();
    assert!(open(&dir, "weather", 5).is_empty());
}

// == Degradation ==

#[test]
fn test_unavailable_storage_degrades_to_noop() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "occupied").unwrap();

    let mut cache = LruCache::new("redis_keys", 3, open_or_noop(&blocker));
    cache.put("k", &1, None);
    assert_eq!(cache.get::<i32>("k"), None);
    cache.remove("k");
    cache.clear();
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "occupied");
}

#[test]
fn test_dyn_store_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = open_or_noop(dir.path());
    store.write("sentinel", "1").unwrap();

    let mut cache = LruCache::new("redis_keys", 3, store);
    cache.put("k", &vec![1, 2, 3], None);
    assert_eq!(cache.get::<Vec<i32>>("k"), Some(vec![1, 2, 3]));
    assert_eq!(cache.store().read("sentinel").unwrap(), Some("1".to_string()));
}
