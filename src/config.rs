//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;

/// One year, in minutes.
pub const DEFAULT_EXPIRES_MINUTES: u64 = 60 * 24 * 365;

/// Default number of entries a namespace may hold.
pub const DEFAULT_CAPACITY: usize = 100;

// == Expiry Policy ==
/// When stale entries are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpiryPolicy {
    /// Only the sweep at construction removes expired entries.
    #[default]
    Lazy,
    /// `get` also treats an expired entry as absent and removes it.
    Eager,
}

impl FromStr for ExpiryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lazy" => Ok(Self::Lazy),
            "eager" => Ok(Self::Eager),
            other => Err(format!("unknown expiry policy: {}", other)),
        }
    }
}

// == Clear Scope ==
/// What `clear` wipes from the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearScope {
    /// Only payloads indexed by this namespace, plus its index key.
    #[default]
    Namespace,
    /// Every key in the backing store, including other namespaces.
    Store,
}

impl FromStr for ClearScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "namespace" => Ok(Self::Namespace),
            "store" => Ok(Self::Store),
            other => Err(format!("unknown clear scope: {}", other)),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries the namespace can hold
    pub capacity: usize,
    /// Expiry in minutes for entries put without an explicit expiry
    pub default_expires_minutes: u64,
    /// Whether `get` checks expiry
    pub expiry: ExpiryPolicy,
    /// Reach of `clear`
    pub clear_scope: ClearScope,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_CAPACITY` - Maximum entries (default: 100)
    /// - `LRU_DEFAULT_EXPIRES_MINUTES` - Default expiry in minutes (default: 525600)
    /// - `LRU_EXPIRY_POLICY` - `lazy` or `eager` (default: lazy)
    /// - `LRU_CLEAR_SCOPE` - `namespace` or `store` (default: namespace)
    pub fn from_env() -> Self {
        Self {
            capacity: env_parse("LRU_CAPACITY").unwrap_or(DEFAULT_CAPACITY),
            default_expires_minutes: env_parse("LRU_DEFAULT_EXPIRES_MINUTES")
                .unwrap_or(DEFAULT_EXPIRES_MINUTES),
            expiry: env_parse("LRU_EXPIRY_POLICY").unwrap_or_default(),
            clear_scope: env_parse("LRU_CLEAR_SCOPE").unwrap_or_default(),
        }
    }

    /// Returns a copy with a different capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_expires_minutes: DEFAULT_EXPIRES_MINUTES,
            expiry: ExpiryPolicy::Lazy,
            clear_scope: ClearScope::Namespace,
        }
    }
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.capacity, 100);
        assert_eq!(config.default_expires_minutes, 525_600);
        assert_eq!(config.expiry, ExpiryPolicy::Lazy);
        assert_eq!(config.clear_scope, ClearScope::Namespace);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("LRU_CAPACITY");
        env::remove_var("LRU_DEFAULT_EXPIRES_MINUTES");
        env::remove_var("LRU_EXPIRY_POLICY");
        env::remove_var("LRU_CLEAR_SCOPE");

        let config = CacheConfig::from_env();
        assert_eq!(config.capacity, 100);
        assert_eq!(config.default_expires_minutes, 525_600);
        assert_eq!(config.expiry, ExpiryPolicy::Lazy);
        assert_eq!(config.clear_scope, ClearScope::Namespace);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Eager".parse::<ExpiryPolicy>(), Ok(ExpiryPolicy::Eager));
        assert_eq!(" lazy ".parse::<ExpiryPolicy>(), Ok(ExpiryPolicy::Lazy));
        assert!("sometimes".parse::<ExpiryPolicy>().is_err());
        assert_eq!("STORE".parse::<ClearScope>(), Ok(ClearScope::Store));
        assert!("world".parse::<ClearScope>().is_err());
    }

    #[test]
    fn test_with_capacity() {
        let config = CacheConfig::default().with_capacity(2);
        assert_eq!(config.capacity, 2);
        assert_eq!(config.default_expires_minutes, DEFAULT_EXPIRES_MINUTES);
    }
}
