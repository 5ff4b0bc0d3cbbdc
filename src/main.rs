//! Persistent LRU - command line access to a directory-backed cache.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use persistent_lru::cache::SystemClock;
use persistent_lru::cli::{run, Args};
use persistent_lru::{open_or_noop, CacheConfig, LruCache};

/// Entry point.
///
/// # Startup Sequence
/// 1. Parse command line arguments
/// 2. Initialize tracing subscriber for logging (stderr)
/// 3. Load configuration from environment variables, apply flag overrides
/// 4. Open the store, falling back to a no-op store if the directory is unusable
/// 5. Run the command and print its JSON result on stdout
fn main() -> Result<()> {
    let args = Args::parse();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    let default_filter = if args.debug {
        "persistent_lru=debug"
    } else {
        "persistent_lru=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = CacheConfig::from_env();
    if let Some(capacity) = args.capacity {
        config = config.with_capacity(capacity);
    }
    debug!(?config, dir = %args.dir.display(), "configuration loaded");

    let store = open_or_noop(&args.dir);
    let mut cache = LruCache::with_config(args.namespace, &config, store, Arc::new(SystemClock));

    let output = run(&mut cache, args.command);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
