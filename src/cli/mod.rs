//! Command line front end
//!
//! Runs a single cache operation against a directory-backed store and
//! reports the result as JSON.

pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::cache::LruCache;
use crate::storage::PersistentStore;
use output::{EntryView, GetOutput, ListOutput, MessageOutput, StatsOutput};

#[derive(Parser, Debug)]
#[command(name = "persistent_lru")]
#[command(about = "Inspect and manipulate a persistent LRU cache")]
pub struct Args {
    /// Directory holding the store
    #[arg(long, default_value = ".lru-cache")]
    pub dir: PathBuf,

    /// Cache namespace
    #[arg(short, long, default_value = "default")]
    pub namespace: String,

    /// Maximum entries (overrides LRU_CAPACITY)
    #[arg(short, long)]
    pub capacity: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Cache a value; VALUE is parsed as JSON, else taken as a string
    Put {
        key: String,
        value: String,
        /// Lifetime in minutes
        #[arg(long)]
        expires_minutes: Option<u64>,
    },
    /// Print the value cached under KEY
    Get { key: String },
    /// Drop KEY from the cache
    Remove { key: String },
    /// Mark KEY as most recently used
    Touch { key: String },
    /// Evict the least recently used entry
    RemoveLast,
    /// Empty the cache
    Clear,
    /// Show index records, most recently used first
    List,
    /// Show counters for this invocation
    Stats,
}

/// Parses a command line value, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Executes `command` against `cache`.
pub fn run<S: PersistentStore>(cache: &mut LruCache<S>, command: Command) -> Value {
    let output = match command {
        Command::Put {
            key,
            value,
            expires_minutes,
        } => {
            cache.put(&key, &parse_value(&value), expires_minutes);
            serde_json::to_value(MessageOutput::for_key("Value cached", key))
        }
        Command::Get { key } => {
            let value = cache.get::<Value>(&key);
            serde_json::to_value(GetOutput::new(key, value))
        }
        Command::Remove { key } => {
            cache.remove(&key);
            serde_json::to_value(MessageOutput::for_key("Key removed", key))
        }
        Command::Touch { key } => {
            let message = if cache.move_to_head(&key) {
                "Key promoted"
            } else {
                "Key not cached"
            };
            serde_json::to_value(MessageOutput::for_key(message, key))
        }
        Command::RemoveLast => match cache.remove_last() {
            Some(entry) => serde_json::to_value(EntryView::from(&entry)),
            None => serde_json::to_value(MessageOutput::new("Cache is empty")),
        },
        Command::Clear => {
            cache.clear();
            serde_json::to_value(MessageOutput::new("Cache cleared"))
        }
        Command::List => serde_json::to_value(ListOutput {
            namespace: cache.namespace().to_string(),
            capacity: cache.capacity(),
            entries: cache.entries().map(EntryView::from).collect(),
        }),
        Command::Stats => serde_json::to_value(StatsOutput::new(
            cache.namespace(),
            cache.capacity(),
            &cache.stats(),
        )),
    };
    output.unwrap_or_else(|err| serde_json::json!({ "error": err.to_string() }))
}
