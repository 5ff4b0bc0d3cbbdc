//! Cache Module
//!
//! Size-bounded LRU caching over a persistent store, with expiry swept when a
//! cache is opened.

mod clock;
mod engine;
mod entry;
pub mod hash;
mod index;
mod shared;
mod stats;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::LruCache;
pub use entry::{byte_len, CacheEntry};
pub use index::{CacheIndex, Promotion};
pub use shared::SharedCache;
pub use stats::CacheStats;
