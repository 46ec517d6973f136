//! Bounded cache of synthesized audio.
//!
//! Each entry is a pair of sibling files in one directory: a JSON metadata
//! record `<id>.json` and the audio payload `<id>.<format>`. Opening the cache
//! evicts the least recently modified records beyond the retention limit.

mod entry;
mod store;

pub use entry::CacheEntry;
pub use store::{AudioCache, CacheError, CacheSlot, MAX_CACHE_SIZE, evict_excess};
