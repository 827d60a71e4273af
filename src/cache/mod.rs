//! Process-lifetime entity caches.
//!
//! This module provides a domain-agnostic caching mechanism that:
//! - Keeps resolved entities in memory for the lifetime of its owner
//! - Never expires or proactively invalidates entries
//! - Resolves cache-first, falling back to a caller-supplied fetcher

mod layer;
mod storage;
mod traits;

pub use storage::EntityCache;
pub use traits::{CacheSource, Cacheable, Lookup, Unresolved};
