//! Caching infrastructure for the service layer.
//!
//! Reads follow the cache-aside protocol: compute the key, try the cache,
//! authorize, and on a miss load from the repository and populate the cache.
//! Writes delete the affected keys through [`cache_keys`] invalidations.

mod cache_interface;
pub mod cache_keys;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use cache_keys::Invalidation;
pub use redis_cache::RedisCacheService;
