//! Cache interface trait for abstracted caching operations.

use super::cache_keys::Invalidation;
use async_trait::async_trait;
use shopsmart_core::{Interface, ShopResult};
use std::time::Duration;
use tracing::warn;

/// Cache interface for storing and retrieving cached data.
///
/// Values are stored as JSON strings so the trait stays dyn-compatible.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> ShopResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> ShopResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> ShopResult<bool>;

    /// Check if a key exists in the cache.
    async fn exists(&self, key: &str) -> ShopResult<bool>;

    /// Delete every key matching a glob pattern. Returns the number deleted.
    async fn delete_pattern(&self, pattern: &str) -> ShopResult<u64>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Typed and lenient helpers over [`CacheInterface`].
///
/// The `try_*` methods never fail: a cache that is down or holds an
/// undecodable value behaves like an empty cache, and the failure is logged.
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> ShopResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => {
                let value: T = serde_json::from_str(&json)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: Duration) -> ShopResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }

    /// Reads a typed value, treating any cache error as a miss.
    async fn try_get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.get::<T>(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read failed for '{}': {}", key, e);
                None
            }
        }
    }

    /// Writes a typed value, logging and discarding any cache error.
    async fn try_set<T: serde::Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        if let Err(e) = self.set(key, value, ttl).await {
            warn!("Cache write failed for '{}': {}", key, e);
        }
    }

    /// Deletes the keys and patterns of an invalidation, logging and discarding errors.
    async fn try_invalidate(&self, invalidation: &Invalidation) {
        for key in &invalidation.keys {
            if let Err(e) = self.delete(key).await {
                warn!("Cache invalidation failed for '{}': {}", key, e);
            }
        }
        for pattern in &invalidation.patterns {
            if let Err(e) = self.delete_pattern(pattern).await {
                warn!("Cache invalidation failed for pattern '{}': {}", pattern, e);
            }
        }
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
