//! In-memory cache and integration doubles.

use crate::cache::CacheInterface;
use crate::dto::ImageUpload;
use crate::integrations::{ImageStorage, MailMessage, Mailer};
use async_trait::async_trait;
use parking_lot::Mutex;
use shopsmart_core::{ShopError, ShopResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Matches `*` globs the way Redis `KEYS` does for the patterns we issue.
fn glob_matches(pattern: &str, key: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == key,
        Some((prefix, rest)) => {
            let Some(tail) = key.strip_prefix(prefix) else {
                return false;
            };
            if rest.is_empty() {
                return true;
            }
            (0..=tail.len()).any(|i| tail.is_char_boundary(i) && glob_matches(rest, &tail[i..]))
        }
    }
}

/// Cache that counts hits, misses and writes, and can be switched to fail.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    failing: AtomicBool,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose every operation returns a cache error.
    #[must_use]
    pub fn failing() -> Self {
        let cache = Self::default();
        cache.set_failing(true);
        cache
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn sets(&self) -> u64 {
        self.sets.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn check(&self) -> ShopResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ShopError::Cache("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> ShopResult<Option<String>> {
        self.check()?;
        let mut entries = self.entries.lock();
        if entries.get(key).is_some_and(|(_, expires_at)| *expires_at <= Instant::now()) {
            entries.remove(key);
        }
        let value = entries.get(key).map(|(value, _)| value.clone());
        let counter = if value.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> ShopResult<()> {
        self.check()?;
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_string(), Instant::now() + ttl));
        self.sets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> ShopResult<bool> {
        self.check()?;
        Ok(self.entries.lock().remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> ShopResult<bool> {
        self.check()?;
        Ok(self.entries.lock().contains_key(key))
    }

    async fn delete_pattern(&self, pattern: &str) -> ShopResult<u64> {
        self.check()?;
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| !glob_matches(pattern, key));
        Ok((before - entries.len()) as u64)
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Mailer that keeps every message for inspection, or refuses them once
/// switched to fail.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<MailMessage>>,
    failing: AtomicBool,
}

impl RecordingMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: MailMessage) -> ShopResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ShopError::external("mail", "mail server unavailable"));
        }
        self.sent.lock().push(message);
        Ok(())
    }
}

/// Image storage that records uploads and hands out predictable URLs.
#[derive(Debug, Default)]
pub struct MemoryImageStorage {
    stored: Mutex<Vec<(String, ImageUpload)>>,
}

impl MemoryImageStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stored_count(&self) -> usize {
        self.stored.lock().len()
    }
}

#[async_trait]
impl ImageStorage for MemoryImageStorage {
    async fn store(&self, upload: ImageUpload) -> ShopResult<String> {
        if upload.bytes.is_empty() {
            return Err(ShopError::validation("Product image is required"));
        }
        let url = format!("/uploads/{}", upload.file_name);
        self.stored.lock().push((url.clone(), upload));
        Ok(url)
    }

    async fn remove(&self, url: &str) -> ShopResult<()> {
        self.stored.lock().retain(|(stored, _)| stored != url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_matches() {
        assert!(glob_matches("a:products:all:*", "a:products:all:p1:l10"));
        assert!(glob_matches("a:*:l10", "a:products:all:p1:l10"));
        assert!(!glob_matches("a:products:seller:*", "a:products:all:p1:l10"));
        assert!(glob_matches("exact", "exact"));
        assert!(!glob_matches("exact", "exactly"));
    }

    #[tokio::test]
    async fn test_expired_entries_are_misses() {
        let cache = InMemoryCache::new();
        cache.set_raw("k", "1", Duration::ZERO).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
        assert_eq!(cache.misses(), 1);
    }
}
