//! Integration tests for the Redis cache.
//!
//! These tests run against a real Redis using testcontainers.
//! Requires Docker to be available on the system.

use deadpool_redis::{Config, Runtime};
use shopsmart_core::{PageRequest, ProductId};
use shopsmart_service::{cache_keys, CacheInterface, RedisCacheService};
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync};
use testcontainers_modules::redis::Redis;

async fn start_cache() -> (ContainerAsync<Redis>, RedisCacheService) {
    let container = Redis::default()
        .start()
        .await
        .expect("Failed to start Redis container");
    let port = container
        .get_host_port_ipv4(6379)
        .await
        .expect("Failed to get Redis port");

    let pool = Config::from_url(format!("redis://127.0.0.1:{port}"))
        .create_pool(Some(Runtime::Tokio1))
        .expect("Failed to create Redis pool");
    (container, RedisCacheService::new(Arc::new(pool)))
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_delete_pattern_walks_every_scan_page() {
    let (_container, cache) = start_cache().await;
    let ttl = Duration::from_secs(60);

    for page in 1..=1200 {
        let key = cache_keys::products_all(PageRequest::new(page, 10));
        cache.set_raw(&key, "[]", ttl).await.unwrap();
    }
    let details = cache_keys::product_details(ProductId::new());
    cache.set_raw(&details, "{}", ttl).await.unwrap();

    let pattern = cache_keys::products_all_pattern();
    assert_eq!(cache.delete_pattern(&pattern).await.unwrap(), 1200);
    assert!(!cache.exists(&cache_keys::products_all(PageRequest::first())).await.unwrap());
    assert!(cache.exists(&details).await.unwrap());
    assert_eq!(cache.delete_pattern(&pattern).await.unwrap(), 0);
}
