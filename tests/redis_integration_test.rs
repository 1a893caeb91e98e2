//! Redis Backend Integration Tests
//!
//! These tests require a running Redis instance.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start a local server (either one)
//! redis-server
//! docker run --rm -p 6379:6379 redis:7
//!
//! cargo test --features redis --test redis_integration_test
//! ```
//!
//! ## Environment Variables
//!
//! - `TEST_REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
//!
//! ## What's Tested
//!
//! 1. Redis connection and health check
//! 2. Basic set/get/remove operations, blocking and async
//! 3. Absolute and sliding expiration
//! 4. Read-through through the aspect
//! 5. Connection pooling under concurrent load

#![cfg(feature = "redis")]

use cache_aspect::backend::{CacheBackend, RedisBackend, RedisConfig};
use cache_aspect::{CacheService, CachingAspect, CachingOptions, EntryOptions, Error};
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Helper: Get Redis connection URL from environment or use default
fn get_redis_url() -> String {
    env::var("TEST_REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

/// Helper: Create a test Redis backend
async fn create_test_backend() -> Result<RedisBackend, Box<dyn std::error::Error>> {
    let redis_url = get_redis_url();
    println!("Connecting to Redis: {}", redis_url);

    let backend = RedisBackend::from_connection_string(&redis_url).await?;
    Ok(backend)
}

/// Helper: Check if Redis is available
async fn is_redis_available() -> bool {
    match create_test_backend().await {
        Ok(backend) => backend.health_check().await.unwrap_or(false),
        Err(_) => false,
    }
}

fn absolute(ttl: Duration) -> EntryOptions {
    EntryOptions {
        absolute_expiration_relative_to_now: Some(ttl),
        sliding_expiration: None,
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct DummyPoco {
    property1: String,
    property2: Option<i64>,
    property3: Option<String>,
}

// =============================================================================
// Test 1: Redis Connection
// =============================================================================

#[tokio::test]
async fn test_redis_connection() {
    if !is_redis_available().await {
        println!("⚠️  Redis not available, skipping test");
        println!("💡 Run: redis-server (or docker run --rm -p 6379:6379 redis:7)");
        return;
    }

    let backend = create_test_backend()
        .await
        .expect("Failed to create Redis backend");

    let is_healthy = backend
        .health_check()
        .await
        .expect("Health check should not error");
    assert!(is_healthy, "Redis health check should return true");
}

#[tokio::test]
async fn test_redis_connection_with_config() {
    if !is_redis_available().await {
        println!("⚠️  Redis not available, skipping test");
        return;
    }

    let config = RedisConfig {
        host: "localhost".to_string(),
        port: 6379,
        database: 0,
        pool_size: 10,
        connection_timeout: Duration::from_secs(5),
        ..Default::default()
    };

    let backend = RedisBackend::new(config)
        .await
        .expect("Failed to create Redis backend from config");

    assert!(backend.health_check().await.expect("Health check failed"));
    assert!(backend.pool_stats().connections >= 1);
}

// =============================================================================
// Test 2: Basic Set/Get/Remove
// =============================================================================

#[tokio::test]
async fn test_redis_basic_set_get_remove() {
    if !is_redis_available().await {
        println!("⚠️  Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend()
        .await
        .expect("Failed to create Redis backend");

    let test_key = "test:integration:key1";
    let test_value = b"Hello from cache-aspect!".to_vec();

    backend
        .set_async(test_key, test_value.clone(), &EntryOptions::default())
        .await
        .expect("Failed to set value");

    let retrieved = backend.get_async(test_key).await.expect("Failed to get value");
    assert_eq!(retrieved, Some(test_value));

    backend
        .remove_async(test_key)
        .await
        .expect("Failed to remove value");
    assert_eq!(backend.get_async(test_key).await.expect("Failed to get"), None);

    // Removing an absent key is not an error
    backend
        .remove_async(test_key)
        .await
        .expect("Failed to remove absent key");
}

#[tokio::test]
async fn test_redis_blocking_and_async_share_entries() {
    if !is_redis_available().await {
        println!("⚠️  Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend()
        .await
        .expect("Failed to create Redis backend");
    let test_key = "test:integration:blocking";

    let writer = backend.clone();
    tokio::task::spawn_blocking(move || {
        writer
            .set(test_key, b"from blocking".to_vec(), &EntryOptions::default())
            .expect("Failed to set value")
    })
    .await
    .expect("Task failed");

    let retrieved = backend.get_async(test_key).await.expect("Failed to get value");
    assert_eq!(retrieved, Some(b"from blocking".to_vec()));

    let reader = backend.clone();
    tokio::task::spawn_blocking(move || {
        reader.remove(test_key).expect("Failed to remove value");
        assert_eq!(reader.get(test_key).expect("Failed to get"), None);
    })
    .await
    .expect("Task failed");
}

// =============================================================================
// Test 3: Expiration
// =============================================================================

#[tokio::test]
async fn test_redis_absolute_expiration() {
    if !is_redis_available().await {
        println!("⚠️  Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend()
        .await
        .expect("Failed to create Redis backend");
    let test_key = "test:integration:absolute";

    backend
        .set_async(test_key, b"short-lived".to_vec(), &absolute(Duration::from_millis(300)))
        .await
        .expect("Failed to set value");
    assert!(backend.get_async(test_key).await.expect("Failed to get").is_some());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(backend.get_async(test_key).await.expect("Failed to get").is_none());
}

#[tokio::test]
async fn test_redis_sliding_expiration() {
    if !is_redis_available().await {
        println!("⚠️  Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend()
        .await
        .expect("Failed to create Redis backend");
    let test_key = "test:integration:sliding";
    let options = EntryOptions {
        absolute_expiration_relative_to_now: None,
        sliding_expiration: Some(Duration::from_millis(400)),
    };

    backend
        .set_async(test_key, b"kept alive".to_vec(), &options)
        .await
        .expect("Failed to set value");

    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(backend.get_async(test_key).await.expect("Failed to get").is_some());
    }

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert!(backend.get_async(test_key).await.expect("Failed to get").is_none());
}

// =============================================================================
// Test 4: Read-through
// =============================================================================

#[tokio::test]
async fn test_redis_read_through() {
    if !is_redis_available().await {
        println!("⚠️  Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend()
        .await
        .expect("Failed to create Redis backend");
    let aspect = CachingAspect::new(backend)
        .with_key_prefix("test:integration:aspect")
        .with_options(
            CachingOptions::new()
                .with_absolute_expiration(Duration::from_secs(5))
                .with_sliding_expiration(Duration::from_secs(60)),
        );
    aspect.remove_async("dummy").await.expect("Failed to reset");

    let counter = AtomicUsize::new(0);
    let calls = &counter;

    for _ in 0..3 {
        let result = aspect
            .invoke_async("dummy", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>(DummyPoco {
                    property1: "p1".to_string(),
                    property2: None,
                    property3: None,
                })
            })
            .await
            .expect("Failed to invoke");
        assert_eq!(result.property1, "p1");
    }

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    aspect.remove_async("dummy").await.expect("Failed to clean up");
}

// =============================================================================
// Test 5: Concurrent Load
// =============================================================================

#[tokio::test]
async fn test_redis_concurrent_invocations() {
    if !is_redis_available().await {
        println!("⚠️  Redis not available, skipping test");
        return;
    }

    let backend = create_test_backend()
        .await
        .expect("Failed to create Redis backend");
    let service = CacheService::with_options(
        backend,
        CachingOptions::new().with_absolute_expiration(Duration::from_secs(30)),
    );
    let computed = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for i in 0..20 {
        let service = service.clone();
        let computed = computed.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("test:integration:concurrent:{}", i);
            service.remove_async(&key).await.expect("Failed to reset");

            for _ in 0..3 {
                let computed = computed.clone();
                let value: u64 = service
                    .invoke_async(&key, || async move {
                        computed.fetch_add(1, Ordering::SeqCst);
                        Ok::<_, Error>(i)
                    })
                    .await
                    .expect("Failed to invoke");
                assert_eq!(value, i);
            }

            service.remove_async(&key).await.expect("Failed to clean up");
        }));
    }

    for handle in handles {
        handle.await.expect("Task failed");
    }

    assert_eq!(computed.load(Ordering::SeqCst), 20);
}
