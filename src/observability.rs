//! Metrics hooks for cache operations.
//!
//! Implement [`CacheMetrics`] to feed the aspect's hit/miss/write activity
//! into your monitoring system:
//!
//! ```ignore
//! use cache_aspect::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("cache_hits").inc();
//!     }
//!     // ... implement other methods
//! }
//!
//! let aspect = CachingAspect::new(backend)
//!     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! Every method has a default that writes a `log` record, so an empty
//! `impl CacheMetrics for T {}` gives log-only metrics. The aspect uses
//! [`NoOpMetrics`] unless told otherwise.
//!
//! # Events
//!
//! - `record_hit()` - cached payload found and decoded; duration covers lookup + decode
//! - `record_miss()` - no usable payload; duration covers the lookup only
//! - `record_set()` - computed value written; duration covers encode + write
//! - `record_delete()` - explicit removal
//! - `record_error()` - any store or codec failure

use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache set operation.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a cache delete operation.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Cache DELETE: {} took {:?}", key, duration);
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}
