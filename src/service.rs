//! High-level cache service for web applications.
//!
//! Provides a convenient wrapper around CachingAspect with Arc for easy sharing.

use crate::aspect::CachingAspect;
use crate::backend::CacheBackend;
use crate::error::{Error, Result};
use crate::observability::CacheMetrics;
use crate::options::CachingOptions;
use crate::serialization::{CachingSerializer, JsonSerializer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// High-level cache service for web applications.
///
/// Wraps `CachingAspect` in `Arc` for easy sharing across threads without
/// requiring external `Arc<Mutex<>>` wrappers.
///
/// # Design
///
/// Since `CacheBackend` implementations use interior mutability and
/// `CachingAspect` only has `&self` methods, we can safely wrap it in `Arc`
/// without needing an additional `Mutex`.
///
/// # Example
///
/// ```
/// use cache_aspect::{backend::InMemoryBackend, CacheService, CachingOptions, Error};
/// use std::time::Duration;
///
/// let cache = CacheService::with_options(
///     InMemoryBackend::new(),
///     CachingOptions::new().with_sliding_expiration(Duration::from_secs(60)),
/// );
///
/// // Clones share the same aspect
/// let handle = cache.clone();
/// let total: u64 = handle
///     .invoke("report:2024", || Ok::<_, Error>((1..=10).sum()))
///     .unwrap();
/// assert_eq!(total, 55);
/// ```
pub struct CacheService<B: CacheBackend, S: CachingSerializer = JsonSerializer> {
    aspect: Arc<CachingAspect<B, S>>,
}

impl<B: CacheBackend, S: CachingSerializer> Clone for CacheService<B, S> {
    fn clone(&self) -> Self {
        CacheService {
            aspect: Arc::clone(&self.aspect),
        }
    }
}

impl<B: CacheBackend> CacheService<B, JsonSerializer> {
    /// Create a new cache service with the given backend and no expiration.
    pub fn new(backend: B) -> Self {
        Self::from_aspect(CachingAspect::new(backend))
    }

    /// Create a new cache service with default caching options.
    pub fn with_options(backend: B, options: CachingOptions) -> Self {
        Self::from_aspect(CachingAspect::new(backend).with_options(options))
    }

    /// Create a new cache service, adjusting the default options in a callback.
    pub fn configure(backend: B, configure: impl FnOnce(&mut CachingOptions)) -> Self {
        Self::from_aspect(CachingAspect::new(backend).configure(configure))
    }

    /// Create a new cache service with options read from a configuration
    /// section (see [`CachingOptions::from_section`]).
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` if the section is invalid.
    pub fn from_section(backend: B, section: &serde_json::Value) -> Result<Self> {
        let options = CachingOptions::from_section(section)?;
        Ok(Self::with_options(backend, options))
    }

    /// Create a new cache service with custom metrics.
    pub fn with_metrics(backend: B, metrics: Box<dyn CacheMetrics>) -> Self {
        Self::from_aspect(CachingAspect::new(backend).with_metrics(metrics))
    }
}

impl<B: CacheBackend, S: CachingSerializer> CacheService<B, S> {
    /// Wrap a fully configured aspect.
    pub fn from_aspect(aspect: CachingAspect<B, S>) -> Self {
        CacheService {
            aspect: Arc::new(aspect),
        }
    }

    /// See [`CachingAspect::invoke`].
    pub fn invoke<R, E, F>(&self, key: &str, method: F) -> std::result::Result<R, E>
    where
        R: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce() -> std::result::Result<R, E>,
    {
        self.aspect.invoke(key, method)
    }

    /// See [`CachingAspect::invoke_with_options`].
    pub fn invoke_with_options<R, E, F>(
        &self,
        key: &str,
        method: F,
        options: &CachingOptions,
    ) -> std::result::Result<R, E>
    where
        R: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce() -> std::result::Result<R, E>,
    {
        self.aspect.invoke_with_options(key, method, options)
    }

    /// See [`CachingAspect::invoke_async`].
    pub async fn invoke_async<R, E, F, Fut>(&self, key: &str, method: F) -> std::result::Result<R, E>
    where
        R: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
    {
        self.aspect.invoke_async(key, method).await
    }

    /// See [`CachingAspect::invoke_async_with_options`].
    pub async fn invoke_async_with_options<R, E, F, Fut>(
        &self,
        key: &str,
        method: F,
        options: &CachingOptions,
    ) -> std::result::Result<R, E>
    where
        R: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
    {
        self.aspect
            .invoke_async_with_options(key, method, options)
            .await
    }

    /// See [`CachingAspect::remove`].
    pub fn remove(&self, key: &str) -> Result<()> {
        self.aspect.remove(key)
    }

    /// See [`CachingAspect::remove_async`].
    pub async fn remove_async(&self, key: &str) -> Result<()> {
        self.aspect.remove_async(key).await
    }

    /// Get a reference to the underlying aspect.
    ///
    /// Use this if you need direct access to aspect methods.
    pub fn aspect(&self) -> &CachingAspect<B, S> {
        &self.aspect
    }
}
