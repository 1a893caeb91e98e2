//! Caching aspect - read-through caching around arbitrary computations.

use crate::backend::CacheBackend;
use crate::error::{Error, Result};
use crate::key::CacheKeyBuilder;
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::options::{CachingOptions, EntryOptions};
use crate::serialization::{CachingSerializer, JsonSerializer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Instant;

/// Read-through cache around a closure.
///
/// `invoke` looks the key up in the backend. A non-empty payload is decoded
/// and returned without running the closure. Otherwise the closure runs, its
/// result is encoded and written with the expiration options, and the fresh
/// value is returned.
///
/// # Setup-Time vs Per-Call Options
///
/// - **Setup-time**: `with_options()` / `configure()` set the default
///   [`CachingOptions`] used by `invoke` and `invoke_async`.
/// - **Per-call**: `invoke_with_options` / `invoke_async_with_options`
///   replace those defaults for one write. Nothing is merged: a `None` axis
///   in the per-call options disables that axis for the entry.
///
/// # Errors
///
/// The closure's own error is returned as is and nothing is written. Cache
/// failures (`Error::BackendError`, `Error::SerializationError`,
/// `Error::DeserializationError`) are converted into the closure's error
/// type through `From<Error>`. Nothing is retried, and a cache failure never
/// falls back to an uncached computation.
///
/// # Concurrency
///
/// Two callers that miss the same key at the same time both run their
/// closure; the last write wins.
///
/// # Example
///
/// ```
/// use cache_aspect::{backend::InMemoryBackend, CachingAspect, CachingOptions, Error};
/// use std::time::Duration;
///
/// let aspect = CachingAspect::new(InMemoryBackend::new()).with_options(
///     CachingOptions::new().with_absolute_expiration(Duration::from_secs(300)),
/// );
///
/// let user_id = 42;
/// let name: String = aspect
///     .invoke(&format!("user:{}", user_id), || {
///         Ok::<_, Error>(format!("user #{}", user_id))
///     })
///     .unwrap();
/// assert_eq!(name, "user #42");
/// ```
pub struct CachingAspect<B: CacheBackend, S: CachingSerializer = JsonSerializer> {
    backend: B,
    serializer: S,
    options: CachingOptions,
    key_prefix: Option<String>,
    metrics: Box<dyn CacheMetrics>,
}

impl<B: CacheBackend> CachingAspect<B, JsonSerializer> {
    /// Create a new aspect over `backend` with the JSON serializer and no
    /// expiration.
    pub fn new(backend: B) -> Self {
        CachingAspect {
            backend,
            serializer: JsonSerializer,
            options: CachingOptions::default(),
            key_prefix: None,
            metrics: Box::new(NoOpMetrics),
        }
    }
}

impl<B: CacheBackend, S: CachingSerializer> CachingAspect<B, S> {
    /// Replace the serializer.
    pub fn with_serializer<S2: CachingSerializer>(self, serializer: S2) -> CachingAspect<B, S2> {
        CachingAspect {
            backend: self.backend,
            serializer,
            options: self.options,
            key_prefix: self.key_prefix,
            metrics: self.metrics,
        }
    }

    /// Set the default caching options.
    pub fn with_options(mut self, options: CachingOptions) -> Self {
        self.options = options;
        self
    }

    /// Adjust the default caching options in place.
    ///
    /// ```
    /// use cache_aspect::{backend::InMemoryBackend, CachingAspect};
    /// use std::time::Duration;
    ///
    /// let aspect = CachingAspect::new(InMemoryBackend::new()).configure(|options| {
    ///     options.sliding_expiration = Some(Duration::from_secs(60));
    /// });
    /// assert!(aspect.options().sliding_expiration.is_some());
    /// ```
    pub fn configure(mut self, configure: impl FnOnce(&mut CachingOptions)) -> Self {
        configure(&mut self.options);
        self
    }

    /// Namespace every store key as `"{prefix}:{key}"`.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Default options applied by `invoke` and `invoke_async`.
    pub fn options(&self) -> &CachingOptions {
        &self.options
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get serializer reference.
    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Return the cached result for `key`, or run `method` and cache its
    /// result with the default options.
    ///
    /// Blocks on the backend; use [`invoke_async`](Self::invoke_async) from
    /// async code.
    pub fn invoke<R, E, F>(&self, key: &str, method: F) -> std::result::Result<R, E>
    where
        R: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce() -> std::result::Result<R, E>,
    {
        self.invoke_with_options(key, method, &self.options)
    }

    /// Like [`invoke`](Self::invoke), writing with `options` instead of the
    /// defaults.
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
        let store_key = self.store_key(key);
        debug!("» invoke {}", store_key);

        let timer = Instant::now();
        let payload = self.observe(&store_key, self.backend.get(&store_key))?;
        if let Some(value) = self.decode(&store_key, payload, timer)? {
            return Ok(value);
        }

        let value = method()?;

        let timer = Instant::now();
        let (bytes, entry) = self.encode(&store_key, &value, options)?;
        self.observe(&store_key, self.backend.set(&store_key, bytes, &entry))?;
        self.metrics.record_set(&store_key, timer.elapsed());

        Ok(value)
    }

    /// Async form of [`invoke`](Self::invoke).
    ///
    /// Suspends at the store lookup, inside `method`'s future, and at the
    /// store write. The write is awaited before the value is returned, so
    /// the result is cached once this future completes. Dropping the future
    /// cancels the invocation at whichever of those points it is suspended.
    pub async fn invoke_async<R, E, F, Fut>(&self, key: &str, method: F) -> std::result::Result<R, E>
    where
        R: Serialize + DeserializeOwned,
        E: From<Error>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
    {
        self.invoke_async_with_options(key, method, &self.options)
            .await
    }

    /// Like [`invoke_async`](Self::invoke_async), writing with `options`
    /// instead of the defaults.
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
        let store_key = self.store_key(key);
        debug!("» invoke_async {}", store_key);

        let timer = Instant::now();
        let payload = self.observe(&store_key, self.backend.get_async(&store_key).await)?;
        if let Some(value) = self.decode(&store_key, payload, timer)? {
            return Ok(value);
        }

        let value = method().await?;

        let timer = Instant::now();
        let (bytes, entry) = self.encode(&store_key, &value, options)?;
        self.observe(
            &store_key,
            self.backend.set_async(&store_key, bytes, &entry).await,
        )?;
        self.metrics.record_set(&store_key, timer.elapsed());

        Ok(value)
    }

    /// Remove the cached result for `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `Error::BackendError` if the store fails.
    pub fn remove(&self, key: &str) -> Result<()> {
        let store_key = self.store_key(key);
        let timer = Instant::now();

        self.observe(&store_key, self.backend.remove(&store_key))?;
        self.metrics.record_delete(&store_key, timer.elapsed());
        debug!("✓ Cache entry removed: {}", store_key);
        Ok(())
    }

    /// Async form of [`remove`](Self::remove).
    ///
    /// # Errors
    ///
    /// Returns `Error::BackendError` if the store fails.
    pub async fn remove_async(&self, key: &str) -> Result<()> {
        let store_key = self.store_key(key);
        let timer = Instant::now();

        self.observe(&store_key, self.backend.remove_async(&store_key).await)?;
        self.metrics.record_delete(&store_key, timer.elapsed());
        debug!("✓ Cache entry removed: {}", store_key);
        Ok(())
    }

    fn store_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => CacheKeyBuilder::build(prefix, &key),
            None => key.to_string(),
        }
    }

    /// Turn a looked-up payload into a hit (`Some`) or a miss (`None`).
    ///
    /// An empty payload is a miss and is never handed to the serializer.
    fn decode<R: DeserializeOwned>(
        &self,
        store_key: &str,
        payload: Option<Vec<u8>>,
        timer: Instant,
    ) -> Result<Option<R>> {
        let bytes = match payload {
            Some(bytes) if !bytes.is_empty() => bytes,
            Some(_) => {
                debug!("✗ Cache miss (empty payload) for {}", store_key);
                self.metrics.record_miss(store_key, timer.elapsed());
                return Ok(None);
            }
            None => {
                debug!("✗ Cache miss for {}", store_key);
                self.metrics.record_miss(store_key, timer.elapsed());
                return Ok(None);
            }
        };

        let text = String::from_utf8(bytes).map_err(|e| {
            Error::DeserializationError(format!("Cached payload is not UTF-8: {}", e))
        });
        let text = self.observe(store_key, text)?;
        let value = self.observe(store_key, self.serializer.deserialize(&text))?;

        debug!("✓ Cache hit for {}", store_key);
        self.metrics.record_hit(store_key, timer.elapsed());
        Ok(Some(value))
    }

    fn encode<R: Serialize>(
        &self,
        store_key: &str,
        value: &R,
        options: &CachingOptions,
    ) -> Result<(Vec<u8>, EntryOptions)> {
        let text = self.observe(store_key, self.serializer.serialize(value))?;
        Ok((text.into_bytes(), EntryOptions::from(options)))
    }

    /// Report a failure to the metrics hook and pass the result through.
    fn observe<T>(&self, store_key: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.metrics.record_error(store_key, &e.to_string());
        }
        result
    }
}
