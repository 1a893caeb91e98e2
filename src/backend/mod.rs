//! Cache backend implementations.

use crate::error::Result;
use crate::options::EntryOptions;

#[cfg(feature = "inmemory")]
pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{PoolStats, RedisBackend, RedisConfig};

/// Trait for the key/value store behind the caching aspect.
///
/// The store owns expiration: the aspect hands it [`EntryOptions`] on every
/// write and expects expired entries to read back as `None`. A read of an
/// entry with a sliding window must refresh that window.
///
/// Every operation comes in a blocking form (used by `invoke`) and an async
/// form (used by `invoke_async`). Both forms must observe the same data.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow concurrent access.
/// Backend implementations should use interior mutability or external storage.
#[allow(async_fn_in_trait)]
pub trait CacheBackend: Send + Sync + Clone {
    /// Retrieve a payload by key, blocking the current thread.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value found in cache
    /// - `Ok(None)` - Key absent or expired
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs (connection lost, etc.)
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Retrieve a payload by key.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs (connection lost, etc.)
    async fn get_async(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a payload, blocking the current thread.
    ///
    /// Replaces any existing entry for `key`, including its expiration.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<()>;

    /// Store a payload.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn set_async(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<()>;

    /// Remove a key, blocking the current thread. Absent keys are not an error.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    fn remove(&self, key: &str) -> Result<()>;

    /// Remove a key. Absent keys are not an error.
    ///
    /// # Errors
    /// Returns `Err` if backend error occurs
    async fn remove_async(&self, key: &str) -> Result<()>;

    /// Health check - verify backend is accessible.
    ///
    /// # Errors
    /// Returns `Err` if backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
