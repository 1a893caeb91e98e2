//! In-memory cache backend (default, thread-safe, sync + async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Expiration is enforced lazily on access.

use super::CacheBackend;
use crate::error::Result;
use crate::options::EntryOptions;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// In-memory cache entry with absolute and sliding deadlines.
struct CacheEntry {
    data: Vec<u8>,
    absolute_deadline: Option<Instant>,
    sliding_window: Option<Duration>,
    last_access: Instant,
}

impl CacheEntry {
    fn new(data: Vec<u8>, options: &EntryOptions) -> Self {
        let now = Instant::now();
        CacheEntry {
            data,
            // A deadline past the clock's range never fires.
            absolute_deadline: options
                .absolute_expiration_relative_to_now
                .and_then(|d| now.checked_add(d)),
            sliding_window: options.sliding_expiration,
            last_access: now,
        }
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        let absolute = self.absolute_deadline.is_some_and(|exp| now >= exp);
        let sliding = self
            .sliding_window
            .and_then(|window| self.last_access.checked_add(window))
            .is_some_and(|deadline| now >= deadline);
        absolute || sliding
    }

    fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// Thread-safe in-memory cache backend.
///
/// Clones share the same underlying map. Blocking and async operations are
/// the same code path: no operation ever waits on I/O.
///
/// # Example
///
/// ```no_run
/// use cache_aspect::backend::{CacheBackend, InMemoryBackend};
/// use cache_aspect::options::EntryOptions;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = InMemoryBackend::new();
///
///     backend.set_async("key1", b"value".to_vec(), &EntryOptions::default()).await?;
///     assert!(backend.get_async("key1").await?.is_some());
///
///     let options = EntryOptions {
///         absolute_expiration_relative_to_now: Some(Duration::from_secs(300)),
///         sliding_expiration: Some(Duration::from_secs(60)),
///     };
///     backend.set("key2", b"expires".to_vec(), &options)?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryBackend {
    store: Arc<DashMap<String, CacheEntry>>,
}

impl InMemoryBackend {
    /// Create a new in-memory cache backend.
    pub fn new() -> Self {
        InMemoryBackend {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Get the current number of entries in cache, expired ones included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.store.clear();
        warn!("InMemory CLEAR executed - all cache cleared");
    }

    /// Drop every expired entry, returning how many were removed.
    ///
    /// Reads evict expired entries lazily; keys that are never read again
    /// stay in the map until this runs.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.store.len();
        self.store.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before.saturating_sub(self.store.len());
        if removed > 0 {
            debug!("InMemory PURGE removed {} expired entries", removed);
        }
        removed
    }

    /// Get memory statistics.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let total_bytes: usize = self.store.iter().map(|entry| entry.data.len()).sum();
        let expired_count = self
            .store
            .iter()
            .filter(|entry| entry.is_expired_at(now))
            .count();

        CacheStats {
            total_entries: self.store.len(),
            expired_entries: expired_count,
            total_bytes,
        }
    }

    fn read(&self, key: &str) -> Option<Vec<u8>> {
        if let Some(mut entry) = self.store.get_mut(key) {
            let now = Instant::now();
            if !entry.is_expired_at(now) {
                entry.last_access = now;
                debug!("InMemory GET {} -> HIT", key);
                return Some(entry.data.clone());
            }
        }

        // Drop the entry only if it is still expired: a concurrent writer may
        // have replaced it since the check above.
        self.store.remove_if(key, |_, entry| entry.is_expired());
        debug!("InMemory GET {} -> MISS", key);
        None
    }

    fn write(&self, key: &str, value: Vec<u8>, options: &EntryOptions) {
        self.store
            .insert(key.to_string(), CacheEntry::new(value, options));
        debug!("InMemory SET {} ({:?})", key, options);
    }

    fn delete(&self, key: &str) {
        self.store.remove(key);
        debug!("InMemory REMOVE {}", key);
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read(key))
    }

    async fn get_async(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.read(key))
    }

    fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<()> {
        self.write(key, value, options);
        Ok(())
    }

    async fn set_async(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<()> {
        self.write(key, value, options);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.delete(key);
        Ok(())
    }

    async fn remove_async(&self, key: &str) -> Result<()> {
        self.delete(key);
        Ok(())
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub total_bytes: usize,
}
