//! # cache-aspect
//!
//! Read-through caching around arbitrary computations.
//!
//! Wrap any computation in [`CachingAspect::invoke`] (or
//! [`CachingAspect::invoke_async`]) under an explicit key. The first call
//! runs the computation and stores its serialized result; later calls
//! return the stored result until it expires or is removed.
//!
//! ## Features
//!
//! - **Any serde type:** results only need `Serialize + DeserializeOwned`
//! - **Sync and async:** blocking `invoke` and `invoke_async` share one store
//! - **Absolute and sliding expiration:** per aspect or per call
//! - **Backend Agnostic:** in-memory (default), Redis (`redis` feature), or custom backends
//! - **Fail fast:** store and codec failures surface as [`Error`]; nothing is retried
//!
//! ## Quick Start
//!
//! ### For Web Applications (Recommended)
//!
//! Use [`CacheService`] for easy sharing across threads:
//!
//! ```
//! use cache_aspect::{backend::InMemoryBackend, CacheService, CachingOptions, Error};
//! use serde::{Deserialize, Serialize};
//! use std::time::Duration;
//!
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//!     email: Option<String>,
//! }
//!
//! async fn load_user(id: u64) -> Result<User, Error> {
//!     Ok(User { id, name: "Ada".to_string(), email: None })
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Error> {
//! let cache = CacheService::with_options(
//!     InMemoryBackend::new(),
//!     CachingOptions::new()
//!         .with_absolute_expiration(Duration::from_secs(300))
//!         .with_sliding_expiration(Duration::from_secs(60)),
//! );
//!
//! let user = cache.invoke_async("user:7", || load_user(7)).await?;
//! assert_eq!(user.name, "Ada");
//!
//! // Force the next call to reload
//! cache.remove_async("user:7").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ### For Custom Patterns (Advanced)
//!
//! Use [`CachingAspect`] for explicit control:
//!
//! ```
//! use cache_aspect::{backend::InMemoryBackend, CachingAspect};
//! use std::sync::Arc;
//!
//! // Lower-level API - wrap in Arc yourself if needed
//! let aspect = CachingAspect::new(InMemoryBackend::new()).with_key_prefix("reports");
//! let cache = Arc::new(aspect);
//! let cache_clone = cache.clone();
//! ```

#[macro_use]
extern crate log;

pub mod aspect;
pub mod backend;
pub mod error;
pub mod key;
pub mod observability;
pub mod options;
pub mod serialization;
pub mod service;

// Re-exports for convenience
pub use aspect::CachingAspect;
pub use backend::CacheBackend;
pub use error::{Error, Result};
pub use key::CacheKeyBuilder;
pub use options::{CachingOptions, EntryOptions};
pub use serialization::{CachingSerializer, JsonSerializer};
pub use service::CacheService;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
