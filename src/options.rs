//! Expiration options for cached results.
//!
//! [`CachingOptions`] is what callers configure: once as the aspect's
//! default, or per invocation. [`EntryOptions`] is the store-facing form
//! handed to [`CacheBackend::set`](crate::backend::CacheBackend::set).
//!
//! # Policy
//!
//! - `absolute_expiration` is relative to the moment of the write.
//! - `sliding_expiration` is reset by every successful read.
//! - `None` disables that axis entirely; there is no fallback to a default.
//! - With both set, whichever deadline comes first wins.
//!
//! # Loading from configuration
//!
//! ```
//! use cache_aspect::CachingOptions;
//! use std::time::Duration;
//!
//! let section = serde_json::json!({
//!     "absolute_expiration_secs": 300,
//!     "sliding_expiration_secs": 60
//! });
//!
//! let options = CachingOptions::from_section(&section).unwrap();
//! assert_eq!(options.absolute_expiration, Some(Duration::from_secs(300)));
//! assert_eq!(options.sliding_expiration, Some(Duration::from_secs(60)));
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Environment variable holding the default absolute expiration, in seconds.
pub const ENV_ABSOLUTE_EXPIRATION: &str = "CACHE_ABSOLUTE_EXPIRATION_SECS";

/// Environment variable holding the default sliding expiration, in seconds.
pub const ENV_SLIDING_EXPIRATION: &str = "CACHE_SLIDING_EXPIRATION_SECS";

/// Expiration settings applied when a computed result is written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CachingOptions {
    /// Maximum time a result may stay cached, measured from the write.
    pub absolute_expiration: Option<Duration>,

    /// Maximum time a result may stay cached without being read.
    pub sliding_expiration: Option<Duration>,
}

impl CachingOptions {
    /// Options with no expiration on either axis.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the absolute expiration.
    ///
    /// # Example
    ///
    /// ```
    /// use cache_aspect::CachingOptions;
    /// use std::time::Duration;
    ///
    /// let options = CachingOptions::new()
    ///     .with_absolute_expiration(Duration::from_secs(5))
    ///     .with_sliding_expiration(Duration::from_secs(60));
    /// assert!(options.absolute_expiration.is_some());
    /// ```
    pub fn with_absolute_expiration(mut self, ttl: Duration) -> Self {
        self.absolute_expiration = Some(ttl);
        self
    }

    /// Set the sliding expiration.
    pub fn with_sliding_expiration(mut self, window: Duration) -> Self {
        self.sliding_expiration = Some(window);
        self
    }

    /// Whether neither axis is set (entry lives until removed or evicted).
    pub fn is_unbounded(&self) -> bool {
        self.absolute_expiration.is_none() && self.sliding_expiration.is_none()
    }

    /// Load options from a configuration section.
    ///
    /// Recognised fields are `absolute_expiration_secs` and
    /// `sliding_expiration_secs`, both fractional seconds. A missing or
    /// `null` field disables that axis. Unknown fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` when the section has the wrong shape or a
    /// duration is negative or not finite.
    pub fn from_section(section: &serde_json::Value) -> Result<Self> {
        let raw: OptionsSection = serde_json::from_value(section.clone())
            .map_err(|e| Error::ConfigError(format!("Invalid caching options section: {}", e)))?;

        Ok(CachingOptions {
            absolute_expiration: raw
                .absolute_expiration_secs
                .map(|s| secs_to_duration("absolute_expiration_secs", s))
                .transpose()?,
            sliding_expiration: raw
                .sliding_expiration_secs
                .map(|s| secs_to_duration("sliding_expiration_secs", s))
                .transpose()?,
        })
    }

    /// Load options from the process environment.
    ///
    /// # Environment Variables
    /// - `CACHE_ABSOLUTE_EXPIRATION_SECS` - absolute expiration (unset: disabled)
    /// - `CACHE_SLIDING_EXPIRATION_SECS` - sliding expiration (unset: disabled)
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` when a variable is set but is not a
    /// non-negative number of seconds.
    pub fn from_env() -> Result<Self> {
        Ok(CachingOptions {
            absolute_expiration: env_duration(ENV_ABSOLUTE_EXPIRATION)?,
            sliding_expiration: env_duration(ENV_SLIDING_EXPIRATION)?,
        })
    }
}

/// Raw configuration shape accepted by [`CachingOptions::from_section`].
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct OptionsSection {
    absolute_expiration_secs: Option<f64>,
    sliding_expiration_secs: Option<f64>,
}

fn secs_to_duration(field: &str, secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        Error::ConfigError(format!(
            "{} must be a non-negative, finite number of seconds (got {})",
            field, secs
        ))
    })
}

fn env_duration(var: &str) -> Result<Option<Duration>> {
    match std::env::var(var) {
        Ok(raw) => {
            let secs: f64 = raw.trim().parse().map_err(|_| {
                Error::ConfigError(format!("{} is not a number of seconds: {:?}", var, raw))
            })?;
            secs_to_duration(var, secs).map(Some)
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::ConfigError(format!("{}: {}", var, e))),
    }
}

/// Expiration settings as seen by a cache backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryOptions {
    /// Expire this long after the write.
    pub absolute_expiration_relative_to_now: Option<Duration>,

    /// Expire this long after the last read; each read refreshes it.
    pub sliding_expiration: Option<Duration>,
}

impl EntryOptions {
    /// Time until the entry expires if it is never read again.
    ///
    /// This is the shorter of the two windows, or `None` when neither is set.
    pub fn initial_ttl(&self) -> Option<Duration> {
        match (
            self.absolute_expiration_relative_to_now,
            self.sliding_expiration,
        ) {
            (Some(a), Some(s)) => Some(a.min(s)),
            (a, s) => a.or(s),
        }
    }
}

impl From<&CachingOptions> for EntryOptions {
    fn from(options: &CachingOptions) -> Self {
        EntryOptions {
            absolute_expiration_relative_to_now: options.absolute_expiration,
            sliding_expiration: options.sliding_expiration,
        }
    }
}
