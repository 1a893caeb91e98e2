//! Error types for the caching aspect.

use std::fmt;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the caching aspect.
///
/// Nothing is retried internally: every variant surfaces to the immediate
/// caller of `invoke`/`invoke_async`, converted into the caller's error type
/// through `From<Error>`.
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when converting a computed value to a cache payload.
    ///
    /// The write is aborted; nothing is stored for the key.
    SerializationError(String),

    /// Deserialization failed when converting a cached payload back to a value.
    ///
    /// Common causes:
    /// - Entry was written by a different (incompatible) type
    /// - Payload is not valid UTF-8
    /// - Payload was corrupted in the store
    ///
    /// Never treated as a cache miss.
    DeserializationError(String),

    /// Backend storage error (Redis, connection pool, etc).
    ///
    /// The store could not be reached or returned an error.
    BackendError(String),

    /// Invalid caching options or configuration section.
    ConfigError(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::BackendError(e.to_string())
        } else if e.is_syntax() || e.is_eof() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::BackendError(format!("Redis error: {}", e))
    }
}
