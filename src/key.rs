//! Cache key helpers.
//!
//! The aspect never derives a key on its own: the caller always supplies
//! one. These helpers only keep hand-built keys consistent, e.g. a call
//! site that captures `user_id` in its closure builds `"user:42"` here.

use std::fmt::Display;

/// Separator between key segments.
pub const KEY_SEPARATOR: &str = ":";

/// Builder for cache keys.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Build a key from a namespace and an identifier.
    pub fn build(prefix: &str, id: &dyn Display) -> String {
        format!("{}{}{}", prefix, KEY_SEPARATOR, id)
    }

    /// Build composite key from multiple parts.
    pub fn build_composite(parts: &[&str]) -> String {
        parts.join(KEY_SEPARATOR)
    }

    /// Parse a composite key into parts.
    pub fn parse(key: &str) -> Vec<&str> {
        key.split(KEY_SEPARATOR).collect()
    }
}
