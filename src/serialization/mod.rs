//! String serialization for cached results.
//!
//! The aspect stores every computed value as a string payload produced by a
//! [`CachingSerializer`]. The default, [`JsonSerializer`], writes compact
//! JSON and leaves out struct fields that are `None`.
//!
//! # Format
//!
//! ```text
//! {"property1":"p1","property2":"p2"}      <- Option::None fields are absent
//! ```
//!
//! Only `None` struct fields are dropped. Anything else that writes `null`
//! (`()`, unit structs, `serde_json::Value::Null`) is kept, as are `None`
//! elements of sequences and `None` map values, so every such value reads
//! back unchanged. Fields appear in declaration order.
//!
//! There is no envelope and no schema version. Callers own the stored
//! shape: changing a cached type in a way that stale entries cannot satisfy
//! surfaces as `Error::DeserializationError` until those entries expire or
//! are removed.
//!
//! # Missing fields
//!
//! Because `None` fields are omitted, a value must be able to come back from a
//! payload that lacks some of its fields. `Option` fields do this out of the
//! box; other fields opt in with `#[serde(default)]`, which supplies the
//! type's zero value.
//!
//! # Example
//!
//! ```rust
//! use cache_aspect::serialization::{CachingSerializer, JsonSerializer};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u64,
//!     nickname: Option<String>,
//! }
//!
//! # fn main() -> cache_aspect::Result<()> {
//! let serializer = JsonSerializer;
//! let user = User { id: 1, nickname: None };
//!
//! let data = serializer.serialize(&user)?;
//! assert_eq!(data, r#"{"id":1}"#);
//!
//! let back: User = serializer.deserialize(&data)?;
//! assert_eq!(user, back);
//! # Ok(())
//! # }
//! ```

mod omit_none;

use crate::error::{Error, Result};
use omit_none::OmitNone;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts values to and from the string payloads kept in the cache.
///
/// Implementations must be stateless or internally synchronized: the aspect
/// calls them through `&self` from any thread.
pub trait CachingSerializer: Send + Sync {
    /// Encode a value as a cache payload.
    ///
    /// # Errors
    ///
    /// Returns `Error::SerializationError` if the value cannot be encoded.
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Decode a cache payload back into a value.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeserializationError` if the payload is malformed or
    /// does not match `T`.
    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T>;
}

/// JSON serializer that omits `None` struct fields.
///
/// Writes straight to the output buffer, so the full numeric range of
/// `i128`/`u128` is supported.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSerializer;

impl CachingSerializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut buf = Vec::with_capacity(128);
        OmitNone(value)
            .serialize(&mut serde_json::Serializer::new(&mut buf))
            .map_err(|e| {
                log::error!("Cache serialization failed: {}", e);
                Error::SerializationError(e.to_string())
            })?;

        String::from_utf8(buf).map_err(|e| {
            log::error!("Cache serialization failed: {}", e);
            Error::SerializationError(e.to_string())
        })
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        serde_json::from_str(data).map_err(|e| {
            log::error!("Cache deserialization failed: {}", e);
            Error::DeserializationError(e.to_string())
        })
    }
}
