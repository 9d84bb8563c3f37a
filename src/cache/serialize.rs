//! Serialization Adapter Module
//!
//! The stores hold payloads as generic JSON documents because the consumer's
//! concrete type is only known at `get` time. This module converts between
//! the caller's typed value and that document form.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

// == Encode ==
/// Encodes a typed value into its storable document form.
///
/// Failure here is caller misuse (e.g. a map with non-string keys) and is the
/// only serialization error that propagates out of the cache.
pub fn encode<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    serde_json::to_value(value)
}

// == Decode ==
/// Decodes a stored document back into the caller's requested type.
///
/// Tries a direct structured conversion first; if that fails, falls back to a
/// round trip through JSON text. A value that survives neither is treated as
/// a cache miss by the caller, never as an error.
pub fn decode<T: DeserializeOwned>(doc: &Value) -> Option<T> {
    if let Ok(value) = serde_json::from_value(doc.clone()) {
        return Some(value);
    }

    // Last resort: re-serialize to text and parse from scratch
    serde_json::to_string(doc)
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
}
