//! Cache value encoding

use serde::{Serialize, de::DeserializeOwned};

use crate::{CacheError, Result};

/// A value encoded and ready to be written to the store.
///
/// Native strings are stored verbatim, the empty string included; anything
/// structured goes through JSON. The distinction matters on the way back
/// out: a verbatim string reads back as itself, while structured values
/// round-trip through [`CacheValue::decode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheValue(String);

impl CacheValue {
    /// JSON-encode a structured value
    pub fn json<T: Serialize>(value: &T) -> Result<Self> {
        serde_json::to_string(value)
            .map(CacheValue)
            .map_err(|e| CacheError::Serialization(e.to_string()))
    }

    /// Decode a stored payload back into a structured value
    pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T> {
        serde_json::from_str(raw).map_err(|e| CacheError::Deserialization(e.to_string()))
    }

    /// The encoded payload exactly as it will be stored
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the value, yielding the encoded payload
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for CacheValue {
    fn from(s: String) -> Self {
        CacheValue(s)
    }
}

impl From<&str> for CacheValue {
    fn from(s: &str) -> Self {
        CacheValue(s.to_owned())
    }
}

impl From<&String> for CacheValue {
    fn from(s: &String) -> Self {
        CacheValue(s.clone())
    }
}
