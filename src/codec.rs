//! Session payload and its MessagePack codec.
//!
//! The payload is an ordered map of string keys to JSON values, serialized
//! with MessagePack for compact storage. An empty payload encodes to an empty
//! blob and an empty blob decodes to an empty payload, so uninitialized rows
//! round-trip without a real serialization pass.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::store::{Result, StoreError};

/// In-memory key/value contents of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionPayload {
    items: BTreeMap<String, serde_json::Value>,
}

impl SessionPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Encode`] when the value cannot be represented as
    /// a JSON value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|e| StoreError::Encode(e.to_string()))?;
        self.items.insert(key.into(), value);
        Ok(())
    }

    /// Retrieves and deserializes the value under `key`, if present and of a
    /// compatible shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.items
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Removes the value under `key`, returning it if it was present.
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.items.remove(key)
    }

    /// Whether the payload holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items in the payload.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over the payload keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    /// Serializes the payload for storage. Empty payloads encode to an empty
    /// blob.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.items.is_empty() {
            return Ok(Vec::new());
        }
        rmp_serde::to_vec(self).map_err(|e| StoreError::Encode(e.to_string()))
    }

    /// Deserializes a stored blob. An empty blob decodes to an empty payload.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        rmp_serde::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::SessionPayload;

    #[test]
    fn empty_payload_roundtrips_through_empty_blob() {
        let payload = SessionPayload::new();
        let bytes = payload.encode().unwrap();
        assert!(bytes.is_empty());
        assert_eq!(SessionPayload::decode(&bytes).unwrap(), payload);
    }

    #[test]
    fn payload_roundtrips() {
        let mut payload = SessionPayload::new();
        payload.insert("user_id", 123_u32).unwrap();
        payload.insert("name", "john").unwrap();
        payload
            .insert("cart", vec!["apples", "pears"])
            .unwrap();

        let bytes = payload.encode().unwrap();
        assert!(!bytes.is_empty());
        let decoded = SessionPayload::decode(&bytes).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(decoded.get::<u32>("user_id"), Some(123));
        assert_eq!(decoded.get::<String>("name"), Some("john".to_string()));
    }

    #[test]
    fn insert_replaces_and_remove_clears() {
        let mut payload = SessionPayload::new();
        payload.insert("k", "v1").unwrap();
        payload.insert("k", "v2").unwrap();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get::<String>("k"), Some("v2".to_string()));

        assert!(payload.remove("k").is_some());
        assert!(payload.remove("k").is_none());
        assert!(payload.is_empty());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(SessionPayload::decode(&[0xc1, 0xff, 0x00]).is_err());
    }
}
