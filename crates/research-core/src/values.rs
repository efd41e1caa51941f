//! Variable store passed between chains
//!
//! `ChainValues` is a flat key-value map. Prompt inputs (`ticker`,
//! `valuation_metrics`, ...) go in before a pipeline starts and every chain
//! adds its own output key as it finishes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Values shared by the chains of a pipeline
///
/// # Example
///
/// ```
/// use research_core::ChainValues;
/// use serde_json::json;
///
/// let mut values = ChainValues::new();
/// values.insert("ticker", json!("TSLA"));
///
/// assert_eq!(values.get_str("ticker"), Some("TSLA"));
/// assert!(values.require_str("missing").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainValues {
    data: BTreeMap<String, serde_json::Value>,
}

impl ChainValues {
    /// Create an empty value store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, replacing any previous value under the same key
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Get a value as a string slice
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    /// Get a string value or fail with [`crate::Error::MissingVariable`]
    pub fn require_str(&self, key: &str) -> crate::Result<&str> {
        self.get_str(key)
            .ok_or_else(|| crate::Error::MissingVariable(key.to_string()))
    }

    /// Insert a typed value, serialized to JSON
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize chain value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value, deserialized from JSON
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize chain value '{key}': {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Iterate over the stored keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(String::as_str)
    }

    /// Keep only the listed keys
    pub fn retain_keys(&mut self, keys: &[String]) {
        self.data.retain(|k, _| keys.iter().any(|wanted| wanted == k));
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merge another store into this one (other values override)
    pub fn merge(&mut self, other: ChainValues) {
        self.data.extend(other.data);
    }

    /// View the store as a JSON object (used as template context)
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}
