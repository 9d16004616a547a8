//! In-process storage backed by a `HashMap`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Storage, StorageError};

/// A [`Storage`] that lives for as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated from the fields of a JSON object.
    ///
    /// # Errors
    /// [`StorageError::InvalidSeed`] if `seed` is not an object.
    pub fn from_value(seed: Value) -> Result<Self, StorageError> {
        match seed {
            Value::Object(fields) => Ok(Self {
                entries: RwLock::new(fields.into_iter().collect()),
            }),
            other => Err(StorageError::InvalidSeed(json_kind(&other))),
        }
    }

    /// Copy the current contents into a JSON object with sorted keys.
    pub async fn snapshot(&self) -> Value {
        let entries = self.entries.read().await;
        let sorted: BTreeMap<&String, &Value> = entries.iter().collect();
        let mut out = Map::with_capacity(sorted.len());
        for (key, value) in sorted {
            out.insert(key.clone(), value.clone());
        }
        Value::Object(out)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StorageError> {
        debug!("storage put '{}'", key);
        self.entries.write().await.insert(key.to_owned(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        debug!("storage delete '{}'", key);
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_delete() {
        let store = MemoryStorage::new();
        assert_eq!(store.get("price").await.unwrap(), None);

        store.put("price", json!(9.99)).await.unwrap();
        assert_eq!(store.get("price").await.unwrap(), Some(json!(9.99)));

        assert!(store.delete("price").await.unwrap());
        assert!(!store.delete("price").await.unwrap());
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seeded_store_exposes_object_fields() {
        let store = MemoryStorage::from_value(json!({ "b": 2, "a": 1 })).unwrap();

        let mut keys = store.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(store.snapshot().await, json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn non_object_seed_is_rejected() {
        assert!(matches!(
            MemoryStorage::from_value(json!([1, 2, 3])),
            Err(StorageError::InvalidSeed("an array"))
        ));
    }
}
