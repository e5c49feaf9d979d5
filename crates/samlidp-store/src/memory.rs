//! In-memory store.

use crate::KeyValueStore;
use crate::error::StoreError;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Store holding values in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<String, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn list_prefixed<V>(data: &BTreeMap<String, V>, prefix: &str) -> Vec<String> {
    data.range(prefix.to_string()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, _)| key[prefix.len()..].to_string())
        .collect()
}

impl KeyValueStore for MemoryStore {
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(list_prefixed(&data, prefix))
    }

    fn get(&self, key: &str) -> Result<serde_json::Value, StoreError> {
        let data = self.data.read().map_err(|_| StoreError::LockPoisoned)?;
        data.get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        data.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        data.remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_is_ordered_and_prefix_stripped() {
        let store = MemoryStore::new();
        store.put("/shortcuts/zeta", json!({})).unwrap();
        store.put("/shortcuts/alpha", json!({})).unwrap();
        store.put("/users/alice", json!({})).unwrap();
        store.put("/shortcutsx", json!({})).unwrap();

        assert_eq!(store.list("/shortcuts/").unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        let err = store.get("/shortcuts/missing").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_put_replaces_value() {
        let store = MemoryStore::new();
        store.put("/k", json!({"v": 1})).unwrap();
        store.put("/k", json!({"v": 2})).unwrap();
        assert_eq!(store.get("/k").unwrap(), json!({"v": 2}));
    }

    #[test]
    fn test_delete_reports_absent_key() {
        let store = MemoryStore::new();
        store.put("/k", json!(true)).unwrap();

        store.delete("/k").unwrap();
        assert!(store.delete("/k").unwrap_err().is_not_found());
    }
}
