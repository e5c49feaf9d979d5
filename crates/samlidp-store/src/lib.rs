//! # samlidp-store
//!
//! Key-value store adapters backing the shortcut registry.
//!
//! The registry only depends on the narrow [`KeyValueStore`] capability:
//! list keys under a prefix, and get/put/delete JSON values by key. Two
//! backends ship with the crate:
//!
//! | Backend | Durability | Use |
//! |---------|------------|-----|
//! | [`MemoryStore`] | process lifetime | tests, ephemeral deployments |
//! | [`FileStore`] | JSON document on disk | single-node deployments |

pub mod error;
pub mod file;
pub mod memory;

use samlidp_core::config::{StorageBackend, StoreConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// A key-value store holding JSON values.
///
/// Implementations must tolerate concurrent calls on different keys.
/// Concurrent writes to the same key are last-write-wins.
pub trait KeyValueStore: Send + Sync {
    /// Keys starting with `prefix`, with the prefix stripped, in ascending order.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// The value under `key`, or [`StoreError::NotFound`].
    fn get(&self, key: &str) -> Result<serde_json::Value, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: serde_json::Value) -> Result<(), StoreError>;

    /// Remove `key`; [`StoreError::NotFound`] if nothing was stored.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Typed access on top of [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Get the value under `key` and deserialize it.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.get(key)?)?)
    }

    /// Serialize `value` and store it under `key`.
    fn put_as<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.put(key, serde_json::to_value(value)?)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// Create a store backend based on configuration.
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::File => {
            let path = config
                .file_path
                .as_deref()
                .ok_or_else(|| StoreError::Backend("file backend requires file_path".into()))?;
            Ok(Arc::new(FileStore::open(path)?))
        }
    }
}
