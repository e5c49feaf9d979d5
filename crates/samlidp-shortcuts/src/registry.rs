//! Shortcut registry backed by a key-value store.

use crate::error::ShortcutError;
use samlidp_core::{SHORTCUTS_PREFIX, Shortcut, shortcut_key};
use samlidp_store::{KeyValueStore, KeyValueStoreExt, StoreError};
use std::sync::Arc;

/// CRUD over shortcuts stored under [`SHORTCUTS_PREFIX`].
#[derive(Clone)]
pub struct ShortcutRegistry {
    store: Arc<dyn KeyValueStore>,
}

impl ShortcutRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Names of all shortcuts, in ascending order.
    pub fn list(&self) -> Result<Vec<String>, ShortcutError> {
        Ok(self.store.list(SHORTCUTS_PREFIX)?)
    }

    /// Look up a shortcut by name.
    pub fn get(&self, name: &str) -> Result<Shortcut, ShortcutError> {
        self.store
            .get_as(&shortcut_key(name))
            .map_err(|err| match err {
                StoreError::NotFound(_) => ShortcutError::NotFound(name.to_string()),
                other => other.into(),
            })
    }

    /// Create or replace a shortcut.
    ///
    /// `name` is authoritative: any name carried in `shortcut` is overwritten
    /// before storing.
    pub fn put(&self, name: &str, mut shortcut: Shortcut) -> Result<Shortcut, ShortcutError> {
        if name.is_empty() {
            return Err(ShortcutError::InvalidRequest(
                "shortcut name must not be empty".into(),
            ));
        }

        shortcut.name = name.to_string();
        self.store.put_as(&shortcut_key(name), &shortcut)?;

        tracing::info!(
            shortcut = %name,
            service_provider = %shortcut.service_provider_id,
            "Stored shortcut"
        );
        Ok(shortcut)
    }

    /// Remove a shortcut. Removing one that does not exist succeeds.
    pub fn delete(&self, name: &str) -> Result<(), ShortcutError> {
        match self.store.delete(&shortcut_key(name)) {
            Ok(()) => {
                tracing::info!(shortcut = %name, "Deleted shortcut");
                Ok(())
            }
            Err(err) if err.is_not_found() => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
