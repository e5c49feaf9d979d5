//! Shortcut store configuration.

use serde::{Deserialize, Serialize};

/// Where shortcuts are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart.
    #[default]
    Memory,
    /// A JSON document on disk.
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path of the JSON document for the file backend.
    #[serde(default)]
    pub file_path: Option<String>,
}
