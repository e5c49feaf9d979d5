//! File-backed store.
//!
//! The whole key space lives in one JSON object on disk. Reads are served
//! from memory; every write rewrites the document through a temporary file
//! and a rename, so a crash never leaves a half-written store behind.

use crate::KeyValueStore;
use crate::error::StoreError;
use crate::memory::list_prefixed;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

type Document = BTreeMap<String, serde_json::Value>;

/// Store persisting values to a JSON document.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: RwLock<Document>,
}

impl FileStore {
    /// Open the store at `path`, loading existing contents if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Document::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Document::new()
        };

        tracing::debug!(path = %path.display(), keys = data.len(), "Opened file store");

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, data: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.path.with_extension("tmp");
        let result = write_document(&tmp_path, data)
            .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(StoreError::from));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }
}

fn write_document(path: &Path, data: &Document) -> Result<(), StoreError> {
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, data)?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    Ok(())
}

impl KeyValueStore for FileStore {
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
        let previous = data.insert(key.to_string(), value);
        if let Err(err) = self.persist(&data) {
            // Keep memory in step with disk.
            match previous {
                Some(previous) => data.insert(key.to_string(), previous),
                None => data.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut data = self.data.write().map_err(|_| StoreError::LockPoisoned)?;
        let previous = data
            .remove(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        if let Err(err) = self.persist(&data) {
            data.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }
}
