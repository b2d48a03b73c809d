//! JSON file store
//!
//! The whole store is one JSON object of string values. It is read once at
//! open and rewritten on every change using an atomic write (temp file,
//! sync, rename) so the file is never left half-written.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, StoreError, StoreResult};

/// Persistent store in a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store; the file is created on first write.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let entries = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| StoreError::from_io(e, path.to_path_buf(), false))?;
            parse_entries(path, &content)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: RefCell::new(entries),
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        let data = serde_json::to_vec_pretty(entries).map_err(|e| StoreError::InvalidFormat {
            path: self.path.clone(),
            details: e.to_string(),
        })?;
        atomic_write(&self.path, &data)?;
        debug!(path = ?self.path, entries = entries.len(), "json store saved");
        Ok(())
    }
}

fn parse_entries(path: &Path, content: &str) -> StoreResult<BTreeMap<String, String>> {
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_str(content).map_err(|e| StoreError::InvalidFormat {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut next = self.entries.borrow().clone();
        next.insert(key.to_string(), value.to_string());
        // Only adopt the change once it is on disk
        self.persist(&next)?;
        *self.entries.borrow_mut() = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        if !self.entries.borrow().contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.borrow().clone();
        next.remove(key);
        self.persist(&next)?;
        *self.entries.borrow_mut() = next;
        Ok(())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }

    fn backend_name(&self) -> &'static str {
        "json"
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::from_io(e, parent.to_path_buf(), true))?;
    }

    let temp_path = path.with_extension("tmp");
    let write_err = |e| StoreError::from_io(e, temp_path.clone(), true);

    let mut file = File::create(&temp_path).map_err(write_err)?;
    file.write_all(data).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    fs::rename(&temp_path, path).map_err(|e| StoreError::from_io(e, path.to_path_buf(), true))?;

    Ok(())
}
