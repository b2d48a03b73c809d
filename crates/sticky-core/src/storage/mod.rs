//! Storage layer
//!
//! The [`KeyValueStore`] trait is the whole contract a binding needs from its
//! store: string keys mapped to string values. Serialization of richer values
//! is the caller's business.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: in-process map, for tests and ephemeral sessions
//! - [`SqliteStore`]: single-table SQLite database
//! - [`JsonFileStore`]: one JSON object on disk, rewritten atomically
//!
//! All operations take `&self` so several bindings can share a store.
//! Backends are single-threaded and use interior mutability where needed.

pub mod error;
pub mod json;
pub mod memory;
pub mod schema;
pub mod sqlite;

use std::rc::Rc;

use chrono::{DateTime, Utc};

use crate::config::{Backend, Config};

pub use error::{StoreError, StoreResult};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use schema::{init_schema, needs_init, SCHEMA_VERSION};
pub use sqlite::SqliteStore;

/// Persistent string key/value storage
pub trait KeyValueStore {
    /// Read the value stored under `key`. Returns `None` if absent.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// All keys, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Short backend name for status output.
    fn backend_name(&self) -> &'static str;

    /// When `key` was last written. `None` if absent or not tracked.
    fn updated_at(&self, _key: &str) -> StoreResult<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn updated_at(&self, key: &str) -> StoreResult<Option<DateTime<Utc>>> {
        (**self).updated_at(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn updated_at(&self, key: &str) -> StoreResult<Option<DateTime<Utc>>> {
        (**self).updated_at(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    fn updated_at(&self, key: &str) -> StoreResult<Option<DateTime<Utc>>> {
        (**self).updated_at(key)
    }
}

/// A store opened from configuration
pub enum AnyStore {
    Sqlite(SqliteStore),
    Json(JsonFileStore),
}

impl AnyStore {
    fn inner(&self) -> &dyn KeyValueStore {
        match self {
            AnyStore::Sqlite(store) => store,
            AnyStore::Json(store) => store,
        }
    }
}

impl KeyValueStore for AnyStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.inner().get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.inner().set(key, value)
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner().remove(key)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        self.inner().keys()
    }

    fn backend_name(&self) -> &'static str {
        self.inner().backend_name()
    }

    fn updated_at(&self, key: &str) -> StoreResult<Option<DateTime<Utc>>> {
        self.inner().updated_at(key)
    }
}

/// Open the backend selected by `config`
///
/// Store files live in `config.data_dir`; missing directories are created.
pub fn open_store(config: &Config) -> StoreResult<AnyStore> {
    match config.backend {
        Backend::Sqlite => Ok(AnyStore::Sqlite(SqliteStore::open(&config.sqlite_path())?)),
        Backend::Json => Ok(AnyStore::Json(JsonFileStore::open(&config.json_path())?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir, backend: Backend) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            backend,
            ..Config::default()
        }
    }

    #[test]
    fn test_open_store_sqlite() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, Backend::Sqlite);

        let store = open_store(&config).unwrap();
        assert_eq!(store.backend_name(), "sqlite");
        store.set("search", "Redux").unwrap();

        assert!(config.sqlite_path().exists());
        assert_eq!(store.get("search").unwrap(), Some("Redux".to_string()));
        assert!(store.updated_at("search").unwrap().is_some());
    }

    #[test]
    fn test_open_store_json() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir, Backend::Json);

        let store = open_store(&config).unwrap();
        assert_eq!(store.backend_name(), "json");
        store.set("search", "Redux").unwrap();

        assert!(config.json_path().exists());
        assert!(store.updated_at("search").unwrap().is_none());
    }

    #[test]
    fn test_shared_handles_see_same_data() {
        let store = Rc::new(MemoryStore::new());
        let other = Rc::clone(&store);

        store.set("a", "1").unwrap();
        assert_eq!(other.get("a").unwrap(), Some("1".to_string()));

        let by_ref: &MemoryStore = &store;
        by_ref.remove("a").unwrap();
        assert_eq!(other.get("a").unwrap(), None);
    }
}
