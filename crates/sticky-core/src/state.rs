//! Storage-backed state
//!
//! A [`StorageBackedState`] pairs a key, a current value and a setter, and
//! keeps the value mirrored into a [`KeyValueStore`].
//!
//! ## Lifecycle
//!
//! - **Construction** reads the store once. A stored entry (even an empty
//!   string) becomes the starting value; otherwise the default is used.
//!   Nothing is written.
//! - **Mutation** (`set_value`, `set_key`) only updates memory and marks the
//!   binding dirty. It never blocks and never fails.
//! - **Flush** runs the write effect: if the current `(key, value)` pair
//!   differs from the last pair written, it is written once. A freshly
//!   constructed binding is dirty, so its first flush mirrors the starting
//!   pair into the store.
//! - **Teardown**: `close` flushes and reports failures. Dropping a dirty
//!   binding flushes best-effort and only logs a failure.
//!
//! Changing the key does not re-read the store. The next flush writes the
//! current value under the new key and leaves the old entry alone.

use tracing::{debug, warn};

use crate::reactive::{Effect, Signal};
use crate::storage::{KeyValueStore, StoreResult};

/// A string value kept in sync with a store entry
pub struct StorageBackedState<S: KeyValueStore> {
    store: S,
    key: Signal<String>,
    value: Signal<String>,
    /// Write effect, tracking the `(key, value)` pair last persisted
    persisted: Effect<(String, String)>,
    /// Set once `close` has run so `Drop` does not flush a second time
    closed: bool,
}

impl<S: KeyValueStore> StorageBackedState<S> {
    /// Bind `key` in `store`, falling back to `initial` when it has no entry
    ///
    /// Fails only if the store cannot be read.
    pub fn new(store: S, key: impl Into<String>, initial: impl Into<String>) -> StoreResult<Self> {
        let key = key.into();

        let value = match store.get(&key)? {
            Some(stored) => {
                debug!(key = %key, backend = store.backend_name(), "restored value from store");
                stored
            }
            None => initial.into(),
        };

        Ok(Self {
            store,
            key: Signal::new(key),
            value: Signal::new(value),
            persisted: Effect::new(),
            closed: false,
        })
    }

    /// Current value
    pub fn value(&self) -> &str {
        self.value.get()
    }

    /// Key the next write goes to
    pub fn key(&self) -> &str {
        self.key.get()
    }

    /// Replace the current value
    ///
    /// The store write is deferred to the next [`flush`](Self::flush).
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value.set(value.into());
    }

    /// Replace the key
    ///
    /// The value is kept as is. The next flush writes it under the new key.
    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key.set(key.into());
    }

    /// Counts accepted changes to the key or value
    ///
    /// Front ends compare this against a remembered revision to decide
    /// whether derived data needs recomputing.
    pub fn revision(&self) -> u64 {
        self.key.revision() + self.value.revision()
    }

    /// Whether the current pair has not been written yet
    pub fn is_dirty(&self) -> bool {
        self.persisted.is_stale(&self.current())
    }

    /// The store this binding writes to
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Write the current pair if it changed since the last write
    ///
    /// Returns whether a write happened. On failure the write stays pending.
    pub fn flush(&mut self) -> StoreResult<bool> {
        let current = self.current();
        let store = &self.store;

        self.persisted.run(&current, |(key, value)| -> StoreResult<()> {
            store.set(key, value)?;
            debug!(key = %key, len = value.len(), "persisted value");
            Ok(())
        })
    }

    /// Flush and tear down, reporting a failed final write
    pub fn close(mut self) -> StoreResult<()> {
        let result = self.flush();
        self.closed = true;
        result.map(|_| ())
    }

    fn current(&self) -> (String, String) {
        (self.key.get().clone(), self.value.get().clone())
    }
}

impl<S: KeyValueStore> Drop for StorageBackedState<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.flush() {
            warn!(key = %self.key.get(), error = %e, "dropping binding with unsaved value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonFileStore, MemoryStore, SqliteStore, StoreError};
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn test_default_fallback() {
        let store = MemoryStore::new();
        let state = StorageBackedState::new(&store, "search", "React").unwrap();

        assert_eq!(state.value(), "React");
        assert_eq!(state.key(), "search");
        // Construction only reads
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_restore_from_store() {
        let store = MemoryStore::with_entries([("search", "Redux")]);
        let state = StorageBackedState::new(&store, "search", "React").unwrap();

        assert_eq!(state.value(), "Redux");
    }

    #[test]
    fn test_restore_empty_string() {
        let store = MemoryStore::with_entries([("search", "")]);
        let state = StorageBackedState::new(&store, "search", "React").unwrap();

        assert_eq!(state.value(), "");
    }

    #[test]
    fn test_initial_read_uses_bound_key() {
        let store = MemoryStore::with_entries([("search", "Redux"), ("other", "Vue")]);
        let state = StorageBackedState::new(&store, "other", "React").unwrap();

        assert_eq!(state.value(), "Vue");
    }

    #[test]
    fn test_write_through() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();

        state.set_value("Angular");
        assert_eq!(state.value(), "Angular");
        assert!(state.is_dirty());

        assert!(state.flush().unwrap());
        assert!(!state.is_dirty());
        assert_eq!(store.get("search").unwrap(), Some("Angular".to_string()));
    }

    #[test]
    fn test_first_flush_mirrors_starting_pair() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
        assert!(state.is_dirty());

        assert!(state.flush().unwrap());
        assert_eq!(store.get("search").unwrap(), Some("React".to_string()));
        assert!(!state.flush().unwrap());
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_setting_same_value_twice() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
        state.flush().unwrap();

        state.set_value("Angular");
        state.set_value("Angular");
        state.flush().unwrap();
        state.set_value("Angular");
        state.flush().unwrap();

        assert_eq!(state.value(), "Angular");
        assert_eq!(store.get("search").unwrap(), Some("Angular".to_string()));
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_pending_writes_collapse_to_latest() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
        state.flush().unwrap();

        state.set_value("Angular");
        state.set_value("Vue");
        state.flush().unwrap();
        assert_eq!(store.get("search").unwrap(), Some("Vue".to_string()));
        assert_eq!(store.write_count(), 2);

        // Back to the persisted value before flushing: nothing to write
        state.set_value("Svelte");
        state.set_value("Vue");
        assert!(!state.is_dirty());
        assert!(!state.flush().unwrap());
        assert_eq!(store.write_count(), 2);
    }

    #[test]
    fn test_key_change_writes_under_new_key() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
        state.flush().unwrap();

        state.set_key("query");
        assert!(state.is_dirty());
        assert_eq!(state.value(), "React");
        state.flush().unwrap();
        assert_eq!(store.get("query").unwrap(), Some("React".to_string()));

        state.set_value("Vue");
        state.flush().unwrap();
        assert_eq!(store.get("query").unwrap(), Some("Vue".to_string()));
        // Old entry is neither deleted nor overwritten
        assert_eq!(store.get("search").unwrap(), Some("React".to_string()));
    }

    #[test]
    fn test_key_change_does_not_reread() {
        let store = MemoryStore::with_entries([("query", "Ember")]);
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();

        state.set_key("query");
        assert_eq!(state.value(), "React");

        state.flush().unwrap();
        assert_eq!(store.get("query").unwrap(), Some("React".to_string()));
    }

    #[test]
    fn test_revision_tracks_changes() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
        assert_eq!(state.revision(), 0);

        state.set_value("React");
        assert_eq!(state.revision(), 0);

        state.set_value("Redux");
        state.set_key("query");
        assert_eq!(state.revision(), 2);
    }

    #[test]
    fn test_new_surfaces_unavailable_store() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let err = StorageBackedState::new(&store, "search", "React")
            .err()
            .unwrap();
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }

    #[test]
    fn test_failed_flush_stays_pending() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();

        store.set_unavailable(true);
        state.set_value("Angular");
        let err = state.flush().unwrap_err();
        assert!(err.is_unavailable());
        assert!(state.is_dirty());

        store.set_unavailable(false);
        assert!(state.flush().unwrap());
        assert_eq!(store.get("search").unwrap(), Some("Angular".to_string()));
    }

    #[test]
    fn test_drop_flushes_pending_write() {
        let store = MemoryStore::new();
        {
            let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
            state.set_value("Hacker");
        }
        assert_eq!(store.get("search").unwrap(), Some("Hacker".to_string()));
    }

    #[test]
    fn test_drop_with_unavailable_store_does_not_panic() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
        state.set_value("Hacker");
        store.set_unavailable(true);

        drop(state);

        store.set_unavailable(false);
        assert_eq!(store.get("search").unwrap(), None);
    }

    #[test]
    fn test_close_reports_failure() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
        state.set_value("Hacker");

        store.set_unavailable(true);
        assert!(state.close().is_err());

        // Drop after close must not have retried
        store.set_unavailable(false);
        assert_eq!(store.get("search").unwrap(), None);
    }

    #[test]
    fn test_close_writes_once() {
        let store = MemoryStore::new();
        let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
        state.set_value("Hacker");
        state.close().unwrap();

        assert_eq!(store.get("search").unwrap(), Some("Hacker".to_string()));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_bindings_share_a_store() {
        let store = Rc::new(MemoryStore::new());
        let mut search = StorageBackedState::new(Rc::clone(&store), "search", "React").unwrap();
        let mut theme = StorageBackedState::new(Rc::clone(&store), "theme", "dark").unwrap();

        search.set_value("Redux");
        theme.set_value("light");
        search.flush().unwrap();
        theme.flush().unwrap();

        assert_eq!(
            store.keys().unwrap(),
            vec!["search".to_string(), "theme".to_string()]
        );
        assert_eq!(search.store().get("theme").unwrap(), Some("light".to_string()));
    }

    #[test]
    fn test_end_to_end_new_instance_restores() {
        let store = MemoryStore::new();

        let mut first = StorageBackedState::new(&store, "search", "React").unwrap();
        assert_eq!(first.value(), "React");
        first.set_value("Hacker");
        first.flush().unwrap();
        assert_eq!(store.get("search").unwrap(), Some("Hacker".to_string()));

        let second = StorageBackedState::new(&store, "search", "React").unwrap();
        assert_eq!(second.value(), "Hacker");
    }

    #[test]
    fn test_end_to_end_across_sqlite_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sticky.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            let mut state = StorageBackedState::new(&store, "search", "React").unwrap();
            assert_eq!(state.value(), "React");
            state.set_value("Hacker");
            state.close().unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let state = StorageBackedState::new(&store, "search", "React").unwrap();
        assert_eq!(state.value(), "Hacker");
    }

    #[test]
    fn test_end_to_end_across_json_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            let mut state = StorageBackedState::new(store, "search", "React").unwrap();
            state.set_value("Hacker");
            // Dropped without close: teardown flush persists it
        }

        let store = JsonFileStore::open(&path).unwrap();
        let state = StorageBackedState::new(store, "search", "React").unwrap();
        assert_eq!(state.value(), "Hacker");
    }
}
