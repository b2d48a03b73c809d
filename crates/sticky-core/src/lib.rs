//! sticky Core Library
//!
//! This crate provides state that keeps itself mirrored into a persistent
//! key/value store. A binding is created from a key and a default; its value
//! is restored from the store when an entry exists, and every change is
//! written back once the binding is flushed.
//!
//! # Quick Start
//!
//! ```text
//! let store = MemoryStore::new();
//! let mut search = StorageBackedState::new(&store, "search", "React")?;
//!
//! search.set_value("Hacker");
//! search.flush()?;
//!
//! assert_eq!(store.get("search")?, Some("Hacker".to_string()));
//! ```
//!
//! # Modules
//!
//! - `state`: The storage-backed binding (main entry point)
//! - `reactive`: Change tracking primitives the binding is built from
//! - `storage`: Store trait, errors and backends (memory, SQLite, JSON file)
//! - `config`: Application configuration

pub mod config;
pub mod reactive;
pub mod state;
pub mod storage;

pub use config::{Backend, Config};
pub use reactive::{Effect, Signal};
pub use state::StorageBackedState;
pub use storage::{
    open_store, AnyStore, JsonFileStore, KeyValueStore, MemoryStore, SqliteStore, StoreError,
    StoreResult,
};
