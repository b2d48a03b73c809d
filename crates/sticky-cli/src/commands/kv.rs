//! Raw store access commands

use anyhow::{Context, Result};

use sticky_core::KeyValueStore;

use crate::output::Output;

/// Print the value stored under `key`
pub fn get(store: &impl KeyValueStore, key: &str, output: &Output) -> Result<()> {
    let value = store
        .get(key)
        .with_context(|| format!("Failed to read '{}'", key))?;
    let updated_at = store
        .updated_at(key)
        .with_context(|| format!("Failed to read '{}'", key))?;
    output.print_value(key, value.as_deref(), updated_at);
    Ok(())
}

/// Store `value` under `key`
pub fn set(store: &impl KeyValueStore, key: &str, value: &str, output: &Output) -> Result<()> {
    store
        .set(key, value)
        .with_context(|| format!("Failed to write '{}'", key))?;
    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// Remove `key` from the store
pub fn remove(store: &impl KeyValueStore, key: &str, output: &Output) -> Result<()> {
    store
        .remove(key)
        .with_context(|| format!("Failed to remove '{}'", key))?;
    output.success(&format!("Removed {}", key));
    Ok(())
}

/// List every key in the store
pub fn keys(store: &impl KeyValueStore, output: &Output) -> Result<()> {
    let keys = store.keys().context("Failed to list keys")?;
    output.print_keys(store.backend_name(), &keys);
    Ok(())
}
