//! Non-interactive story search with a persisted term

use anyhow::{Context, Result};

use sticky_core::{Config, KeyValueStore, StorageBackedState};

use crate::output::Output;
use crate::stories;

/// Where the search term lives and what to start with
pub struct SearchArgs {
    /// New term to apply and persist
    pub term: Option<String>,
    /// Store key (defaults to `config.search_key`)
    pub key: Option<String>,
    /// Fallback term (defaults to `config.default_search`)
    pub default: Option<String>,
}

/// Restore the term, optionally replace it, print matches and persist
pub fn run(
    store: &impl KeyValueStore,
    config: &Config,
    args: SearchArgs,
    output: &Output,
) -> Result<()> {
    let key = args.key.unwrap_or_else(|| config.search_key.clone());
    let default = args
        .default
        .unwrap_or_else(|| config.default_search.clone());

    let mut search = StorageBackedState::new(store, key, default)
        .context("Failed to restore search term")?;

    if let Some(term) = args.term {
        search.set_value(term);
    }

    let catalogue = stories::catalogue();
    let matches = stories::filter(&catalogue, search.value());
    output.print_search(search.key(), search.value(), &matches);

    search.close().context("Failed to save search term")?;
    Ok(())
}
