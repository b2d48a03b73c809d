//! sticky CLI
//!
//! Command-line interface for sticky: a story search whose term survives
//! restarts, plus raw access to the backing store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sticky_core::{open_store, Config};

mod commands;
mod output;
mod stories;
mod tui;

use commands::search::SearchArgs;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "sticky")]
#[command(about = "sticky - state that remembers itself")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use this config file instead of the default
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive search (default)
    Tui,
    /// Search stories using the persisted term
    Search {
        /// New search term (stored for next time)
        term: Option<String>,
        /// Store key for the term
        #[arg(short, long)]
        key: Option<String>,
        /// Term to use when nothing is stored
        #[arg(short, long)]
        default: Option<String>,
    },
    /// Print a stored value
    Get {
        key: String,
    },
    /// Store a value
    Set {
        key: String,
        value: String,
    },
    /// Remove a stored value
    #[command(alias = "rm")]
    Remove {
        key: String,
    },
    /// List stored keys
    #[command(alias = "ls")]
    Keys,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backend, search_key, default_search, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config_file.as_ref();

    // Config commands work without a usable store
    if let Some(Commands::Config { command }) = &cli.command {
        init_cli_logging();
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    // TUI is the default and logs to a file instead of stderr
    let command = match cli.command {
        Some(Commands::Tui) | None => return tui::run(&config),
        Some(command) => command,
    };

    init_cli_logging();
    let store = open_store(&config).context("Failed to open store")?;

    match command {
        Commands::Search { term, key, default } => commands::search::run(
            &store,
            &config,
            SearchArgs { term, key, default },
            &output,
        ),
        Commands::Get { key } => commands::kv::get(&store, &key, &output),
        Commands::Set { key, value } => commands::kv::set(&store, &key, &value, &output),
        Commands::Remove { key } => commands::kv::remove(&store, &key, &output),
        Commands::Keys => commands::kv::keys(&store, &output),
        Commands::Tui | Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize stderr logging for one-shot commands
///
/// Silent unless STICKY_LOG is set (e.g. `STICKY_LOG=debug`).
fn init_cli_logging() {
    let Ok(log_level) = std::env::var("STICKY_LOG") else {
        return;
    };

    let env_filter = EnvFilter::new(format!(
        "sticky_core={},sticky_cli={}",
        log_level, log_level
    ));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
