//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stories::Story;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print search results for the persisted term
    pub fn print_search(&self, key: &str, term: &str, stories: &[&Story]) {
        match self.format {
            OutputFormat::Human => {
                println!("Search: \"{}\" (stored under '{}')", term, key);
                println!();
                if stories.is_empty() {
                    println!("No stories found.");
                    return;
                }
                for story in stories {
                    println!(
                        "{} | {} | {} comments | {} points",
                        truncate(&story.title, 35),
                        truncate(&story.author, 30),
                        story.num_comments,
                        story.points
                    );
                    println!("  {}", story.url);
                }
                println!("\n{} story(s)", stories.len());
            }
            OutputFormat::Json => print_json(&search_json(key, term, stories)),
            OutputFormat::Quiet => {
                for story in stories {
                    println!("{}", story.title);
                }
            }
        }
    }

    /// Print a single store value (`None` when the key has no entry)
    pub fn print_value(&self, key: &str, value: Option<&str>, updated_at: Option<DateTime<Utc>>) {
        match self.format {
            OutputFormat::Human => match value {
                Some(value) => {
                    println!("{} = {}", key, value);
                    if let Some(updated_at) = updated_at {
                        println!("  updated {}", updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                }
                None => println!("{} is not set", key),
            },
            OutputFormat::Json => print_json(&value_json(key, value, updated_at)),
            OutputFormat::Quiet => {
                if let Some(value) = value {
                    println!("{}", value);
                }
            }
        }
    }

    /// Print store keys
    pub fn print_keys(&self, backend: &str, keys: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if keys.is_empty() {
                    println!("No entries in {} store.", backend);
                    return;
                }
                for key in keys {
                    println!("{}", key);
                }
                println!("\n{} key(s) in {} store", keys.len(), backend);
            }
            OutputFormat::Json => print_json(&keys),
            OutputFormat::Quiet => {
                for key in keys {
                    println!("{}", key);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn search_json(key: &str, term: &str, stories: &[&Story]) -> serde_json::Value {
    serde_json::json!({
        "key": key,
        "term": term,
        "stories": stories,
    })
}

fn value_json(
    key: &str,
    value: Option<&str>,
    updated_at: Option<DateTime<Utc>>,
) -> serde_json::Value {
    serde_json::json!({
        "key": key,
        "value": value,
        "updated_at": updated_at.map(|t| t.to_rfc3339()),
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to encode JSON output: {}", e),
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
