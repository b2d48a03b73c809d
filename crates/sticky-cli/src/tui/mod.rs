//! sticky TUI
//!
//! Interactive story search. The search term is a storage-backed binding:
//! it is restored when the screen opens and written back as you type.
//!
//! ## Keys
//!
//! - Typing / Backspace / ←/→ / Home / End: edit the search term
//! - Ctrl-U: clear the search term
//! - ↑/↓: move the selection
//! - Esc or Ctrl-C: quit
//!
//! ## Event loop
//!
//! Each turn draws, then flushes the binding (so a write always follows the
//! render that showed the change), then waits briefly for one key.

mod app;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use sticky_core::{open_store, Config, KeyValueStore, StorageBackedState};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;

use crate::stories;

/// Run the TUI application
pub fn run(config: &Config) -> Result<()> {
    // Initialize TUI logging (file-based, only if STICKY_LOG is set)
    init_tui_logging(config);

    let store = open_store(config).context("Failed to open store")?;
    let search = StorageBackedState::new(
        &store,
        config.search_key.clone(),
        config.default_search.clone(),
    )
    .context("Failed to restore search term")?;
    info!(key = %config.search_key, term = search.value(), "search restored");

    let mut app = App::new(search, stories::catalogue());

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result?;
    app.search.close().context("Failed to save search term")?;
    Ok(())
}

fn run_app<B: Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        // Check for status message timeout
        app.check_status_timeout();

        // Draw UI, then persist whatever it showed
        terminal.draw(|frame| ui::draw(frame, app))?;
        app.flush();

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Apply one key press to the app
fn handle_key<S: KeyValueStore>(app: &mut App<S>, key: KeyEvent) {
    // AltGr arrives as Ctrl+Alt on some platforms and should still type
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        // Quit
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if ctrl => app.should_quit = true,

        KeyCode::Char('u') if ctrl => app.clear_search(),

        // Selection
        KeyCode::Up => app.move_up(),
        KeyCode::Down => app.move_down(),

        // Text input
        KeyCode::Char(c) if !ctrl => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),

        _ => {}
    }
}

/// Initialize logging for TUI mode
///
/// Only initializes if STICKY_LOG environment variable is set.
/// Logs to file (config.log_file or default {data_dir}/debug.log).
fn init_tui_logging(config: &Config) {
    let Ok(log_level) = std::env::var("STICKY_LOG") else {
        return;
    };

    let log_path = config.log_path();

    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "sticky_core={},sticky_cli={}",
        log_level, log_level
    ));

    // Ignore error if already initialized
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use sticky_core::MemoryStore;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app(store: &MemoryStore) -> App<&MemoryStore> {
        let search = StorageBackedState::new(store, "search", "React").unwrap();
        App::new(search, stories::catalogue())
    }

    #[test]
    fn test_keys_edit_the_term() {
        let store = MemoryStore::new();
        let mut app = app(&store);

        handle_key(&mut app, ctrl('u'));
        for c in "vue".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)));
        }
        assert_eq!(app.search.value(), "vue");

        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.search.value(), "vu");
        assert_eq!(app.visible.len(), 1);
    }

    #[test]
    fn test_ctrl_chars_are_not_inserted() {
        let store = MemoryStore::new();
        let mut app = app(&store);

        handle_key(&mut app, ctrl('x'));
        assert_eq!(app.search.value(), "React");
    }

    #[test]
    fn test_altgr_chars_are_inserted() {
        let store = MemoryStore::new();
        let mut app = app(&store);
        handle_key(&mut app, ctrl('u'));

        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('@'), altgr));
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('€'), altgr));
        assert_eq!(app.search.value(), "@€");
    }

    #[test]
    fn test_quit_keys() {
        let store = MemoryStore::new();

        let mut first = app(&store);
        handle_key(&mut first, press(KeyCode::Esc));
        assert!(first.should_quit);

        let mut second = app(&store);
        handle_key(&mut second, ctrl('c'));
        assert!(second.should_quit);
    }

    #[test]
    fn test_loop_turn_draws_then_persists() {
        let store = MemoryStore::new();
        let mut app = app(&store);
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();

        handle_key(&mut app, press(KeyCode::Char('!')));
        terminal.draw(|frame| ui::draw(frame, &app)).unwrap();
        app.flush();

        assert_eq!(store.get("search").unwrap(), Some("React!".to_string()));
    }
}
