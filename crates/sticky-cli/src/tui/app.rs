//! Application state and logic

use std::time::{Duration, Instant};

use sticky_core::{KeyValueStore, StorageBackedState};
use tracing::warn;

use crate::stories::Story;

/// How long a status message stays on screen
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Application state
pub struct App<S: KeyValueStore> {
    /// Whether the app should exit
    pub should_quit: bool,
    /// Persisted search term
    pub search: StorageBackedState<S>,
    /// Cursor position in the search input (in chars)
    pub cursor: usize,
    /// All stories (unfiltered)
    pub stories: Vec<Story>,
    /// Indices into `stories` matching the current term
    pub visible: Vec<usize>,
    /// Currently selected row in `visible`
    pub selected: usize,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Search revision `visible` was computed for
    filtered_at: Option<u64>,
}

impl<S: KeyValueStore> App<S> {
    /// Create a new app around a restored search binding
    pub fn new(search: StorageBackedState<S>, stories: Vec<Story>) -> Self {
        let cursor = search.value().chars().count();
        let mut app = Self {
            should_quit: false,
            search,
            cursor,
            stories,
            visible: Vec::new(),
            selected: 0,
            status_message: None,
            status_message_time: None,
            filtered_at: None,
        };
        app.refresh_filter();
        app
    }

    /// Recompute `visible` if the search term moved since the last pass
    pub fn refresh_filter(&mut self) {
        let revision = self.search.revision();
        if self.filtered_at == Some(revision) {
            return;
        }

        let term = self.search.value();
        self.visible = self
            .stories
            .iter()
            .enumerate()
            .filter(|(_, story)| story.matches(term))
            .map(|(index, _)| index)
            .collect();
        self.filtered_at = Some(revision);

        // Clamp selection to new list bounds
        if self.visible.is_empty() {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(self.visible.len() - 1);
        }
    }

    /// Stories matching the current term
    pub fn visible_stories(&self) -> impl Iterator<Item = &Story> {
        self.visible.iter().map(|&index| &self.stories[index])
    }

    /// Get the currently selected story
    pub fn current_story(&self) -> Option<&Story> {
        self.visible
            .get(self.selected)
            .map(|&index| &self.stories[index])
    }

    /// Persist the search term if it changed
    ///
    /// Called once per loop turn after drawing. Failures go to the status line.
    pub fn flush(&mut self) {
        if let Err(e) = self.search.flush() {
            warn!(error = %e, "failed to persist search term");
            self.set_status(format!("Could not save search: {}", e));
        }
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(Instant::now());
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Insert character at cursor
    pub fn insert_char(&mut self, c: char) {
        let mut term = self.search.value().to_string();
        term.insert(byte_offset(&term, self.cursor), c);
        self.cursor += 1;
        self.search.set_value(term);
        self.refresh_filter();
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let mut term = self.search.value().to_string();
        term.remove(byte_offset(&term, self.cursor));
        self.search.set_value(term);
        self.refresh_filter();
    }

    /// Clear the whole search term
    pub fn clear_search(&mut self) {
        self.cursor = 0;
        self.search.set_value(String::new());
        self.refresh_filter();
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.cursor < self.search.value().chars().count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to the start of the input
    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to the end of the input
    pub fn cursor_end(&mut self) {
        self.cursor = self.search.value().chars().count();
    }

    /// Move selection up
    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down
    pub fn move_down(&mut self) {
        if self.selected < self.visible.len().saturating_sub(1) {
            self.selected += 1;
        }
    }
}

/// Byte offset of the `chars`-th character (end of string if past it)
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices()
        .nth(chars)
        .map(|(index, _)| index)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stories::catalogue;
    use sticky_core::MemoryStore;

    fn app(store: &MemoryStore) -> App<&MemoryStore> {
        let search = StorageBackedState::new(store, "search", "React").unwrap();
        App::new(search, catalogue())
    }

    fn titles<S: KeyValueStore>(app: &App<S>) -> Vec<String> {
        app.visible_stories().map(|s| s.title.clone()).collect()
    }

    #[test]
    fn test_starts_filtered_by_default_term() {
        let store = MemoryStore::new();
        let app = app(&store);

        assert_eq!(app.search.value(), "React");
        assert_eq!(app.cursor, 5);
        assert_eq!(titles(&app), vec!["React".to_string()]);
    }

    #[test]
    fn test_starts_from_stored_term() {
        let store = MemoryStore::with_entries([("search", "Redux")]);
        let app = app(&store);

        assert_eq!(titles(&app), vec!["Redux".to_string()]);
    }

    #[test]
    fn test_typing_refilters_and_flush_persists() {
        let store = MemoryStore::new();
        let mut app = app(&store);

        app.clear_search();
        assert_eq!(app.visible.len(), app.stories.len());

        for c in "Hacker".chars() {
            app.insert_char(c);
        }
        assert_eq!(app.search.value(), "Hacker");
        assert_eq!(titles(&app), vec!["Hacker News Search API".to_string()]);

        // Nothing reaches the store until the loop flushes
        assert_eq!(store.get("search").unwrap(), None);
        app.flush();
        assert_eq!(store.get("search").unwrap(), Some("Hacker".to_string()));
    }

    #[test]
    fn test_editing_in_the_middle() {
        let store = MemoryStore::new();
        let mut app = app(&store);

        app.cursor_home();
        app.cursor_right();
        app.delete_char();
        assert_eq!(app.search.value(), "eact");
        assert_eq!(app.cursor, 0);

        app.insert_char('R');
        assert_eq!(app.search.value(), "React");

        app.cursor_end();
        app.delete_char();
        assert_eq!(app.search.value(), "Reac");

        // Backspace at the start does nothing
        app.cursor_home();
        app.delete_char();
        assert_eq!(app.search.value(), "Reac");
    }

    #[test]
    fn test_multibyte_input() {
        let store = MemoryStore::new();
        let mut app = app(&store);

        app.clear_search();
        app.insert_char('é');
        app.insert_char('x');
        app.cursor_left();
        app.delete_char();
        assert_eq!(app.search.value(), "x");
    }

    #[test]
    fn test_selection_is_clamped() {
        let store = MemoryStore::new();
        let mut app = app(&store);

        app.clear_search();
        app.move_down();
        app.move_down();
        app.move_down();
        assert_eq!(app.selected, 3);

        app.insert_char('r');
        app.insert_char('e');
        // "re": React, Redux
        assert_eq!(app.visible.len(), 2);
        assert_eq!(app.selected, 1);
        assert_eq!(app.current_story().unwrap().title, "Redux");

        app.insert_char('z');
        assert!(app.current_story().is_none());
        assert_eq!(app.selected, 0);
        app.move_up();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_flush_failure_sets_status() {
        let store = MemoryStore::new();
        let mut app = app(&store);

        store.set_unavailable(true);
        app.insert_char('!');
        app.flush();
        assert!(app
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("Could not save search"));
        assert!(app.search.is_dirty());

        store.set_unavailable(false);
        app.flush();
        assert_eq!(store.get("search").unwrap(), Some("React!".to_string()));
    }
}
