//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use sticky_core::KeyValueStore;

use super::app::App;

/// Prompt shown before the search input
const PROMPT: &str = "Search: ";

/// Main UI rendering function
pub fn draw<S: KeyValueStore>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_search_input(frame, app, chunks[0]);
    draw_story_list(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);
}

/// Draw the search input (top)
fn draw_search_input<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let line = Line::from(vec![
        Span::styled(PROMPT, Style::default().fg(Color::Cyan)),
        Span::raw(app.search.value()),
        Span::styled(
            format!("  ({} matches)", app.visible.len()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    let block = Block::default()
        .title(format!(" {} ", app.search.key()))
        .borders(Borders::ALL);
    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);

    frame.set_cursor_position(search_cursor(app, area));
}

/// Screen position of the input cursor, kept inside the border
fn search_cursor<S: KeyValueStore>(app: &App<S>, area: Rect) -> (u16, u16) {
    let typed: String = app.search.value().chars().take(app.cursor).collect();
    let offset = Span::raw(PROMPT)
        .width()
        .saturating_add(Span::raw(typed).width());
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);

    let left = area.x.saturating_add(1);
    let right = left.saturating_add(area.width.saturating_sub(3));
    (left.saturating_add(offset).min(right), area.y.saturating_add(1))
}

/// Draw the filtered story list (middle)
fn draw_story_list<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .visible_stories()
        .map(|story| {
            let title = Line::from(vec![Span::styled(
                story.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )]);

            let meta = Line::from(vec![Span::styled(
                format!(
                    "{} · {} comments · {} points · {}",
                    story.author, story.num_comments, story.points, story.url
                ),
                Style::default().add_modifier(Modifier::DIM),
            )]);

            ListItem::new(vec![title, meta])
        })
        .collect();

    let block = Block::default()
        .title(format!(" Stories ({}) ", app.visible.len()))
        .borders(Borders::ALL);

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !app.visible.is_empty() {
        state.select(Some(app.selected));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the status bar (bottom)
fn draw_status_bar<S: KeyValueStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        let unsaved = if app.search.is_dirty() { "*" } else { "" };
        format!(
            "{}{} [{}]  ↑/↓:select  ^U:clear  esc:quit",
            app.search.key(),
            unsaved,
            app.search.store().backend_name()
        )
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}
