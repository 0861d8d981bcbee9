//! TUI rendering logic for the movie browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Row, Table};

use super::state::{BrowserState, InputMode, MovieListState, TrendingState};

/// Draws the movie browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Length(7), // trending
            Constraint::Min(5),    // movie list
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_search_box(frame, chunks[0], state);
    draw_trending(frame, chunks[1], state);
    draw_movies(frame, chunks[2], state);
    draw_footer(frame, chunks[3], state);
}

/// Draws the search input box.
fn draw_search_box(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let input_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let input = Paragraph::new(state.search_input.clone())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(input, area);
}

/// Draws the trending section: exactly one of spinner, error, or list.
fn draw_trending(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Trending Searches ");

    match &state.trending {
        TrendingState::Loading => {
            let spinner = Paragraph::new("Loading...")
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(block);
            frame.render_widget(spinner, area);
        }
        TrendingState::Failed(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(error, area);
        }
        TrendingState::Loaded(counters) => {
            let items: Vec<ListItem> = counters
                .iter()
                .enumerate()
                .map(|(i, counter)| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:>2}. ", i.saturating_add(1)),
                            Style::default().fg(Color::Yellow),
                        ),
                        Span::raw(counter.search_term.clone()),
                        Span::styled(
                            format!("  ({} searches)", counter.count),
                            Style::default().add_modifier(Modifier::DIM),
                        ),
                    ]))
                })
                .collect();
            frame.render_widget(List::new(items).block(block), area);
        }
    }
}

/// Draws the movie section: exactly one of spinner, error, or table.
fn draw_movies(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let title = state.committed_term().map_or(" Popular Movies ", |term| {
        if term.is_empty() {
            " Popular Movies "
        } else {
            " Search Results "
        }
    });
    let block = Block::default().borders(Borders::ALL).title(title);

    match &state.movies {
        MovieListState::Idle | MovieListState::Loading { .. } => {
            let spinner = Paragraph::new("Loading...")
                .style(Style::default().add_modifier(Modifier::DIM))
                .block(block);
            frame.render_widget(spinner, area);
        }
        MovieListState::Empty => {
            let empty = Paragraph::new(super::state::NO_RESULTS_MESSAGE)
                .style(Style::default().add_modifier(Modifier::ITALIC))
                .block(block);
            frame.render_widget(empty, area);
        }
        MovieListState::Failed { message, .. } => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(error, area);
        }
        MovieListState::Loaded(results) => {
            let header = Row::new(vec!["Title", "Rating", "Lang", "Release"])
                .style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .bottom_margin(1);

            let rows: Vec<Row> = results
                .iter()
                .map(|movie| {
                    Row::new(vec![
                        movie.title.clone(),
                        format!("{:.1}", movie.vote_average),
                        movie.original_language.clone(),
                        if movie.release_date.is_empty() {
                            String::from("--")
                        } else {
                            movie.release_date.clone()
                        },
                    ])
                })
                .collect();

            let widths = [
                Constraint::Min(30),
                Constraint::Length(8),
                Constraint::Length(6),
                Constraint::Length(12),
            ];

            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );

            frame.render_stateful_widget(table, area, &mut state.movie_table_state);
        }
    }
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = match state.input_mode {
        InputMode::Search => "Type to search | Esc: clear | Enter: done",
        InputMode::Normal => {
            "/: search  \u{2191}\u{2193}/j/k: move  o: open in browser  q: quit"
        }
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
