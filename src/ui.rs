//! The UI renders the application state into something visible and navigable.
//!
//! The draw function dispatches based on the current view. The tree view shows the navigation
//! rows using box-drawing characters, the results view lists search hits, and the search prompt
//! replaces the help bar while a query is typed.

use crate::app_state::{AppState, NavMode, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Renders the active view based on current application state.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Tree or results
            Constraint::Length(3), // Help or prompt
        ])
        .split(f.area());

    let breadcrumb = Paragraph::new(app.breadcrumb())
        .block(Block::default().borders(Borders::ALL).title("Navigation"));
    f.render_widget(breadcrumb, chunks[0]);

    match app.current_view {
        View::Tree | View::Search => draw_tree(f, app, chunks[1]),
        View::Results => draw_results(f, app, chunks[1]),
    }

    draw_footer(f, app, chunks[2]);
}

/// Generate box-drawing prefix for tree structure
fn get_tree_prefix(level: usize, is_last: bool, parent_states: &[bool]) -> String {
    if level == 0 {
        return String::new();
    }

    let mut prefix = String::new();

    // Draw vertical lines for parent levels
    for i in 0..level.saturating_sub(1) {
        if i < parent_states.len() && parent_states[i] {
            prefix.push_str("│   ");
        } else {
            prefix.push_str("    ");
        }
    }

    if is_last {
        prefix.push_str("└── ");
    } else {
        prefix.push_str("├── ");
    }

    prefix
}

fn draw_tree(f: &mut Frame, app: &AppState, area: Rect) {
    // Calculate which rows are last at their level for box-drawing
    let mut is_last_at_level: Vec<bool> = vec![false; app.rows.len()];
    for (i, row) in app.rows.iter().enumerate() {
        let mut found_next = false;
        for later in &app.rows[i + 1..] {
            if later.depth < row.depth {
                break;
            }
            if later.depth == row.depth {
                found_next = true;
                break;
            }
        }
        is_last_at_level[i] = !found_next;
    }

    // Track which parent levels still have siblings coming
    let mut parent_has_siblings: Vec<bool> = Vec::new();

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            while parent_has_siblings.len() > row.depth {
                parent_has_siblings.pop();
            }
            while parent_has_siblings.len() < row.depth {
                parent_has_siblings.push(false);
            }
            if row.depth > 0 {
                let parent_idx = parent_has_siblings.len() - 1;
                parent_has_siblings[parent_idx] = !is_last_at_level[i];
            }

            let tree_prefix = get_tree_prefix(row.depth, is_last_at_level[i], &parent_has_siblings);

            let mut spans = vec![Span::raw(tree_prefix)];
            if app.mode == NavMode::Fallback {
                spans.push(Span::raw(format!("{} ({})", row.label, row.link)));
            } else if row.children_indices.is_empty() && !row.deferred {
                spans.push(Span::raw(row.label.clone()));
            } else {
                spans.push(Span::styled(
                    row.label.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ));
                if row.deferred {
                    spans.push(Span::styled(" …", Style::default().fg(Color::DarkGray)));
                }
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = match app.mode {
        NavMode::Tree => format!("Contents ({} entries)", app.rows.len()),
        NavMode::Fallback => format!("Links ({} entries, unstructured)", app.rows.len()),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state =
        ListState::default().with_selected(app.current_row().map(|_| app.current_row_index));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_results(f: &mut Frame, app: &AppState, area: Rect) {
    let items: Vec<ListItem> = app
        .results
        .iter()
        .map(|hit| {
            let mut spans = vec![Span::styled(
                hit.name.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )];
            if !hit.scope.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", hit.scope),
                    Style::default().fg(Color::Blue),
                ));
            }
            spans.push(Span::styled(
                format!("  {}", hit.link),
                Style::default().fg(Color::DarkGray),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!("Results for '{}' ({})", app.query_buffer, app.results.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(app.current_result_index));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(f: &mut Frame, app: &AppState, area: Rect) {
    let (text, title) = if app.current_view == View::Search {
        (format!("/{}", app.query_buffer), "Search")
    } else if let Some(ref msg) = app.message {
        (msg.clone(), "")
    } else if app.current_view == View::Results {
        ("↑/↓: Select | Enter: Open | Esc: Back".to_string(), "")
    } else {
        (
            "↑/↓: Move | ←/→: Parent/Child | Shift+↑/↓: Siblings | n/p: Next/Prev page | /: Search | Enter: Pick | q: Quit"
                .to_string(),
            "",
        )
    };

    let footer = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(footer, area);
}
