//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It is a
//! pure consumer of the app model and the flattened rows: drawing never
//! mutates the tree.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::App;
use crate::config::UiSettings;
use crate::library::{FlatRow, Node, NodeKind};

const CONTROLS: &[(&str, &str)] = &[
    ("j/k", "up/down"),
    ("gg/G", "top/bottom"),
    ("enter", "expand / select"),
    ("h/l", "collapse/expand"),
    ("K", "metadata"),
    ("r", "rescan"),
    ("q", "quit"),
];

/// Render the controls help text for the footer.
fn controls_text() -> String {
    CONTROLS
        .iter()
        .map(|(key, action)| format!("[{}] {}", key, action))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }

    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{}:{:02} ({}s)", minutes, seconds, total_secs)
}

/// Format an optional byte count with a binary unit suffix.
fn format_size(size: Option<u64>) -> String {
    let Some(size) = size else {
        return "-".to_string();
    };
    if size < 1024 {
        format!("{} B", size)
    } else if size < 1024 * 1024 {
        format!("{:.1} KiB", size as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", size as f64 / (1024.0 * 1024.0))
    }
}

/// Build the tree-branch prefix for a row: a `│ ` continuation for every
/// non-last ancestor, then `├ ` for a mid-list entry or `└ ` for the last
/// sibling.
fn branch_prefix(row: &FlatRow) -> String {
    let mut prefix = String::new();
    for last in &row.last_at_depth[..row.depth] {
        prefix.push_str(if *last { "  " } else { "│ " });
    }
    prefix.push_str(if row.is_last_sibling() { "└ " } else { "├ " });
    prefix
}

/// Build the display text for one row. Directories get a trailing `/`; a
/// directory that was listed and came back empty is marked so, while a
/// not-yet-listed one is not (unknown is not the same as empty).
fn row_text(node: &Node, row: &FlatRow) -> String {
    let mut text = branch_prefix(row);
    text.push_str(&node.name);
    if let NodeKind::Directory(state) = &node.kind {
        text.push('/');
        if state.loaded && state.expanded && state.children.is_empty() {
            text.push_str(" (empty)");
        }
    }
    text
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the entire UI into the provided `frame` using `app` state and settings.
pub fn draw(frame: &mut Frame, app: &App, rows: &[FlatRow], ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" lyrebird ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        parts.push(match &app.last_error {
            Some(error) => format!("ERROR: {}", error),
            None => "No errors".to_string(),
        });

        if let Some(id) = &app.now_playing {
            if let Some(node) = app.tree.node(id) {
                let duration = node.track_meta().and_then(|meta| meta.duration);
                match duration {
                    Some(d) => parts.push(format!("Song: {} [{}]", node.name, format_mmss(d))),
                    None => parts.push(format!("Song: {}", node.name)),
                }
            }
        }

        parts.push(format!("Library: {}", app.root().display()));

        parts.join(" • ")
    };

    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Tree pane
    {
        // Center the focused row when possible by creating a visible window.
        // Only build ListItems for that window (avoid allocating the entire list).
        let total = rows.len();
        let list_height = chunks[2].height.saturating_sub(2) as usize;
        let sel_pos = rows
            .iter()
            .position(|row| Some(&row.id) == app.tree.focused())
            .unwrap_or(0);
        let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
            (0, total, sel_pos)
        } else {
            let half = list_height / 2;
            let mut start = if sel_pos > half { sel_pos - half } else { 0 };
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, sel_pos - start)
        };

        let visible_items: Vec<ListItem> = rows[start..end]
            .iter()
            .map(|row| match app.tree.node(&row.id) {
                Some(node) => ListItem::new(row_text(node, row)),
                None => ListItem::new(String::new()),
            })
            .collect();

        let list = List::new(visible_items)
            .block(Block::default().borders(Borders::ALL).title(" library "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if total > 0 {
            state.select(Some(selected_pos_in_visible));
        }
        frame.render_stateful_widget(list, chunks[2], &mut state);
    }

    // Overlay metadata popup (keeps the tree visible under it)
    if app.metadata_window {
        let list_area = chunks[2];
        let popup_area = centered_rect_sized(72, 9, list_area);
        frame.render_widget(Clear, popup_area);

        let meta = if let Some(details) = &app.metadata {
            format!(
                "Name: {}\nTitle: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nSize: {}\nPath: {}",
                details.name,
                details.tags.title.as_deref().unwrap_or("-"),
                details.tags.artist.as_deref().unwrap_or("-"),
                details.tags.album.as_deref().unwrap_or("-"),
                format_duration_mmss_ceil(details.tags.duration),
                format_size(details.size),
                details.path.display()
            )
        } else {
            "No track selected".to_string()
        };
        let meta_paragraph = Paragraph::new(meta)
            .block(
                Block::default()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .borders(Borders::ALL)
                    .title(" metadata (K closes) "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(meta_paragraph, popup_area);
    }

    // Footer
    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(footer, chunks[3]);
}
