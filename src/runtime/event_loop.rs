use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self { pending_gg: false }
    }
}

/// Main terminal event loop: redraws when the model is dirty and dispatches
/// key events to it. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = EventLoopState::new();

    loop {
        // The model raises its redraw flag on every mutation; rendering is a
        // pure projection of the flattened rows.
        if app.needs_redraw() {
            let rows: Vec<_> = app.tree.flatten().collect();
            terminal.draw(|f| ui::draw(f, app, &rows, &settings.ui))?;
            app.clear_redraw();
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, &mut state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Handle one key press; returns `true` when the app should quit.
fn handle_key_event(key: KeyEvent, app: &mut App, state: &mut EventLoopState) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return true;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.move_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.move_up();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.pending_gg = false;
            app.collapse_or_parent();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.pending_gg = false;
            app.expand_focused();
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            state.pending_gg = false;
            app.activate_focused();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.focus_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.focus_last();
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            app.toggle_metadata_window();
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            app.refresh();
        }
        _ => {
            state.pending_gg = false;
        }
    }
    false
}
