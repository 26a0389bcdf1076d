//! Root layout widget

use crate::app::state::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use super::{lyrics, now_playing};

/// Main layout structure:
/// ┌─────────────────────────────────────────┐
/// │                 Lyrics                  │
/// │          (active line centered)         │
/// ├─────────────────────────────────────────┤
/// │                 Player                  │
/// └─────────────────────────────────────────┘
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Lyrics
            Constraint::Length(8), // Player bar
        ])
        .split(frame.area());

    lyrics::render(frame, state, rows[0]);
    now_playing::render(frame, state, rows[1]);
}
