//! Lyrics pane - one row per line, active line highlighted

use crate::app::state::AppState;
use crate::scroll::ScrollMode;
use crate::tui::theme::{get_theme, LoadingSpinner};
use crate::tui::truncate_str;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let held = state.lyrics.mode() == ScrollMode::UserHeld;
    let title = if held {
        match state.lyrics.hold_remaining() {
            Some(left) => format!(
                " {} Lyrics {} {:.1}s ",
                icons.lyrics,
                icons.hold,
                left.as_secs_f64()
            ),
            None => format!(" {} Lyrics {} ", icons.lyrics, icons.hold),
        }
    } else {
        format!(" {} Lyrics ", icons.lyrics)
    };
    let border = if held { theme.palette.border_held } else { theme.palette.border };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(border))
        .title(title)
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Add horizontal padding
    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(2),  // Left padding
            Constraint::Min(1),     // Content
            Constraint::Length(2),  // Right padding
        ])
        .split(inner)[1];

    state.lyrics_area = inner;
    state.lyrics.set_viewport_rows(padded.height as usize);

    if state.lyrics.timeline().is_empty() {
        let text = if state.lyrics_loading {
            format!("{} Loading lyrics...", LoadingSpinner::frame(state.tick))
        } else {
            "No lyrics available".to_string()
        };
        let placeholder = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(theme.palette.fg_secondary),
        )))
        .alignment(Alignment::Center);

        let middle = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)])
            .split(padded)[1];
        frame.render_widget(placeholder, middle);
        return;
    }

    let active = state.lyrics.active();
    let first = state.lyrics.scroll_rows();
    let max_width = padded.width as usize;

    let lines: Vec<Line> = state
        .lyrics
        .timeline()
        .lines()
        .iter()
        .enumerate()
        .skip(first)
        .take(padded.height as usize)
        .map(|(i, line)| {
            let style = match active {
                Some(a) if a == i => Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD),
                Some(a) if a > i => Style::default().fg(theme.palette.fg_dim),
                _ => Style::default().fg(theme.palette.fg_secondary),
            };
            Line::from(Span::styled(truncate_str(&line.text, max_width), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), padded);
}
