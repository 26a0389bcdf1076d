//! Now Playing widget - compact text-only player bar

use crate::app::state::{format_time, AppState, ToastKind};
use crate::playlist::LoopMode;
use crate::tui::theme::{get_theme, Icons};
use crate::tui::truncate_str;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const KEY_HINTS: &str = " space pause  [ ] seek  n/p track  l loop  c center  q quit ";

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Player ", icons.music))
        .title_style(Style::default().fg(theme.palette.accent))
        .title_bottom(Line::from(Span::styled(
            KEY_HINTS,
            Style::default().fg(theme.palette.fg_dim),
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Add horizontal padding
    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),  // Left padding
            Constraint::Min(1),     // Content
            Constraint::Length(1),  // Right padding
        ])
        .split(inner)[1];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Artist
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls + volume
            Constraint::Min(0),    // Toast (if any)
        ])
        .split(padded);

    let content_width = padded.width.saturating_sub(1) as usize;

    let (title, artist) = match &state.now_playing {
        Some(item) => (item.title.as_str(), item.artist.as_str()),
        None => ("Not playing", ""),
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            truncate_str(title, content_width),
            Style::default()
                .fg(theme.palette.fg_primary)
                .add_modifier(Modifier::BOLD),
        ))),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            truncate_str(artist, content_width),
            Style::default().fg(theme.palette.fg_secondary),
        ))),
        rows[1],
    );

    let progress_bar = render_progress_bar(rows[2].width as usize, state.progress(), icons);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            progress_bar,
            Style::default().fg(theme.palette.accent),
        ))),
        rows[2],
    );

    let play_icon = if state.paused { icons.play } else { icons.pause };
    let vol_icon = if state.volume == 0 {
        icons.volume_mute
    } else if state.volume < 50 {
        icons.volume_low
    } else {
        icons.volume_high
    };

    let mut controls_spans = vec![
        Span::styled(
            format!(
                "{}/{}",
                format_time(state.position_secs),
                format_time(state.duration_secs)
            ),
            Style::default().fg(theme.palette.fg_secondary),
        ),
        Span::raw(" "),
        Span::styled(icons.prev, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(play_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(icons.next, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw("  "),
        Span::styled(vol_icon, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(
            format!("{}%", state.volume),
            Style::default().fg(theme.palette.fg_secondary),
        ),
    ];

    let loop_icon = match state.loop_mode {
        LoopMode::Off => None,
        LoopMode::One => Some(icons.repeat_one),
        LoopMode::All => Some(icons.repeat),
        LoopMode::Shuffle => Some(icons.shuffle),
    };
    if let Some(icon) = loop_icon {
        controls_spans.push(Span::raw(" "));
        controls_spans.push(Span::styled(icon, Style::default().fg(theme.palette.accent_alt)));
    }

    frame.render_widget(Paragraph::new(Line::from(controls_spans)), rows[3]);

    if let Some(toast) = &state.toast
        && !toast.is_expired()
    {
        let (prefix, color) = match toast.kind {
            ToastKind::Success => (icons.success, theme.palette.playing),
            ToastKind::Error => (icons.error, theme.palette.error),
        };
        let toast_line = Line::from(vec![
            Span::styled(format!("{} ", prefix), Style::default().fg(color)),
            Span::styled(
                truncate_str(&toast.message, content_width.saturating_sub(3)),
                Style::default().fg(color),
            ),
        ]);
        frame.render_widget(Paragraph::new(toast_line), rows[4]);
    }
}

fn render_progress_bar(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push_str(icons.progress_full);
    }
    bar.push_str(icons.progress_head);
    for _ in 0..empty {
        bar.push_str(icons.progress_empty);
    }
    bar
}
