use super::lyric_view::LyricView;
use crate::playlist::{LoopMode, MediaItem};
use crate::scroll::{Cooldowns, SystemClock};
use ratatui::layout::Rect;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

pub struct AppState {
    pub should_quit: bool,
    pub tick: u64,

    // Playback
    pub now_playing: Option<MediaItem>,
    pub paused: bool,
    pub position_secs: f64,
    pub duration_secs: f64,
    pub volume: u8,
    pub loop_mode: LoopMode,

    // Lyrics
    pub lyrics: LyricView<SystemClock>,
    pub lyrics_loading: bool,
    /// Lyric pane rectangle from the last draw, for mouse hit-testing
    pub lyrics_area: Rect,

    pub toast: Option<Toast>,
}

impl AppState {
    pub fn new(cooldowns: Cooldowns) -> Self {
        Self {
            should_quit: false,
            tick: 0,
            now_playing: None,
            paused: false,
            position_secs: f64::NAN,
            duration_secs: f64::NAN,
            volume: 80,
            loop_mode: LoopMode::default(),
            lyrics: LyricView::new(SystemClock::new(), cooldowns),
            lyrics_loading: false,
            lyrics_area: Rect::default(),
            toast: None,
        }
    }

    /// Playback progress in `[0, 1]`; 0 while position or duration is unknown.
    pub fn progress(&self) -> f64 {
        let ratio = self.position_secs / self.duration_secs;
        if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 }
    }

    pub fn in_lyrics_area(&self, column: u16, row: u16) -> bool {
        let a = self.lyrics_area;
        column >= a.x && column < a.x + a.width && row >= a.y && row < a.y + a.height
    }
}

/// `m:ss`, with anything unknown or negative shown as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(62.9), "1:02");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn test_progress() {
        let mut state = AppState::new(Cooldowns::default());
        assert_eq!(state.progress(), 0.0);
        state.duration_secs = 100.0;
        assert_eq!(state.progress(), 0.0);
        state.position_secs = 25.0;
        assert_eq!(state.progress(), 0.25);
        state.position_secs = 150.0;
        assert_eq!(state.progress(), 1.0);
        state.duration_secs = 0.0;
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn test_lyrics_hit_test() {
        let mut state = AppState::new(Cooldowns::default());
        state.lyrics_area = Rect::new(2, 1, 10, 5);
        assert!(state.in_lyrics_area(2, 1));
        assert!(state.in_lyrics_area(11, 5));
        assert!(!state.in_lyrics_area(12, 5));
        assert!(!state.in_lyrics_area(5, 6));
        assert!(!state.in_lyrics_area(1, 3));
    }
}
