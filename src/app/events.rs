use crate::lyrics::LyricTimeline;

/// Everything the app loop reacts to, delivered in arrival order.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    Player(PlayerEvent),
    Lyrics(LyricsEvent),
    /// Animation/cooldown tick
    Frame,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Mouse(crossterm::event::MouseEvent),
    Resize,
}

#[derive(Debug, Clone)]
pub enum PlayerEvent {
    Started,
    Paused,
    /// NaN while the position is unknown
    Position { seconds: f64 },
    Duration { seconds: f64 },
    Ended,
    Error(String),
}

#[derive(Debug, Clone)]
pub enum LyricsEvent {
    /// Result of the lyric load started for media change `load_id`
    Loaded { load_id: u64, timeline: LyricTimeline },
}
