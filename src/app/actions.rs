#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    TogglePause,
    VolumeUp,
    VolumeDown,
    SeekForward,
    SeekBack,
    PlayNext,
    PlayPrev,
    CycleLoopMode,

    /// Hand scroll ownership back and center the active line now
    Recenter,
    /// Manual scroll of the lyric pane by whole rows (negative = up)
    LyricsScroll(i32),
    /// Pointer pressed inside the lyric pane
    LyricsPointerDown,
    /// Pointer released anywhere
    PointerUp,

    Resize,
}
