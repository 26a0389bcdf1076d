use rand::Rng;
use std::path::Path;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
    Other,
}

impl MediaKind {
    pub fn detect(file_name: &str, audio_extensions: &[String]) -> Self {
        let Some(ext) = Path::new(file_name).extension().and_then(|e| e.to_str()) else {
            return MediaKind::Other;
        };
        if audio_extensions.iter().any(|a| a.eq_ignore_ascii_case(ext)) {
            MediaKind::Audio
        } else if VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)) {
            MediaKind::Video
        } else {
            MediaKind::Other
        }
    }
}

/// One playable file, local or on the media backend
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    /// Local path or backend file name
    pub location: String,
    pub kind: MediaKind,
    pub title: String,
    pub artist: String,
}

impl MediaItem {
    /// Titles follow the "Title - Artist.ext" naming convention.
    pub fn new(location: impl Into<String>, audio_extensions: &[String]) -> Self {
        let location = location.into();
        let name = file_name(&location);
        let kind = MediaKind::detect(name, audio_extensions);
        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name);

        let (title, artist) = match stem.split_once(" - ") {
            Some((t, a)) if !t.trim().is_empty() => (t.trim(), a.trim()),
            _ => (stem, ""),
        };
        let artist = if artist.is_empty() {
            match kind {
                MediaKind::Video => "Unknown author",
                _ => "Unknown artist",
            }
        } else {
            artist
        };

        Self {
            kind,
            title: title.to_string(),
            artist: artist.to_string(),
            location,
        }
    }

    pub fn file_name(&self) -> &str {
        file_name(&self.location)
    }
}

fn file_name(location: &str) -> &str {
    location.rsplit(['/', '\\']).next().unwrap_or(location)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    Off,
    One,
    #[default]
    All,
    Shuffle,
}

impl LoopMode {
    pub fn next(self) -> Self {
        match self {
            LoopMode::Off => LoopMode::One,
            LoopMode::One => LoopMode::All,
            LoopMode::All => LoopMode::Shuffle,
            LoopMode::Shuffle => LoopMode::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoopMode::Off => "Loop: Off",
            LoopMode::One => "Loop: One",
            LoopMode::All => "Loop: All",
            LoopMode::Shuffle => "Loop: Shuffle",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Playlist {
    items: Vec<MediaItem>,
    current_index: Option<usize>,
    loop_mode: LoopMode,
}

impl Playlist {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items,
            current_index: None,
            loop_mode: LoopMode::default(),
        }
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn cycle_loop_mode(&mut self) -> LoopMode {
        self.loop_mode = self.loop_mode.next();
        self.loop_mode
    }

    #[cfg(test)]
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Select an item by index. Out of range leaves the selection untouched.
    pub fn play_at(&mut self, index: usize) -> Option<&MediaItem> {
        if index >= self.items.len() {
            return None;
        }
        self.current_index = Some(index);
        self.items.get(index)
    }

    /// Next item, wrapping around (random in shuffle mode)
    pub fn next(&mut self) -> Option<&MediaItem> {
        let index = match self.loop_mode {
            LoopMode::Shuffle => self.random_index()?,
            _ => match self.current_index {
                Some(i) => (i + 1) % self.items.len().max(1),
                None => 0,
            },
        };
        self.play_at(index)
    }

    /// Previous item, wrapping around (random in shuffle mode)
    pub fn prev(&mut self) -> Option<&MediaItem> {
        let index = match self.loop_mode {
            LoopMode::Shuffle => self.random_index()?,
            _ => match self.current_index {
                Some(0) | None => self.items.len().checked_sub(1)?,
                Some(i) => i - 1,
            },
        };
        self.play_at(index)
    }

    /// Item to play after the current one finished, per loop mode.
    pub fn after_end(&mut self) -> Option<&MediaItem> {
        match self.loop_mode {
            LoopMode::Off => None,
            LoopMode::One => {
                let index = self.current_index?;
                self.play_at(index)
            }
            LoopMode::All | LoopMode::Shuffle => self.next(),
        }
    }

    fn random_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        Some(rand::rng().random_range(0..self.items.len()))
    }
}
