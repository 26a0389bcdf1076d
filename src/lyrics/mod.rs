//! Lyrics module: acquiring and timing synchronized lyrics
//!
//! This module provides:
//! - LRC timeline parsing and active-line resolution
//! - Media backend client for remote lyric files
//! - Sidecar `.lrc` lookup for local media

pub mod client;
pub mod timeline;

pub use client::LyricsClient;
pub use timeline::{LyricLine, LyricTimeline};

use crate::playlist::{MediaItem, MediaKind};
use anyhow::Context;
use std::path::Path;

/// Where lyric files come from
#[derive(Debug, Clone)]
pub enum LyricsSource {
    /// `/api/get_lrc` on the media backend
    Remote(LyricsClient),
    /// `.lrc` file next to the local media file
    Local,
}

/// Lyric file name for a media file: the extension becomes `.lrc`.
pub fn lyric_file_name(media: &str) -> String {
    Path::new(media)
        .with_extension("lrc")
        .to_string_lossy()
        .into_owned()
}

/// Raw lyric text for a media item
pub async fn fetch_raw(source: &LyricsSource, media: &MediaItem) -> anyhow::Result<String> {
    match source {
        LyricsSource::Remote(client) => client.get_lrc(&lyric_file_name(media.file_name())).await,
        LyricsSource::Local => {
            let path = lyric_file_name(&media.location);
            match tokio::fs::read_to_string(&path).await {
                Ok(raw) => Ok(raw),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
                Err(e) => Err(e).with_context(|| format!("read {path}")),
            }
        }
    }
}

/// Timeline for a media item. Only audio carries lyrics; any failure yields
/// an empty timeline so playback is never interrupted.
pub async fn load_timeline(source: &LyricsSource, media: &MediaItem) -> LyricTimeline {
    if media.kind != MediaKind::Audio {
        return LyricTimeline::empty();
    }

    match fetch_raw(source, media).await {
        Ok(raw) => {
            let timeline = LyricTimeline::parse(&raw);
            tracing::debug!(media = %media.location, lines = timeline.len(), "lyrics loaded");
            timeline
        }
        Err(e) => {
            tracing::warn!(media = %media.location, "lyrics unavailable: {e:#}");
            LyricTimeline::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio() -> Vec<String> {
        vec!["mp3".to_string()]
    }

    #[test]
    fn test_lyric_file_name() {
        assert_eq!(lyric_file_name("Song - Artist.mp3"), "Song - Artist.lrc");
        assert_eq!(lyric_file_name("dir/a.b.mp3"), "dir/a.b.lrc");
        assert_eq!(lyric_file_name("noext"), "noext.lrc");
    }

    #[tokio::test]
    async fn test_local_sidecar_loaded() {
        let dir = std::env::temp_dir().join(format!("lyricview-lrc-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let media = dir.join("Song - Artist.mp3");
        std::fs::write(dir.join("Song - Artist.lrc"), "[ti:x]\n[00:01.5]one\n[00:03]two\n").unwrap();

        let item = MediaItem::new(media.to_string_lossy(), &audio());
        let timeline = load_timeline(&LyricsSource::Local, &item).await;
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.active_index(2.0), Some(0));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_sidecar_is_empty() {
        let item = MediaItem::new("/nonexistent/dir/nothing.mp3", &audio());
        assert!(load_timeline(&LyricsSource::Local, &item).await.is_empty());
    }

    #[tokio::test]
    async fn test_video_has_no_lyrics() {
        let item = MediaItem::new("clip.mp4", &audio());
        assert!(load_timeline(&LyricsSource::Local, &item).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_empty() {
        let client = LyricsClient::new("http://127.0.0.1:9").unwrap();
        let item = MediaItem::new("Song.mp3", &audio());
        assert!(load_timeline(&LyricsSource::Remote(client), &item).await.is_empty());
    }
}
