pub mod actions;
pub mod events;
pub mod lyric_view;
pub mod state;

use crate::config::Config;
use crate::input;
use crate::lyrics::{self, LyricsSource};
use crate::player::MpvHandle;
use crate::playlist::{MediaItem, MediaKind, Playlist};
use crate::tui::{self, TuiTerminal};
use actions::Action;
use events::{Event, LyricsEvent, PlayerEvent};
use state::{AppState, Toast};
use std::time::Duration;
use tokio::sync::mpsc;

pub struct App {
    cfg: Config,
    state: AppState,
    source: LyricsSource,
    playlist: Playlist,
    mpv: Option<MpvHandle>,
    /// Bumped on every media change; stale lyric loads are dropped.
    load_id: u64,
}

impl App {
    pub fn new(cfg: Config, source: LyricsSource, playlist: Playlist) -> Self {
        let mut state = AppState::new(cfg.lyrics.cooldowns());
        state.volume = cfg.player.volume;
        state.loop_mode = playlist.loop_mode();

        Self {
            cfg,
            state,
            source,
            playlist,
            mpv: None,
            load_id: 0,
        }
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone(), self.cfg.input.mouse);
        spawn_frame_ticker(tx.clone(), Duration::from_millis(self.cfg.ui.frame_ms.max(10)));

        let mpv_log = self.cfg.paths.data_dir.join("mpv.log");
        match MpvHandle::spawn(
            tx.clone(),
            self.cfg.player.audio_device.as_deref(),
            Some(&mpv_log),
        )
        .await
        {
            Ok(h) => {
                let _ = h.set_volume(self.state.volume).await;
                self.mpv = Some(h);
            }
            Err(e) => {
                tracing::warn!("mpv unavailable: {e:#}");
                self.state.toast = Some(Toast::error(format!("mpv disabled: {e:#}")));
            }
        }

        if let Some(item) = self.playlist.next().cloned() {
            self.start_media(item, &tx).await;
        }

        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            let dirty = match ev {
                Event::Input(input_ev) => {
                    if let Some(action) = input::map_input_to_action(&self.state, input_ev) {
                        self.handle_action(action, &tx).await;
                    }
                    true
                }
                Event::Player(pe) => self.handle_player(pe, &tx).await,
                Event::Lyrics(le) => self.handle_lyrics(le),
                Event::Frame => self.handle_frame(),
            };

            if self.state.should_quit {
                break;
            }

            if dirty {
                tui::draw(terminal, &mut self.state)?;
            }
        }

        Ok(())
    }

    async fn handle_action(&mut self, action: Action, tx: &mpsc::Sender<Event>) {
        match action {
            Action::Quit => {
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.stop().await;
                }
                self.state.should_quit = true;
            }
            Action::TogglePause => {
                if let Some(mpv) = &self.mpv
                    && let Err(e) = mpv.toggle_pause().await
                {
                    self.state.toast = Some(Toast::error(format!("mpv error: {e:#}")));
                }
            }
            Action::VolumeUp | Action::VolumeDown => {
                let v = if action == Action::VolumeUp {
                    self.state.volume.saturating_add(5).min(100)
                } else {
                    self.state.volume.saturating_sub(5)
                };
                self.state.volume = v;
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.set_volume(v).await;
                }
            }
            Action::SeekForward | Action::SeekBack => {
                let delta = if action == Action::SeekForward { 10.0 } else { -10.0 };
                if let Some(mpv) = &self.mpv {
                    let _ = mpv.seek_relative(delta).await;
                }
            }
            Action::PlayNext => {
                if let Some(item) = self.playlist.next().cloned() {
                    self.start_media(item, tx).await;
                }
            }
            Action::PlayPrev => {
                if let Some(item) = self.playlist.prev().cloned() {
                    self.start_media(item, tx).await;
                }
            }
            Action::CycleLoopMode => {
                let mode = self.playlist.cycle_loop_mode();
                self.state.loop_mode = mode;
                self.state.toast = Some(Toast::success(mode.label()));
            }
            Action::Recenter => self.state.lyrics.recenter(),
            Action::LyricsScroll(rows) => self.state.lyrics.on_user_scroll(rows),
            Action::LyricsPointerDown => self.state.lyrics.on_pointer_down(),
            Action::PointerUp => self.state.lyrics.on_pointer_up(),
            Action::Resize => {}
        }
    }

    async fn handle_player(&mut self, pe: PlayerEvent, tx: &mpsc::Sender<Event>) -> bool {
        match pe {
            PlayerEvent::Started => self.state.paused = false,
            PlayerEvent::Paused => self.state.paused = true,
            PlayerEvent::Position { seconds } => {
                self.state.position_secs = seconds;
                if self.state.lyrics.on_position(seconds) {
                    tracing::trace!(active = ?self.state.lyrics.active(), "active lyric changed");
                }
            }
            PlayerEvent::Duration { seconds } => self.state.duration_secs = seconds,
            PlayerEvent::Ended => {
                if let Some(item) = self.playlist.after_end().cloned() {
                    self.start_media(item, tx).await;
                }
            }
            PlayerEvent::Error(msg) => {
                self.state.toast = Some(Toast::error(msg));
            }
        }
        true
    }

    fn handle_lyrics(&mut self, ev: LyricsEvent) -> bool {
        match ev {
            LyricsEvent::Loaded { load_id, timeline } => {
                if load_id != self.load_id {
                    tracing::debug!(load_id, current = self.load_id, "dropping stale lyrics");
                    return false;
                }
                self.state.lyrics_loading = false;
                self.state.lyrics.replace(timeline);
                self.state.lyrics.on_position(self.state.position_secs);
                true
            }
        }
    }

    fn handle_frame(&mut self) -> bool {
        self.state.tick = self.state.tick.wrapping_add(1);
        let mut dirty = self.state.lyrics.frame();
        if self.state.lyrics_loading {
            dirty = true;
        }
        if self.state.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.state.toast = None;
            dirty = true;
        }
        dirty
    }

    /// Switch to a media item: the old timeline is gone before anything of
    /// the new item is observed.
    async fn start_media(&mut self, item: MediaItem, tx: &mpsc::Sender<Event>) {
        tracing::info!(media = %item.location, kind = ?item.kind, "starting media");
        self.load_id += 1;
        self.state.lyrics.clear();
        self.state.position_secs = f64::NAN;
        self.state.duration_secs = f64::NAN;
        self.state.now_playing = Some(item.clone());

        if item.kind == MediaKind::Video {
            self.state.lyrics_loading = false;
            self.state.toast = Some(Toast::error("Video items play without lyrics"));
        } else {
            self.spawn_lyrics_load(item.clone(), tx);
        }

        if let Some(mpv) = &self.mpv {
            let location = match &self.source {
                LyricsSource::Remote(client) => client.media_url(item.file_name()),
                LyricsSource::Local => item.location.clone(),
            };
            if let Err(e) = mpv.load_file(&location).await {
                self.state.toast = Some(Toast::error(format!("mpv error: {e:#}")));
            }
        }
    }

    fn spawn_lyrics_load(&mut self, item: MediaItem, tx: &mpsc::Sender<Event>) {
        self.state.lyrics_loading = true;
        let load_id = self.load_id;
        let source = self.source.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let timeline = lyrics::load_timeline(&source, &item).await;
            let _ = tx
                .send(Event::Lyrics(LyricsEvent::Loaded { load_id, timeline }))
                .await;
        });
    }
}

fn spawn_frame_ticker(tx: mpsc::Sender<Event>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(Event::Frame).await.is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricTimeline;

    fn make_app(files: &[&str]) -> App {
        let cfg = Config::default();
        let items = files
            .iter()
            .map(|f| MediaItem::new(*f, &cfg.lyrics.audio_extensions))
            .collect();
        App::new(cfg, LyricsSource::Local, Playlist::new(items))
    }

    #[tokio::test]
    async fn test_media_change_clears_lyrics_immediately() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = make_app(&["/nonexistent/a.mp3", "/nonexistent/b.mp3"]);

        app.handle_action(Action::PlayNext, &tx).await;
        assert!(app.handle_lyrics(LyricsEvent::Loaded {
            load_id: app.load_id,
            timeline: LyricTimeline::parse("[00:01]a"),
        }));
        app.handle_player(PlayerEvent::Position { seconds: 2.0 }, &tx).await;
        assert_eq!(app.state.lyrics.active(), Some(0));

        app.handle_action(Action::PlayNext, &tx).await;
        assert!(app.state.lyrics.timeline().is_empty());
        app.handle_player(PlayerEvent::Position { seconds: 2.0 }, &tx).await;
        assert_eq!(app.state.lyrics.active(), None);
    }

    #[tokio::test]
    async fn test_stale_lyrics_dropped() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = make_app(&["/nonexistent/a.mp3", "/nonexistent/b.mp3"]);

        app.handle_action(Action::PlayNext, &tx).await;
        let stale = app.load_id;
        app.handle_action(Action::PlayNext, &tx).await;

        assert!(!app.handle_lyrics(LyricsEvent::Loaded {
            load_id: stale,
            timeline: LyricTimeline::parse("[00:01]old song"),
        }));
        assert!(app.state.lyrics.timeline().is_empty());
        assert!(app.state.lyrics_loading);
    }

    #[tokio::test]
    async fn test_loaded_lyrics_use_current_position() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = make_app(&["/nonexistent/a.mp3"]);
        app.handle_action(Action::PlayNext, &tx).await;
        app.handle_player(PlayerEvent::Position { seconds: 5.0 }, &tx).await;

        app.handle_lyrics(LyricsEvent::Loaded {
            load_id: app.load_id,
            timeline: LyricTimeline::parse("[00:01]a\n[00:04]b\n[00:09]c"),
        });
        assert_eq!(app.state.lyrics.active(), Some(1));
        assert!(!app.state.lyrics_loading);
    }

    #[tokio::test]
    async fn test_video_skips_lyrics() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = make_app(&["/nonexistent/clip.mp4"]);
        app.handle_action(Action::PlayNext, &tx).await;
        assert!(!app.state.lyrics_loading);
        assert!(app.state.lyrics.timeline().is_empty());
        assert!(app.state.toast.is_some());
    }

    #[tokio::test]
    async fn test_unknown_position_shows_no_active_line() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = make_app(&["/nonexistent/a.mp3"]);
        app.handle_action(Action::PlayNext, &tx).await;
        app.handle_lyrics(LyricsEvent::Loaded {
            load_id: app.load_id,
            timeline: LyricTimeline::parse("[00:00]a"),
        });
        app.handle_player(PlayerEvent::Position { seconds: f64::NAN }, &tx).await;
        assert_eq!(app.state.lyrics.active(), None);
        assert_eq!(state::format_time(app.state.position_secs), "0:00");
    }

    #[tokio::test]
    async fn test_loop_mode_cycles() {
        let (tx, _rx) = mpsc::channel(16);
        let mut app = make_app(&["/nonexistent/a.mp3"]);
        let before = app.state.loop_mode;
        app.handle_action(Action::CycleLoopMode, &tx).await;
        assert_ne!(app.state.loop_mode, before);
    }
}
