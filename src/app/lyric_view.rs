//! Lyric pane model: active line, scroll ownership and scroll position.
//!
//! Pure state; the TUI only reads it. Every line occupies one row, so a
//! line's top edge is its index and its height is 1.

use crate::lyrics::LyricTimeline;
use crate::scroll::{
    center_scroll_target, Clock, Cooldowns, ScrollMode, ScrollOwnership, SmoothScroll,
    SystemClock,
};

#[derive(Debug)]
pub struct LyricView<C: Clock = SystemClock> {
    timeline: LyricTimeline,
    active: Option<usize>,
    ownership: ScrollOwnership<C>,
    scroll: SmoothScroll,
    viewport_rows: usize,
}

impl<C: Clock> LyricView<C> {
    pub fn new(clock: C, cooldowns: Cooldowns) -> Self {
        Self {
            timeline: LyricTimeline::empty(),
            active: None,
            ownership: ScrollOwnership::new(clock, cooldowns),
            scroll: SmoothScroll::default(),
            viewport_rows: 0,
        }
    }

    pub fn timeline(&self) -> &LyricTimeline {
        &self.timeline
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Swap in a new timeline in one step; nothing from the old one survives.
    pub fn replace(&mut self, timeline: LyricTimeline) {
        self.timeline = timeline;
        self.active = None;
        self.scroll.reset();
    }

    pub fn clear(&mut self) {
        self.replace(LyricTimeline::empty());
    }

    /// Playback position update. Returns true when the active line changed.
    pub fn on_position(&mut self, seconds: f64) -> bool {
        let active = self.timeline.active_index(seconds);
        let changed = active != self.active;
        self.active = active;
        if self.ownership.may_auto_scroll() {
            self.center_active();
        }
        changed
    }

    /// Called by the renderer with the pane's inner height.
    pub fn set_viewport_rows(&mut self, rows: usize) {
        if rows == self.viewport_rows {
            return;
        }
        self.viewport_rows = rows;
        if self.ownership.may_auto_scroll() {
            self.center_active();
        }
    }

    pub fn on_user_scroll(&mut self, rows: i32) {
        self.ownership.on_scroll();
        self.scroll.jump_by(f64::from(rows), self.max_offset());
    }

    pub fn on_pointer_down(&mut self) {
        self.ownership.on_pointer_down();
    }

    pub fn on_pointer_up(&mut self) {
        self.ownership.on_pointer_up();
    }

    /// Take ownership back from the user immediately.
    pub fn recenter(&mut self) {
        self.ownership.release();
        self.center_active();
    }

    /// One animation frame. Returns true when something visible changed.
    pub fn frame(&mut self) -> bool {
        let resumed = self.ownership.poll();
        if resumed {
            tracing::debug!("lyric auto-scroll resumed");
            self.center_active();
        }
        self.scroll.step() || resumed
    }

    pub fn mode(&self) -> ScrollMode {
        self.ownership.mode()
    }

    /// Time until auto-scroll resumes, while a cooldown is running
    pub fn hold_remaining(&self) -> Option<std::time::Duration> {
        self.ownership.remaining()
    }

    /// First visible row
    pub fn scroll_rows(&self) -> usize {
        self.scroll.rows()
    }

    fn max_offset(&self) -> f64 {
        self.timeline.len().saturating_sub(self.viewport_rows) as f64
    }

    /// Aim the scroll at the active line. Skipped while the line or the
    /// viewport cannot be measured; the next position tick retries.
    fn center_active(&mut self) {
        let line_top = self
            .active
            .filter(|&i| i < self.timeline.len())
            .map(|i| i as f64);
        let viewport = (self.viewport_rows > 0).then_some(self.viewport_rows as f64);
        if let Some(target) = center_scroll_target(line_top, Some(1.0), viewport) {
            let max = self.max_offset();
            self.scroll.scroll_to(target, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricLine;
    use crate::scroll::ManualClock;
    use std::time::Duration;

    fn make_view(lines: usize, viewport: usize) -> (LyricView<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut view = LyricView::new(clock.clone(), Cooldowns::default());
        let raw: String = (0..lines).map(|i| format!("[00:{i:02}]line {i}\n")).collect();
        view.replace(LyricTimeline::parse(&raw));
        view.set_viewport_rows(viewport);
        (view, clock)
    }

    fn settle(view: &mut LyricView<ManualClock>) {
        for _ in 0..100 {
            if !view.frame() {
                return;
            }
        }
        panic!("scroll never settled");
    }

    #[test]
    fn test_position_tracks_active_line() {
        let (mut view, _) = make_view(5, 3);
        assert!(!view.on_position(f64::NAN));
        assert_eq!(view.active(), None);
        assert!(view.on_position(2.5));
        assert_eq!(view.active(), Some(2));
        assert!(!view.on_position(2.9));
        assert!(view.on_position(0.0));
        assert_eq!(view.active(), Some(0));
    }

    #[test]
    fn test_auto_scroll_centers_active_line() {
        let (mut view, _) = make_view(40, 10);
        view.on_position(20.0);
        settle(&mut view);
        // center of row 20 (20.5) minus half the viewport (5)
        assert_eq!(view.scroll_rows(), 16);
    }

    #[test]
    fn test_scroll_clamped_at_edges() {
        let (mut view, _) = make_view(40, 10);
        view.on_position(1.0);
        settle(&mut view);
        assert_eq!(view.scroll_rows(), 0);

        view.on_position(39.0);
        settle(&mut view);
        assert_eq!(view.scroll_rows(), 30);
    }

    #[test]
    fn test_user_scroll_suppresses_auto_scroll() {
        let (mut view, clock) = make_view(40, 10);
        view.on_position(20.0);
        settle(&mut view);

        view.on_user_scroll(-10);
        assert_eq!(view.scroll_rows(), 6);
        assert_eq!(view.mode(), ScrollMode::UserHeld);

        view.on_position(25.0);
        settle(&mut view);
        assert_eq!(view.scroll_rows(), 6);

        clock.advance(Duration::from_millis(1500));
        assert!(view.frame());
        settle(&mut view);
        assert_eq!(view.scroll_rows(), 21);
    }

    #[test]
    fn test_mode_query_does_not_swallow_resume() {
        let (mut view, clock) = make_view(40, 10);
        view.on_position(20.0);
        settle(&mut view);
        view.on_user_scroll(-10);
        assert_eq!(view.scroll_rows(), 6);

        clock.advance(Duration::from_millis(1500));
        // a draw between the deadline and the next frame reads the mode
        assert_eq!(view.mode(), ScrollMode::Auto);
        assert!(view.frame());
        settle(&mut view);
        assert_eq!(view.scroll_rows(), 16);
    }

    #[test]
    fn test_pointer_hold_and_release() {
        let (mut view, clock) = make_view(40, 10);
        view.on_pointer_down();
        view.on_position(30.0);
        settle(&mut view);
        assert_eq!(view.scroll_rows(), 0);

        view.on_pointer_up();
        clock.advance(Duration::from_millis(800));
        settle(&mut view);
        assert_eq!(view.scroll_rows(), 26);
    }

    #[test]
    fn test_recenter_takes_ownership_back() {
        let (mut view, _) = make_view(40, 10);
        view.on_position(20.0);
        view.on_user_scroll(-3);
        view.recenter();
        assert_eq!(view.mode(), ScrollMode::Auto);
        settle(&mut view);
        assert_eq!(view.scroll_rows(), 16);
    }

    #[test]
    fn test_replace_resets_view() {
        let (mut view, _) = make_view(40, 10);
        view.on_position(20.0);
        settle(&mut view);

        view.replace(LyricTimeline::parse("[00:01]only"));
        assert_eq!(view.active(), None);
        assert_eq!(view.scroll_rows(), 0);
        view.on_position(20.0);
        assert_eq!(view.active(), Some(0));
        assert_eq!(view.timeline().lines(), &[LyricLine::new(1.0, "only")]);

        view.clear();
        assert!(view.timeline().is_empty());
        view.on_position(20.0);
        assert_eq!(view.active(), None);
    }

    #[test]
    fn test_no_viewport_skips_scroll() {
        let (mut view, _) = make_view(40, 0);
        view.on_position(20.0);
        assert!(!view.frame());
        assert_eq!(view.scroll_rows(), 0);
    }
}
