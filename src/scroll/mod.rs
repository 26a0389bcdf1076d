//! Scroll ownership for the lyric pane
//!
//! The pane is either centered automatically on the active line or held by
//! the user. A manual scroll or a pointer press takes ownership; ownership
//! returns after a cooldown with no further interaction.

pub mod clock;

pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub use clock::ManualClock;

use std::time::Duration;

pub const DEFAULT_SCROLL_COOLDOWN: Duration = Duration::from_millis(1500);
pub const DEFAULT_RELEASE_COOLDOWN: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    /// The renderer may center the active line.
    #[default]
    Auto,
    /// The user owns the scroll position.
    UserHeld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldowns {
    /// Inactivity window after the last wheel/scroll event.
    pub scroll: Duration,
    /// Window after the pointer is released.
    pub release: Duration,
}

impl Default for Cooldowns {
    fn default() -> Self {
        Self {
            scroll: DEFAULT_SCROLL_COOLDOWN,
            release: DEFAULT_RELEASE_COOLDOWN,
        }
    }
}

/// Arbitrates between auto-centering and manual scrolling.
///
/// Deadlines are stored instead of timers: every trigger replaces the pending
/// deadline, so there is never more than one resumption scheduled.
#[derive(Debug)]
pub struct ScrollOwnership<C: Clock = SystemClock> {
    clock: C,
    cooldowns: Cooldowns,
    mode: ScrollMode,
    pointer_down: bool,
    deadline: Option<Duration>,
}

impl<C: Clock> ScrollOwnership<C> {
    pub fn new(clock: C, cooldowns: Cooldowns) -> Self {
        Self {
            clock,
            cooldowns,
            mode: ScrollMode::Auto,
            pointer_down: false,
            deadline: None,
        }
    }

    /// Manual scroll on the lyric pane.
    pub fn on_scroll(&mut self) {
        self.mode = ScrollMode::UserHeld;
        // A held pointer keeps ownership until it is released.
        if !self.pointer_down {
            self.deadline = Some(self.clock.now() + self.cooldowns.scroll);
        }
    }

    /// Pointer pressed inside the lyric pane.
    pub fn on_pointer_down(&mut self) {
        self.mode = ScrollMode::UserHeld;
        self.pointer_down = true;
        self.deadline = None;
    }

    /// Pointer released anywhere.
    pub fn on_pointer_up(&mut self) {
        self.pointer_down = false;
        if self.mode() == ScrollMode::UserHeld {
            self.deadline = Some(self.clock.now() + self.cooldowns.release);
        }
    }

    /// Give ownership back immediately.
    pub fn release(&mut self) {
        self.mode = ScrollMode::Auto;
        self.pointer_down = false;
        self.deadline = None;
    }

    /// Apply an expired cooldown. Returns true when this call handed
    /// ownership back to auto-scroll.
    pub fn poll(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => {
                self.mode = ScrollMode::Auto;
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Current owner. A lapsed cooldown already reads as `Auto`; only
    /// `poll` consumes it.
    pub fn mode(&self) -> ScrollMode {
        match self.deadline {
            Some(deadline) if self.clock.now() >= deadline => ScrollMode::Auto,
            _ => self.mode,
        }
    }

    pub fn may_auto_scroll(&self) -> bool {
        self.mode() == ScrollMode::Auto
    }

    /// Time left before ownership returns, if a cooldown is pending.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_sub(self.clock.now()))
    }
}

/// Scroll offset that puts the middle of a line in the middle of the viewport.
///
/// `line_top` is measured from the scroll origin of the container. Returns
/// `None` when a measurement is missing or not finite; the caller skips
/// scrolling for this frame.
pub fn center_scroll_target(
    line_top: Option<f64>,
    line_height: Option<f64>,
    viewport_height: Option<f64>,
) -> Option<f64> {
    let (top, height, viewport) = (line_top?, line_height?, viewport_height?);
    if !(top.is_finite() && height.is_finite() && viewport.is_finite()) {
        return None;
    }
    Some(top + height / 2.0 - viewport / 2.0)
}

/// Eased scroll position chasing a target offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothScroll {
    offset: f64,
    target: f64,
}

impl SmoothScroll {
    /// Fraction of the remaining distance covered per frame.
    const EASING: f64 = 0.35;
    /// Snap once closer than this (rows).
    const SNAP: f64 = 0.5;

    /// Animate toward `target`, clamped to `[0, max]`.
    pub fn scroll_to(&mut self, target: f64, max: f64) {
        self.target = target.clamp(0.0, max.max(0.0));
    }

    /// Move immediately, as a manual scroll does.
    pub fn jump_by(&mut self, delta: f64, max: f64) {
        self.offset = (self.offset + delta).clamp(0.0, max.max(0.0));
        self.target = self.offset;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one animation frame. Returns true while still moving.
    pub fn step(&mut self) -> bool {
        let delta = self.target - self.offset;
        if delta.abs() < Self::SNAP {
            let moved = self.offset != self.target;
            self.offset = self.target;
            return moved;
        }
        self.offset += delta * Self::EASING;
        true
    }

    /// Offset rounded to whole rows for rendering.
    pub fn rows(&self) -> usize {
        self.offset.round().max(0.0) as usize
    }
}
