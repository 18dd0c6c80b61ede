//! Tick sources driving the cue scan during playback
//!
//! Two interchangeable sources, only one in use at a time:
//!
//! - `FrameTicks`: one scan per display refresh, reading the player's current
//!   time. Smooth, but refresh callbacks throttle or stop when the page is in
//!   the background or under automation.
//! - `TimeUpdateTicks`: one scan per media time-update notification. Coarser,
//!   but keeps firing in the background.

use crate::schedule::FrameClock;

/// Whether the host page is in the foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageVisibility {
    #[default]
    Visible,
    Hidden,
}

/// Which tick source is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    Frame,
    TimeUpdate,
}

/// Refresh callbacks only for a visible, human-driven page
pub fn select_tick_source(visibility: PageVisibility, automated: bool) -> TickKind {
    match (visibility, automated) {
        (PageVisibility::Visible, false) => TickKind::Frame,
        _ => TickKind::TimeUpdate,
    }
}

/// Yields `(time, previous_time)` pairs for the cue scan
pub trait TickSource: std::fmt::Debug {
    fn kind(&self) -> TickKind;

    /// Playback started at `time`
    fn start(&mut self, time: f64);

    /// Playback stopped; drop anything scheduled
    fn stop(&mut self);

    /// Discrete jump: the next scan starts from `time`
    fn reset(&mut self, time: f64);

    fn previous_time(&self) -> f64;

    /// Whether a display refresh is wanted
    fn wants_frame(&self) -> bool {
        false
    }

    /// Display refresh with the player's current time
    fn on_frame(&mut self, _current_time: f64) -> Option<(f64, f64)> {
        None
    }

    /// Media time-update notification
    fn on_time_update(&mut self, _time: f64) -> Option<(f64, f64)> {
        None
    }
}

/// Build the source for `kind`
pub fn tick_source(kind: TickKind) -> Box<dyn TickSource> {
    match kind {
        TickKind::Frame => Box::new(FrameTicks::default()),
        TickKind::TimeUpdate => Box::new(TimeUpdateTicks::default()),
    }
}

// ============================================================================
// FrameTicks
// ============================================================================

#[derive(Debug, Default)]
pub struct FrameTicks {
    clock: FrameClock,
    previous: f64,
}

impl TickSource for FrameTicks {
    fn kind(&self) -> TickKind {
        TickKind::Frame
    }

    fn start(&mut self, time: f64) {
        self.previous = time;
        self.clock.request();
    }

    fn stop(&mut self) {
        if self.clock.cancel() {
            log::trace!("Cancelled pending cue frame");
        }
    }

    fn reset(&mut self, time: f64) {
        self.previous = time;
    }

    fn previous_time(&self) -> f64 {
        self.previous
    }

    fn wants_frame(&self) -> bool {
        self.clock.is_pending()
    }

    fn on_frame(&mut self, current_time: f64) -> Option<(f64, f64)> {
        self.clock.fire()?;
        let previous = self.previous;
        self.previous = current_time;
        self.clock.request();
        Some((current_time, previous))
    }
}

// ============================================================================
// TimeUpdateTicks
// ============================================================================

#[derive(Debug, Default)]
pub struct TimeUpdateTicks {
    running: bool,
    previous: f64,
}

impl TickSource for TimeUpdateTicks {
    fn kind(&self) -> TickKind {
        TickKind::TimeUpdate
    }

    fn start(&mut self, time: f64) {
        self.previous = time;
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self, time: f64) {
        self.previous = time;
    }

    fn previous_time(&self) -> f64 {
        self.previous
    }

    fn on_time_update(&mut self, time: f64) -> Option<(f64, f64)> {
        if !self.running {
            return None;
        }
        let previous = self.previous;
        self.previous = time;
        Some((time, previous))
    }
}
