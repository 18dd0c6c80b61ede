//! Play-time indicator position for one view

use super::viewport::Viewport;

/// Playhead state, in view-relative pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playhead {
    time: f64,
    x: f64,
    in_window: bool,
    shown: bool,
}

impl Playhead {
    pub fn new(shown: bool) -> Self {
        Self {
            time: 0.0,
            x: 0.0,
            in_window: true,
            shown,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// View-relative x position
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Whether the indicator should be drawn
    pub fn is_visible(&self) -> bool {
        self.shown && self.in_window
    }

    /// Show or hide the indicator regardless of position
    pub fn set_visible(&mut self, shown: bool) {
        self.shown = shown;
    }

    /// Move to `time` against the current viewport
    pub fn sync(&mut self, time: f64, viewport: &Viewport) {
        self.time = time;
        self.x = viewport.x_of(time);
        self.in_window = self.x >= 0.0 && self.x <= viewport.width() as f64;
    }

    /// Recompute the position for an unchanged time after the window moved
    pub fn resync(&mut self, viewport: &Viewport) {
        self.sync(self.time, viewport);
    }
}
