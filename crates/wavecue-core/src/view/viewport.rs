//! Visible pixel window over a resampled track

use crate::timescale::TimeScale;
use crate::types::TimeWindow;

/// Window state for one view
///
/// `frame_offset` is the left edge of the window in full-track pixels. Every
/// mutation re-establishes `0 <= frame_offset <= max(0, length - width)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    timescale: TimeScale,
    frame_offset: usize,
    width: usize,
    length: usize,
}

impl Viewport {
    pub fn new(timescale: TimeScale, width: usize, length: usize) -> Self {
        Self {
            timescale,
            frame_offset: 0,
            width,
            length,
        }
    }

    pub fn timescale(&self) -> TimeScale {
        self.timescale
    }

    pub fn scale(&self) -> u32 {
        self.timescale.scale
    }

    pub fn frame_offset(&self) -> usize {
        self.frame_offset
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Track length in pixels at the current scale
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn max_offset(&self) -> usize {
        self.length.saturating_sub(self.width)
    }

    /// Change resolution; the caller positions the window afterwards
    pub fn set_scale(&mut self, timescale: TimeScale, length: usize) {
        self.timescale = timescale;
        self.length = length;
        self.clamp();
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
        self.clamp();
    }

    /// Move the window, clamped; returns whether the offset changed
    pub fn set_frame_offset(&mut self, offset: i64) -> bool {
        let previous = self.frame_offset;
        self.frame_offset = offset.clamp(0, self.max_offset() as i64) as usize;
        previous != self.frame_offset
    }

    pub fn scroll_by(&mut self, pixels: i64) -> bool {
        self.set_frame_offset((self.frame_offset as i64).saturating_add(pixels))
    }

    /// Window offset that centres `time`
    pub fn offset_centred_on(&self, time: f64) -> i64 {
        self.timescale
            .time_to_pixels(time)
            .saturating_sub((self.width / 2) as i64)
    }

    pub fn centre_on(&mut self, time: f64) -> bool {
        self.set_frame_offset(self.offset_centred_on(time))
    }

    pub fn clamp(&mut self) {
        self.frame_offset = self.frame_offset.min(self.max_offset());
    }

    pub fn start_time(&self) -> f64 {
        self.timescale.pixels_to_time(self.frame_offset as f64)
    }

    pub fn end_time(&self) -> f64 {
        self.timescale
            .pixels_to_time((self.frame_offset + self.width) as f64)
    }

    /// Time at the middle of the window
    pub fn centre_time(&self) -> f64 {
        self.timescale
            .pixels_to_time(self.frame_offset as f64 + self.width as f64 / 2.0)
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time(), self.end_time())
    }

    /// View-relative x of `time` (may fall outside `0..width`)
    pub fn x_of(&self, time: f64) -> f64 {
        self.timescale.time_to_pixels_exact(time) - self.frame_offset as f64
    }
}
