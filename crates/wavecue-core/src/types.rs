//! Common value types for wavecue
//!
//! Small `Copy` types shared by the sample store, views and layers.

use serde::{Deserialize, Serialize};

/// Default sample rate assumed for generated test data (44.1kHz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// RGBA colour with components in 0.0..=1.0
///
/// Kept renderer-agnostic; the widgets crate converts it to its own colour type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 && digits.len() != 8 {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            u8::from_str_radix(digits.get(i..i + 2)?, 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

/// Default point marker colour (#ff7f00)
pub const DEFAULT_POINT_COLOR: Rgba = Rgba::rgb(1.0, 0.5, 0.0);

/// Default segment colour (#4a90d9)
pub const DEFAULT_SEGMENT_COLOR: Rgba = Rgba::rgb(0.29, 0.56, 0.85);

/// Half-open visible time range `[start, end)` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Duration of the window in seconds
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }

    /// Whether `time` lies in `[start, end)`
    pub fn contains(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }

    /// Whether `[start, end)` overlaps this window (touching edges do not count)
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        start < self.end && self.start < end
    }
}
