//! Time <-> pixel mapping at a samples-per-pixel resolution

/// Pure conversion between seconds and pixel offsets
///
/// `scale` is samples per pixel: lower values show more detail over less time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pub sample_rate: u32,
    pub scale: u32,
}

impl TimeScale {
    pub fn new(sample_rate: u32, scale: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            scale: scale.max(1),
        }
    }

    /// Pixel offset of `time` (floor), in the full-track pixel space
    pub fn time_to_pixels(&self, time: f64) -> i64 {
        (time * self.sample_rate as f64 / self.scale as f64).floor() as i64
    }

    /// Fractional pixel offset of `time`, for marker placement
    pub fn time_to_pixels_exact(&self, time: f64) -> f64 {
        time * self.sample_rate as f64 / self.scale as f64
    }

    /// Time at the left edge of pixel `pixels`
    pub fn pixels_to_time(&self, pixels: f64) -> f64 {
        pixels * self.scale as f64 / self.sample_rate as f64
    }

    /// Seconds covered by a single pixel
    pub fn seconds_per_pixel(&self) -> f64 {
        self.scale as f64 / self.sample_rate as f64
    }

    /// Scale needed to show `seconds` across `width` pixels (at least 1)
    pub fn scale_for_duration(sample_rate: u32, seconds: f64, width: u32) -> u32 {
        if width == 0 || !seconds.is_finite() || seconds <= 0.0 {
            return 1;
        }
        ((seconds * sample_rate as f64) / width as f64).floor().max(1.0) as u32
    }
}
