//! Animated transition between two zoom scales
//!
//! Each frame is a fresh resample of the source data at an intermediate
//! scale, windowed around the anchor time. The animation only produces
//! frames; the owning view applies the final scale itself when it finishes,
//! through the same path as an unanimated zoom.

use std::sync::Arc;

use crate::error::ViewerResult;
use crate::schedule::{FrameClock, FrameRequest};
use crate::timescale::TimeScale;
use crate::waveform::WaveformData;

/// One intermediate frame
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    /// 1-based frame number
    pub index: u32,
    pub scale: u32,
    /// Left edge of `data` in full-track pixels at `scale`
    pub frame_offset: usize,
    /// Columns `frame_offset..frame_offset + width` at `scale`
    pub data: WaveformData,
}

impl AnimationFrame {
    pub fn timescale(&self) -> TimeScale {
        self.data.timescale()
    }
}

/// In-flight zoom transition
#[derive(Debug)]
pub struct ZoomAnimation {
    source: Arc<WaveformData>,
    from_scale: u32,
    to_scale: u32,
    anchor_time: f64,
    width: usize,
    frames: u32,
    step: u32,
    cancelled: bool,
    current: Option<AnimationFrame>,
    clock: FrameClock,
}

impl ZoomAnimation {
    /// Prepare a transition; `frames` is at least 1
    ///
    /// Requests the first display frame immediately.
    pub fn new(
        source: Arc<WaveformData>,
        from_scale: u32,
        to_scale: u32,
        anchor_time: f64,
        width: usize,
        frames: u32,
    ) -> Self {
        let mut clock = FrameClock::new();
        clock.request();
        log::debug!(
            "Zoom animation {} -> {} over {} frames, anchored at {:.3}s",
            from_scale,
            to_scale,
            frames.max(1),
            anchor_time
        );
        Self {
            source,
            from_scale,
            to_scale,
            anchor_time,
            width,
            frames: frames.max(1),
            step: 0,
            cancelled: false,
            current: None,
            clock,
        }
    }

    pub fn from_scale(&self) -> u32 {
        self.from_scale
    }

    pub fn to_scale(&self) -> u32 {
        self.to_scale
    }

    pub fn anchor_time(&self) -> f64 {
        self.anchor_time
    }

    pub fn frame_count(&self) -> u32 {
        self.frames
    }

    /// Frames already produced
    pub fn steps_taken(&self) -> u32 {
        self.step
    }

    pub fn is_finished(&self) -> bool {
        self.cancelled || self.step >= self.frames
    }

    /// Most recently produced frame
    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.current.as_ref()
    }

    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.clock.pending()
    }

    /// Scale used by frame `index` (1-based)
    pub fn scale_at(&self, index: u32) -> u32 {
        let r0 = self.from_scale as f64;
        let r1 = self.to_scale as f64;
        (r0 + index as f64 * (r1 - r0) / self.frames as f64).round() as u32
    }

    /// Advance one frame on a display tick
    ///
    /// Ignored when no frame is pending (cancelled or finished). Returns
    /// whether a frame was produced.
    pub fn on_frame(&mut self) -> ViewerResult<bool> {
        if self.clock.fire().is_none() || self.is_finished() {
            return Ok(false);
        }
        self.step += 1;
        self.current = Some(self.render(self.step)?);
        if !self.is_finished() {
            self.clock.request();
        }
        Ok(true)
    }

    /// Drop any remaining frames
    pub fn cancel(&mut self) {
        if self.clock.cancel() {
            log::debug!(
                "Zoom animation to {} cancelled after {}/{} frames",
                self.to_scale,
                self.step,
                self.frames
            );
        }
        self.cancelled = true;
    }

    fn render(&self, index: u32) -> ViewerResult<AnimationFrame> {
        let scale = self.scale_at(index);
        let length = self.source.output_length(scale)?;
        let timescale = TimeScale::new(self.source.sample_rate(), scale);

        let centre = timescale.time_to_pixels(self.anchor_time) - (self.width / 2) as i64;
        let max_offset = length.saturating_sub(self.width) as i64;
        let frame_offset = centre.clamp(0, max_offset) as usize;

        let data = self.source.resample_range(scale, frame_offset, self.width)?;
        Ok(AnimationFrame {
            index,
            scale,
            frame_offset,
            data,
        })
    }
}
