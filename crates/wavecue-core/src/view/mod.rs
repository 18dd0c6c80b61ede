//! Waveform views: overview and zoomview
//!
//! A `WaveformView` owns everything one view needs to draw itself: the
//! viewport, its resampled copy of the shared source data, its two annotation
//! layers, its playhead and, on the zoomview, any zoom animation in flight.
//!
//! Views never read the annotation collections themselves. Operations report
//! whether the visible window moved and the viewer hands the current
//! collections to `refresh_layers`.

mod animation;
mod playhead;
mod viewport;
mod zoom;

pub use animation::{AnimationFrame, ZoomAnimation};
pub use playhead::Playhead;
pub use viewport::Viewport;
pub use zoom::ZoomLevels;

use std::sync::Arc;

use crate::annotations::{Point, Segment};
use crate::config::ViewerConfig;
use crate::error::{check_time, ViewerError, ViewerResult};
use crate::layers::{LayerContext, PointsLayer, SegmentsLayer};
use crate::timescale::TimeScale;
use crate::types::TimeWindow;
use crate::waveform::{Peak, Resample, WaveformData};

// ============================================================================
// Request and result types
// ============================================================================

/// The two views of a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Whole track, no windowing
    Overview,
    /// Zoomable window onto the track
    Zoomview,
}

impl ViewKind {
    pub fn name(&self) -> &'static str {
        match self {
            ViewKind::Overview => "overview",
            ViewKind::Zoomview => "zoomview",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "overview" => Some(ViewKind::Overview),
            "zoomview" => Some(ViewKind::Zoomview),
            _ => None,
        }
    }
}

/// Requested zoom resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomTarget {
    /// Samples per pixel
    Scale(u32),
    /// Show this many seconds across the view width
    Seconds(f64),
    /// Fit the whole track into the view
    Fit,
}

/// Scroll amount; exactly one field must be set
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollDelta {
    pub pixels: Option<f64>,
    pub seconds: Option<f64>,
}

impl ScrollDelta {
    pub fn pixels(pixels: f64) -> Self {
        Self {
            pixels: Some(pixels),
            seconds: None,
        }
    }

    pub fn seconds(seconds: f64) -> Self {
        Self {
            pixels: None,
            seconds: Some(seconds),
        }
    }
}

/// When `seek_to` moves the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recenter {
    /// Centre the window on the new time
    Always,
    /// Scroll only when the time leaves the window or nears its right edge
    NearEdge,
}

/// Outcome of `set_zoom`
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomChange {
    pub previous: u32,
    pub current: u32,
    /// Set when the requested scale was clamped to the source resolution
    pub warning: Option<ViewerError>,
    /// A transition animation was started
    pub animated: bool,
    /// The visible window has already changed
    pub window_changed: bool,
}

impl ZoomChange {
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

/// Result of a display tick on a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationTick {
    /// No animation frame was due
    Idle,
    /// Frame `n` of the animation is ready
    Frame(u32),
    /// The animation ended and the target scale is applied
    Finished,
}

/// What to draw right now
#[derive(Debug, Clone, Copy)]
pub struct DisplayFrame<'a> {
    pub data: &'a WaveformData,
    /// Column of `data` drawn at x = 0
    pub first_column: usize,
    pub timescale: TimeScale,
    /// Full-track pixel at x = 0
    pub frame_offset: usize,
    pub width: usize,
}

impl DisplayFrame<'_> {
    /// Peak for view column `x`
    pub fn column(&self, channel: usize, x: usize) -> Option<Peak> {
        self.data.at(channel, self.first_column + x)
    }

    pub fn x_of(&self, time: f64) -> f64 {
        self.timescale.time_to_pixels_exact(time) - self.frame_offset as f64
    }

    pub fn time_at(&self, x: f64) -> f64 {
        self.timescale.pixels_to_time(x + self.frame_offset as f64)
    }
}

// ============================================================================
// WaveformView
// ============================================================================

/// One rendered view of the shared waveform
#[derive(Debug)]
pub struct WaveformView {
    kind: ViewKind,
    source: Arc<WaveformData>,
    data: WaveformData,
    viewport: Viewport,
    points: PointsLayer,
    segments: SegmentsLayer,
    playhead: Playhead,
    animation: Option<ZoomAnimation>,
    animate_zoom: bool,
    zoom_in_frames: u32,
    zoom_out_frames: u32,
    auto_scroll_margin: f64,
}

impl WaveformView {
    /// Whole-track view fitted to `width`
    pub fn overview(
        source: Arc<WaveformData>,
        width: usize,
        config: &ViewerConfig,
    ) -> ViewerResult<Self> {
        let width = width.max(1);
        let data = source.resample(Resample::Width(width as u32))?;
        Ok(Self::build(
            ViewKind::Overview,
            source,
            data,
            width,
            config.overview.show_playhead,
            config,
        ))
    }

    /// Windowed view at `scale`
    ///
    /// A scale finer than the source is clamped; the warning is returned
    /// alongside the view.
    pub fn zoomview(
        source: Arc<WaveformData>,
        width: usize,
        scale: u32,
        config: &ViewerConfig,
    ) -> ViewerResult<(Self, Option<ViewerError>)> {
        let width = width.max(1);
        let (scale, warning) = clamp_scale(&source, scale);
        let data = source.resample(Resample::Scale(scale))?;
        let view = Self::build(ViewKind::Zoomview, source, data, width, true, config);
        Ok((view, warning))
    }

    fn build(
        kind: ViewKind,
        source: Arc<WaveformData>,
        data: WaveformData,
        width: usize,
        show_playhead: bool,
        config: &ViewerConfig,
    ) -> Self {
        let viewport = Viewport::new(data.timescale(), width, data.length());
        let markers = &config.markers;
        let zoomview = &config.zoomview;
        log::debug!(
            "Created {} view: {}px wide, scale {}, {} columns",
            kind.name(),
            width,
            data.scale(),
            data.length()
        );
        Self {
            kind,
            source,
            data,
            viewport,
            points: PointsLayer::new(markers.marker_width, markers.hit_tolerance),
            segments: SegmentsLayer::new(markers.marker_width, markers.hit_tolerance),
            playhead: Playhead::new(show_playhead),
            animation: None,
            animate_zoom: zoomview.animation.enabled,
            zoom_in_frames: zoomview.animation.zoom_in_frames,
            zoom_out_frames: zoomview.animation.zoom_out_frames,
            auto_scroll_margin: zoomview.auto_scroll_margin,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn kind(&self) -> ViewKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn source(&self) -> &Arc<WaveformData> {
        &self.source
    }

    /// Full track resampled at the current scale
    pub fn data(&self) -> &WaveformData {
        &self.data
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scale(&self) -> u32 {
        self.viewport.scale()
    }

    pub fn width(&self) -> usize {
        self.viewport.width()
    }

    pub fn frame_offset(&self) -> usize {
        self.viewport.frame_offset()
    }

    pub fn visible_window(&self) -> TimeWindow {
        self.viewport.window()
    }

    pub fn time_to_pixels(&self, time: f64) -> i64 {
        self.viewport.timescale().time_to_pixels(time)
    }

    pub fn pixels_to_time(&self, pixels: f64) -> f64 {
        self.viewport.timescale().pixels_to_time(pixels)
    }

    pub fn points_layer(&self) -> &PointsLayer {
        &self.points
    }

    pub fn segments_layer(&self) -> &SegmentsLayer {
        &self.segments
    }

    pub(crate) fn points_layer_mut(&mut self) -> &mut PointsLayer {
        &mut self.points
    }

    pub(crate) fn segments_layer_mut(&mut self) -> &mut SegmentsLayer {
        &mut self.segments
    }

    pub fn playhead(&self) -> &Playhead {
        &self.playhead
    }

    pub fn set_playhead_visible(&mut self, visible: bool) {
        self.playhead.set_visible(visible);
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&ZoomAnimation> {
        self.animation.as_ref()
    }

    /// Scale the view shows now, or will show once an animation completes
    pub fn target_scale(&self) -> u32 {
        self.animation
            .as_ref()
            .map_or(self.viewport.scale(), |a| a.to_scale())
    }

    /// Geometry handed to the annotation layers
    pub fn layer_context(&self) -> LayerContext {
        LayerContext {
            timescale: self.viewport.timescale(),
            frame_offset: self.viewport.frame_offset() as f64,
            width: self.viewport.width() as f64,
            duration: self.source.duration(),
        }
    }

    /// Columns to draw: the current animation frame, or the steady window
    pub fn display(&self) -> DisplayFrame<'_> {
        if let Some(frame) = self.animation.as_ref().and_then(|a| a.current_frame()) {
            return DisplayFrame {
                data: &frame.data,
                first_column: 0,
                timescale: frame.timescale(),
                frame_offset: frame.frame_offset,
                width: self.viewport.width(),
            };
        }
        DisplayFrame {
            data: &self.data,
            first_column: self.viewport.frame_offset(),
            timescale: self.viewport.timescale(),
            frame_offset: self.viewport.frame_offset(),
            width: self.viewport.width(),
        }
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Change resolution, animated when configured
    ///
    /// A no-op (same effective scale) starts no animation and reports
    /// `window_changed: false`.
    pub fn set_zoom(&mut self, target: ZoomTarget) -> ViewerResult<ZoomChange> {
        self.require_zoomview("set_zoom")?;

        let requested = match target {
            ZoomTarget::Scale(scale) => scale,
            ZoomTarget::Seconds(seconds) => {
                check_time("seconds", seconds)?;
                TimeScale::scale_for_duration(
                    self.source.sample_rate(),
                    seconds,
                    self.viewport.width() as u32,
                )
            }
            ZoomTarget::Fit => self
                .source
                .scale_for(Resample::Width(self.viewport.width() as u32)),
        };
        let (scale, warning) = clamp_scale(&self.source, requested);

        let previous = self.target_scale();
        if scale == previous {
            return Ok(ZoomChange {
                previous,
                current: scale,
                warning,
                animated: false,
                window_changed: false,
            });
        }

        // Settle any running transition before starting from its target
        let settled = self.cancel_animation()?;
        let anchor = self.anchor_time();
        let from = self.viewport.scale();

        if self.animate_zoom {
            let frames = if scale < from {
                self.zoom_in_frames
            } else {
                self.zoom_out_frames
            };
            self.animation = Some(ZoomAnimation::new(
                self.source.clone(),
                from,
                scale,
                anchor,
                self.viewport.width(),
                frames,
            ));
            self.set_layers_visible(false);
            return Ok(ZoomChange {
                previous,
                current: scale,
                warning,
                animated: true,
                window_changed: settled,
            });
        }

        self.apply_scale(scale, anchor)?;
        Ok(ZoomChange {
            previous,
            current: scale,
            warning,
            animated: false,
            window_changed: true,
        })
    }

    /// Advance the zoom animation on a display tick
    pub fn on_animation_frame(&mut self) -> ViewerResult<AnimationTick> {
        let Some(animation) = self.animation.as_mut() else {
            return Ok(AnimationTick::Idle);
        };
        let produced = match animation.on_frame() {
            Ok(produced) => produced,
            Err(e) => {
                log::warn!("Zoom animation frame failed, jumping to target: {}", e);
                animation.cancel();
                false
            }
        };
        if animation.is_finished() {
            self.cancel_animation()?;
            return Ok(AnimationTick::Finished);
        }
        if produced {
            Ok(AnimationTick::Frame(animation.steps_taken()))
        } else {
            Ok(AnimationTick::Idle)
        }
    }

    /// Stop any animation and apply its target scale immediately
    ///
    /// Returns whether an animation was running.
    pub fn cancel_animation(&mut self) -> ViewerResult<bool> {
        let Some(mut animation) = self.animation.take() else {
            return Ok(false);
        };
        animation.cancel();
        self.apply_scale(animation.to_scale(), animation.anchor_time())?;
        self.set_layers_visible(true);
        Ok(true)
    }

    /// Playhead time when it is in view, else the window centre
    fn anchor_time(&self) -> f64 {
        let time = self.playhead.time();
        if self.viewport.window().contains(time) {
            time
        } else {
            self.viewport.centre_time()
        }
    }

    /// Switch to `scale` and centre the window on `anchor`
    fn apply_scale(&mut self, scale: u32, anchor: f64) -> ViewerResult<()> {
        self.data = self.source.resample(Resample::Scale(scale))?;
        self.viewport.set_scale(self.data.timescale(), self.data.length());
        self.viewport.centre_on(anchor);
        self.playhead.resync(&self.viewport);
        log::debug!(
            "{} scale now {}, offset {}",
            self.kind.name(),
            scale,
            self.viewport.frame_offset()
        );
        Ok(())
    }

    fn set_layers_visible(&mut self, visible: bool) {
        self.points.set_visible(visible);
        self.segments.set_visible(visible);
    }

    // =========================================================================
    // Window movement
    // =========================================================================

    /// Scroll the zoomview; returns whether the window moved
    pub fn scroll_by(&mut self, delta: ScrollDelta) -> ViewerResult<bool> {
        self.require_zoomview("scroll_by")?;
        let pixels = match (delta.pixels, delta.seconds) {
            (Some(pixels), None) if pixels.is_finite() => pixels.round() as i64,
            (None, Some(seconds)) if seconds.is_finite() => self
                .viewport
                .timescale()
                .time_to_pixels_exact(seconds)
                .round() as i64,
            _ => return Err(ViewerError::InvalidScroll),
        };
        let settled = self.cancel_animation()?;
        let moved = self.viewport.scroll_by(pixels);
        self.playhead.resync(&self.viewport);
        Ok(settled || moved)
    }

    /// Scroll so `time` is at the left edge
    pub fn set_start_time(&mut self, time: f64) -> ViewerResult<bool> {
        self.require_zoomview("set_start_time")?;
        check_time("start_time", time)?;
        let settled = self.cancel_animation()?;
        let moved = self
            .viewport
            .set_frame_offset(self.viewport.timescale().time_to_pixels(time));
        self.playhead.resync(&self.viewport);
        Ok(settled || moved)
    }

    /// Move the playhead to `time`, scrolling the zoomview when required
    ///
    /// Returns whether the window moved. The overview never scrolls and a
    /// zoomview mid-animation only moves its playhead.
    pub fn seek_to(&mut self, time: f64, recenter: Recenter) -> bool {
        let moved = match self.kind {
            ViewKind::Zoomview if self.animation.is_none() => match recenter {
                Recenter::Always => self.viewport.centre_on(time),
                Recenter::NearEdge => self.scroll_if_near_edge(time),
            },
            _ => false,
        };
        self.playhead.sync(time, &self.viewport);
        moved
    }

    /// Move only the playhead
    pub fn sync_playhead(&mut self, time: f64) {
        self.playhead.sync(time, &self.viewport);
    }

    fn scroll_if_near_edge(&mut self, time: f64) -> bool {
        let pixel = self.time_to_pixels(time);
        let offset = self.viewport.frame_offset() as i64;
        let margin = self.auto_scroll_margin.round() as i64;
        let end_threshold = offset + self.viewport.width() as i64 - margin;
        if pixel >= end_threshold || pixel < offset {
            // Put the playhead one margin in from the left edge
            self.viewport.set_frame_offset(pixel - margin)
        } else {
            false
        }
    }

    /// Change the view width
    ///
    /// The overview refits the whole track; the zoomview keeps its scale and
    /// the time at the centre of the window.
    pub fn resize(&mut self, width: usize) -> ViewerResult<bool> {
        let width = width.max(1);
        if width == self.viewport.width() {
            return Ok(false);
        }
        match self.kind {
            ViewKind::Overview => {
                self.data = self.source.resample(Resample::Width(width as u32))?;
                self.viewport.set_width(width);
                self.viewport
                    .set_scale(self.data.timescale(), self.data.length());
            }
            ViewKind::Zoomview => {
                self.cancel_animation()?;
                let centre = self.viewport.centre_time();
                self.viewport.set_width(width);
                self.viewport.centre_on(centre);
            }
        }
        self.playhead.resync(&self.viewport);
        log::debug!("{} resized to {}px", self.kind.name(), width);
        Ok(true)
    }

    /// Re-run layer visibility against the current window
    pub fn refresh_layers(&mut self, points: &[Point], segments: &[Segment]) {
        let ctx = self.layer_context();
        self.points.refresh_for_window(points, &ctx);
        self.segments.refresh_for_window(segments, &ctx);
    }

    fn require_zoomview(&self, operation: &'static str) -> ViewerResult<()> {
        match self.kind {
            ViewKind::Zoomview => Ok(()),
            ViewKind::Overview => Err(ViewerError::Unsupported {
                operation,
                view: self.kind.name(),
            }),
        }
    }
}

/// Clamp `scale` to the finest resolution `source` holds
fn clamp_scale(source: &WaveformData, scale: u32) -> (u32, Option<ViewerError>) {
    if scale >= source.scale() {
        return (scale, None);
    }
    log::warn!(
        "Zoom scale {} is finer than the source resolution {}, clamping",
        scale,
        source.scale()
    );
    (
        source.scale(),
        Some(ViewerError::ResolutionUnavailable {
            requested: scale,
            minimum: source.scale(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{PointOptions, Points};

    /// 100 seconds of mono audio at 1000Hz, source scale 10 (100 columns/s)
    fn source() -> Arc<WaveformData> {
        let samples: Vec<f32> = (0..100_000).map(|i| (i as f32 * 0.01).sin()).collect();
        Arc::new(WaveformData::from_samples(&samples, 1, 1000, 10).unwrap())
    }

    fn config(animate: bool) -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.zoomview.animation.enabled = animate;
        config
    }

    fn zoomview(scale: u32, animate: bool) -> WaveformView {
        WaveformView::zoomview(source(), 200, scale, &config(animate))
            .unwrap()
            .0
    }

    fn assert_offset_invariant(view: &WaveformView) {
        let vp = view.viewport();
        assert!(vp.frame_offset() <= vp.length().saturating_sub(vp.width()));
    }

    #[test]
    fn test_overview_rejects_zoom_and_scroll() {
        let mut view = WaveformView::overview(source(), 500, &config(false)).unwrap();
        assert_eq!(
            view.set_zoom(ZoomTarget::Scale(20)).unwrap_err(),
            ViewerError::Unsupported {
                operation: "set_zoom",
                view: "overview"
            }
        );
        assert!(matches!(
            view.scroll_by(ScrollDelta::pixels(10.0)),
            Err(ViewerError::Unsupported { .. })
        ));
        // 10000 source columns fitted into 500px
        assert_eq!(view.scale(), 200);
        assert_eq!(view.viewport().length(), 500);
    }

    #[test]
    fn test_same_scale_is_noop() {
        let mut view = zoomview(20, true);
        let change = view.set_zoom(ZoomTarget::Scale(20)).unwrap();
        assert!(change.is_noop());
        assert!(!change.animated);
        assert!(!change.window_changed);
        assert!(!view.is_animating());
    }

    #[test]
    fn test_finer_than_source_clamps_with_warning() {
        let mut view = zoomview(20, false);
        let change = view.set_zoom(ZoomTarget::Scale(2)).unwrap();
        assert_eq!(change.current, 10);
        assert_eq!(
            change.warning,
            Some(ViewerError::ResolutionUnavailable {
                requested: 2,
                minimum: 10
            })
        );
        assert_eq!(view.scale(), 10);
    }

    #[test]
    fn test_zoom_by_seconds_and_fit() {
        let mut view = zoomview(20, false);
        // 10 seconds over 200px at 1000Hz = 50 samples per pixel
        assert_eq!(view.set_zoom(ZoomTarget::Seconds(10.0)).unwrap().current, 50);
        assert_eq!(view.set_zoom(ZoomTarget::Fit).unwrap().current, 500);
        assert_eq!(view.viewport().length(), 200);
        assert!(view.set_zoom(ZoomTarget::Seconds(-1.0)).is_err());
    }

    #[test]
    fn test_direct_zoom_centres_on_playhead() {
        let mut view = zoomview(20, false);
        view.set_start_time(40.0).unwrap();
        view.seek_to(41.0, Recenter::NearEdge);

        view.set_zoom(ZoomTarget::Scale(10)).unwrap();
        // 41s at 100 px/s = 4100, centred in 200px
        assert_eq!(view.frame_offset(), 4000);
        assert_offset_invariant(&view);
    }

    #[test]
    fn test_animation_ends_in_direct_zoom_state() {
        let mut direct = zoomview(40, false);
        let mut animated = zoomview(40, true);
        for view in [&mut direct, &mut animated] {
            view.set_start_time(30.0).unwrap();
            view.seek_to(31.5, Recenter::NearEdge);
        }

        direct.set_zoom(ZoomTarget::Scale(10)).unwrap();
        let change = animated.set_zoom(ZoomTarget::Scale(10)).unwrap();
        assert!(change.animated);
        assert!(!animated.points_layer().is_visible());
        assert_eq!(animated.animation().unwrap().frame_count(), 15);

        let mut frames = 0;
        loop {
            match animated.on_animation_frame().unwrap() {
                AnimationTick::Frame(_) => frames += 1,
                AnimationTick::Finished => break,
                AnimationTick::Idle => panic!("animation stalled"),
            }
        }
        assert_eq!(frames, 14);
        assert_eq!(animated.scale(), direct.scale());
        assert_eq!(animated.frame_offset(), direct.frame_offset());
        assert!(animated.points_layer().is_visible());
        assert_eq!(animated.on_animation_frame().unwrap(), AnimationTick::Idle);
    }

    #[test]
    fn test_zoom_out_uses_more_frames() {
        let mut view = zoomview(10, true);
        view.set_zoom(ZoomTarget::Scale(40)).unwrap();
        assert_eq!(view.animation().unwrap().frame_count(), 30);
        assert_eq!(view.target_scale(), 40);

        // Same target again while animating is a no-op
        assert!(view.set_zoom(ZoomTarget::Scale(40)).unwrap().is_noop());
    }

    #[test]
    fn test_scroll_requires_exactly_one_unit() {
        let mut view = zoomview(10, false);
        let both = ScrollDelta {
            pixels: Some(1.0),
            seconds: Some(1.0),
        };
        assert_eq!(view.scroll_by(both), Err(ViewerError::InvalidScroll));
        assert_eq!(
            view.scroll_by(ScrollDelta::default()),
            Err(ViewerError::InvalidScroll)
        );
        assert_eq!(view.frame_offset(), 0);

        assert!(view.scroll_by(ScrollDelta::seconds(2.0)).unwrap());
        assert_eq!(view.frame_offset(), 200);
        assert!(view.scroll_by(ScrollDelta::pixels(1e9)).unwrap());
        assert_eq!(view.frame_offset(), 9800);
        assert_offset_invariant(&view);
    }

    #[test]
    fn test_huge_scroll_saturates() {
        let mut view = zoomview(10, false);
        assert!(view.scroll_by(ScrollDelta::pixels(100.0)).unwrap());
        assert!(view.scroll_by(ScrollDelta::pixels(1e19)).unwrap());
        assert_eq!(view.frame_offset(), 9800);
        assert!(view.scroll_by(ScrollDelta::seconds(-1e300)).unwrap());
        assert_eq!(view.frame_offset(), 0);
        assert_offset_invariant(&view);
    }

    #[test]
    fn test_seek_near_edge_scrolls_by_margin() {
        let mut view = zoomview(10, false);
        // Window 0..2s; margin 100px means scrolling starts at 1.0s
        assert!(!view.seek_to(0.5, Recenter::NearEdge));
        assert!(view.seek_to(1.5, Recenter::NearEdge));
        assert_eq!(view.frame_offset(), 50);
        assert!((view.playhead().x() - 100.0).abs() < 1e-9);

        assert!(view.seek_to(50.0, Recenter::Always));
        assert_eq!(view.frame_offset(), 4900);
    }

    #[test]
    fn test_resize_keeps_centre_time() {
        let mut view = zoomview(10, false);
        view.set_start_time(20.0).unwrap();
        let centre = view.viewport().centre_time();
        assert!(view.resize(400).unwrap());
        assert!((view.viewport().centre_time() - centre).abs() < 0.011);
        assert_eq!(view.scale(), 10);
        assert!(!view.resize(400).unwrap());
    }

    #[test]
    fn test_overview_resize_refits() {
        let mut view = WaveformView::overview(source(), 500, &config(false)).unwrap();
        view.resize(1000).unwrap();
        assert_eq!(view.scale(), 100);
        assert_eq!(view.frame_offset(), 0);
    }

    #[test]
    fn test_refresh_layers_after_scroll() {
        let mut points = Points::default();
        points
            .add(vec![PointOptions::at(0.5), PointOptions::at(3.0)])
            .unwrap();
        let mut view = zoomview(10, false);

        view.refresh_layers(points.all(), &[]);
        assert!(view.points_layer().contains("point.0"));
        assert!(!view.points_layer().contains("point.1"));

        view.scroll_by(ScrollDelta::seconds(2.0)).unwrap();
        view.refresh_layers(points.all(), &[]);
        assert!(!view.points_layer().contains("point.0"));
        assert!(view.points_layer().contains("point.1"));
    }

    #[test]
    fn test_display_frame_follows_animation() {
        let mut view = zoomview(40, true);
        view.set_zoom(ZoomTarget::Scale(20)).unwrap();
        assert_eq!(view.display().timescale.scale, 40);
        view.on_animation_frame().unwrap();
        assert!(view.display().timescale.scale < 40);
        assert_eq!(view.display().first_column, 0);
    }
}
