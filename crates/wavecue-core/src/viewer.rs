//! Viewer facade
//!
//! `Viewer` is the host-facing entry point. It owns the annotation
//! collections, both views and the cue emitter, and routes every mutation
//! through them in order:
//!
//! 1. Validate and apply to the collection (atomic)
//! 2. Update the layers of both views
//! 3. Rebuild the cue index
//! 4. Queue the notification
//!
//! All of it completes before the call returns, so state read right after a
//! mutation is consistent. Queued notifications are collected with
//! `drain_events`.

use std::sync::Arc;

use crate::annotations::{
    Point, PointOptions, PointUpdate, Points, Segment, SegmentOptions, SegmentUpdate, Segments,
};
use crate::config::ViewerConfig;
use crate::cues::{CueEmitter, CueEvent, PageVisibility};
use crate::error::{check_time, ViewerError, ViewerResult};
use crate::events::ViewerEvent;
use crate::layers::{DragTarget, MarkerHandle, MarkerKind};
use crate::player::MediaPlayer;
use crate::view::{
    AnimationTick, Recenter, ScrollDelta, ViewKind, WaveformView, ZoomChange, ZoomLevels,
    ZoomTarget,
};
use crate::waveform::WaveformData;

/// Initial pixel widths of the two views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWidths {
    pub overview: usize,
    pub zoomview: usize,
}

impl Default for ViewWidths {
    fn default() -> Self {
        Self {
            overview: 1000,
            zoomview: 1000,
        }
    }
}

pub struct Viewer {
    config: ViewerConfig,
    player: Box<dyn MediaPlayer>,
    points: Points,
    segments: Segments,
    overview: WaveformView,
    zoomview: WaveformView,
    zoom_levels: ZoomLevels,
    emitter: CueEmitter,
    events: Vec<ViewerEvent>,
    drag_view: Option<ViewKind>,
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("points", &self.points.len())
            .field("segments", &self.segments.len())
            .field("zoom_scale", &self.zoomview.scale())
            .field("emitter", &self.emitter.state())
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl Viewer {
    /// Build both views over `source` and attach the cue emitter
    pub fn new(
        source: Arc<WaveformData>,
        player: Box<dyn MediaPlayer>,
        mut config: ViewerConfig,
        widths: ViewWidths,
    ) -> ViewerResult<Self> {
        config.validate();

        let zoom_levels = ZoomLevels::new(
            config.zoomview.zoom_levels.clone(),
            config.zoomview.initial_zoom_index,
        );
        let overview = WaveformView::overview(source.clone(), widths.overview, &config)?;
        let (zoomview, warning) =
            WaveformView::zoomview(source.clone(), widths.zoomview, zoom_levels.current(), &config)?;
        if let Some(warning) = warning {
            log::warn!("Initial zoom level unavailable: {}", warning);
        }

        let mut viewer = Self {
            points: Points::new(config.markers.point_color),
            segments: Segments::new(config.markers.segment_color),
            overview,
            zoomview,
            zoom_levels,
            emitter: CueEmitter::new(),
            events: Vec::new(),
            drag_view: None,
            player,
            config,
        };

        if viewer.config.cues.emit_cues {
            viewer.emitter.attach(&[], &[]);
        }
        let time = viewer.player.current_time();
        viewer.overview.sync_playhead(time);
        viewer.zoomview.sync_playhead(time);

        log::info!(
            "Viewer ready: {:.1}s track, overview scale {}, zoomview scale {}",
            source.duration(),
            viewer.overview.scale(),
            viewer.zoomview.scale()
        );
        Ok(viewer)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn player(&self) -> &dyn MediaPlayer {
        self.player.as_ref()
    }

    pub fn cue_emitter(&self) -> &CueEmitter {
        &self.emitter
    }

    /// Take all queued notifications, oldest first
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // Views
    // =========================================================================

    pub fn view(&self, kind: ViewKind) -> &WaveformView {
        match kind {
            ViewKind::Overview => &self.overview,
            ViewKind::Zoomview => &self.zoomview,
        }
    }

    pub fn view_by_name(&self, name: &str) -> ViewerResult<&WaveformView> {
        ViewKind::from_name(name)
            .map(|kind| self.view(kind))
            .ok_or_else(|| ViewerError::ViewNotFound(name.to_string()))
    }

    fn view_mut(&mut self, kind: ViewKind) -> &mut WaveformView {
        match kind {
            ViewKind::Overview => &mut self.overview,
            ViewKind::Zoomview => &mut self.zoomview,
        }
    }

    pub fn zoom_levels(&self) -> &ZoomLevels {
        &self.zoom_levels
    }

    /// Zoom the zoomview
    ///
    /// A clamped resolution is reported in `ZoomChange::warning`, not as an
    /// error. An unchanged scale queues nothing. The configured zoom level
    /// index follows the resulting scale.
    pub fn set_zoom(&mut self, target: ZoomTarget) -> ViewerResult<ZoomChange> {
        let change = self.zoomview.set_zoom(target)?;
        self.zoom_levels.sync_to(change.current);
        if change.is_noop() {
            return Ok(change);
        }
        self.events.push(ViewerEvent::ZoomUpdate {
            previous: change.previous,
            current: change.current,
        });
        if change.window_changed {
            self.after_window_change(ViewKind::Zoomview);
        }
        Ok(change)
    }

    /// Step to the configured zoom level just finer than the current scale
    pub fn zoom_in(&mut self) -> ViewerResult<Option<ZoomChange>> {
        match self.zoom_levels.finer_than(self.zoomview.target_scale()) {
            Some(scale) => self.set_zoom(ZoomTarget::Scale(scale)).map(Some),
            None => Ok(None),
        }
    }

    /// Step to the configured zoom level just coarser than the current scale
    pub fn zoom_out(&mut self) -> ViewerResult<Option<ZoomChange>> {
        match self.zoom_levels.coarser_than(self.zoomview.target_scale()) {
            Some(scale) => self.set_zoom(ZoomTarget::Scale(scale)).map(Some),
            None => Ok(None),
        }
    }

    pub fn set_zoom_level(&mut self, index: usize) -> ViewerResult<ZoomChange> {
        let scale = self.zoom_levels.level(index)?;
        self.set_zoom(ZoomTarget::Scale(scale))
    }

    pub fn scroll_waveform(&mut self, delta: ScrollDelta) -> ViewerResult<()> {
        if self.zoomview.scroll_by(delta)? {
            self.after_window_change(ViewKind::Zoomview);
        }
        Ok(())
    }

    /// Scroll the zoomview so `time` is at its left edge
    pub fn set_start_time(&mut self, time: f64) -> ViewerResult<()> {
        if self.zoomview.set_start_time(time)? {
            self.after_window_change(ViewKind::Zoomview);
        }
        Ok(())
    }

    pub fn resize_view(&mut self, kind: ViewKind, width: usize) -> ViewerResult<()> {
        if self.view_mut(kind).resize(width)? {
            self.after_window_change(kind);
        }
        Ok(())
    }

    pub fn set_playhead_visible(&mut self, kind: ViewKind, visible: bool) {
        self.view_mut(kind).set_playhead_visible(visible);
    }

    /// Whether the host should deliver the next display refresh
    pub fn wants_frame(&self) -> bool {
        self.zoomview.is_animating() || self.emitter.wants_frame()
    }

    fn after_window_change(&mut self, kind: ViewKind) {
        let view = match kind {
            ViewKind::Overview => &mut self.overview,
            ViewKind::Zoomview => &mut self.zoomview,
        };
        view.refresh_layers(self.points.all(), self.segments.all());
        let window = view.visible_window();
        self.events
            .push(ViewerEvent::VisibleRangeChanged { view: kind, window });
    }

    // =========================================================================
    // Points
    // =========================================================================

    pub fn points(&self) -> &[Point] {
        self.points.all()
    }

    pub fn point(&self, id: &str) -> Option<&Point> {
        self.points.get(id)
    }

    pub fn add_point(&mut self, options: PointOptions) -> ViewerResult<Point> {
        let mut added = self.add_points(vec![options])?;
        added
            .pop()
            .ok_or_else(|| ViewerError::PointNotFound(String::new()))
    }

    /// Add a batch of points; nothing is added if any entry is invalid
    pub fn add_points(&mut self, options: Vec<PointOptions>) -> ViewerResult<Vec<Point>> {
        let added = self.points.add(options)?;
        for view in [&mut self.overview, &mut self.zoomview] {
            let ctx = view.layer_context();
            view.points_layer_mut().on_add(&added, &ctx);
        }
        self.rebuild_cues();
        self.events.push(ViewerEvent::PointsAdd(added.clone()));
        Ok(added)
    }

    pub fn update_point(&mut self, id: &str, update: &PointUpdate) -> ViewerResult<Point> {
        let point = self.points.update(id, update)?;
        for view in [&mut self.overview, &mut self.zoomview] {
            let ctx = view.layer_context();
            view.points_layer_mut().on_update(&point, &ctx);
        }
        self.rebuild_cues();
        self.events.push(ViewerEvent::PointsUpdate(point.clone()));
        Ok(point)
    }

    pub fn remove_points_by_id(&mut self, ids: &[&str]) -> ViewerResult<Vec<Point>> {
        let removed = self.points.remove_by_id(ids)?;
        self.after_points_removed(removed.clone());
        Ok(removed)
    }

    /// Remove every point at exactly `time`
    pub fn remove_points_by_time(&mut self, time: f64) -> ViewerResult<Vec<Point>> {
        check_time("time", time)?;
        let removed = self.points.remove_by_time(time);
        self.after_points_removed(removed.clone());
        Ok(removed)
    }

    pub fn remove_all_points(&mut self) {
        self.points.remove_all();
        for view in [&mut self.overview, &mut self.zoomview] {
            view.points_layer_mut().on_remove_all();
        }
        self.sync_drag_view();
        self.rebuild_cues();
        self.events.push(ViewerEvent::PointsRemoveAll);
    }

    fn after_points_removed(&mut self, removed: Vec<Point>) {
        if removed.is_empty() {
            return;
        }
        let ids: Vec<&str> = removed.iter().map(|p| p.id()).collect();
        for view in [&mut self.overview, &mut self.zoomview] {
            view.points_layer_mut().on_remove(&ids);
        }
        self.sync_drag_view();
        self.rebuild_cues();
        self.events.push(ViewerEvent::PointsRemove(removed));
    }

    // =========================================================================
    // Segments
    // =========================================================================

    pub fn segments(&self) -> &[Segment] {
        self.segments.all()
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.get(id)
    }

    pub fn add_segment(&mut self, options: SegmentOptions) -> ViewerResult<Segment> {
        let mut added = self.add_segments(vec![options])?;
        added
            .pop()
            .ok_or_else(|| ViewerError::SegmentNotFound(String::new()))
    }

    /// Add a batch of segments; nothing is added if any entry is invalid
    pub fn add_segments(&mut self, options: Vec<SegmentOptions>) -> ViewerResult<Vec<Segment>> {
        let added = self.segments.add(options)?;
        for view in [&mut self.overview, &mut self.zoomview] {
            let ctx = view.layer_context();
            view.segments_layer_mut().on_add(&added, &ctx);
        }
        self.rebuild_cues();
        self.events.push(ViewerEvent::SegmentsAdd(added.clone()));
        Ok(added)
    }

    /// Update a segment; rejected atomically if it would invert the range
    pub fn update_segment(&mut self, id: &str, update: &SegmentUpdate) -> ViewerResult<Segment> {
        let segment = self.segments.update(id, update)?;
        for view in [&mut self.overview, &mut self.zoomview] {
            let ctx = view.layer_context();
            view.segments_layer_mut().on_update(&segment, &ctx);
        }
        self.rebuild_cues();
        self.events.push(ViewerEvent::SegmentsUpdate(segment.clone()));
        Ok(segment)
    }

    pub fn remove_segments_by_id(&mut self, ids: &[&str]) -> ViewerResult<Vec<Segment>> {
        let removed = self.segments.remove_by_id(ids)?;
        self.after_segments_removed(removed.clone());
        Ok(removed)
    }

    /// Remove segments starting at `start_time` (and ending at `end_time`)
    pub fn remove_segments_by_time(
        &mut self,
        start_time: f64,
        end_time: Option<f64>,
    ) -> ViewerResult<Vec<Segment>> {
        check_time("start_time", start_time)?;
        if let Some(end) = end_time {
            check_time("end_time", end)?;
        }
        let removed = self.segments.remove_by_time(start_time, end_time);
        self.after_segments_removed(removed.clone());
        Ok(removed)
    }

    pub fn remove_all_segments(&mut self) {
        self.segments.remove_all();
        for view in [&mut self.overview, &mut self.zoomview] {
            view.segments_layer_mut().on_remove_all();
        }
        self.sync_drag_view();
        self.rebuild_cues();
        self.events.push(ViewerEvent::SegmentsRemoveAll);
    }

    fn after_segments_removed(&mut self, removed: Vec<Segment>) {
        if removed.is_empty() {
            return;
        }
        let ids: Vec<&str> = removed.iter().map(|s| s.id()).collect();
        for view in [&mut self.overview, &mut self.zoomview] {
            view.segments_layer_mut().on_remove(&ids);
        }
        self.sync_drag_view();
        self.rebuild_cues();
        self.events.push(ViewerEvent::SegmentsRemove(removed));
    }

    fn rebuild_cues(&mut self) {
        self.emitter.rebuild(self.points.all(), self.segments.all());
    }

    // =========================================================================
    // Drag
    // =========================================================================

    /// Start dragging whichever editable marker lies under `x` in view `kind`
    ///
    /// Returns `None` when no editable marker is hit. Point markers win over
    /// segment handles at the same position.
    pub fn begin_drag(&mut self, kind: ViewKind, x: f64) -> ViewerResult<Option<MarkerHandle>> {
        let view = self.view(kind);
        let handle = view
            .points_layer()
            .draggable_at(x)
            .or_else(|| view.segments_layer().draggable_at(x));
        let Some(handle) = handle else {
            return Ok(None);
        };
        self.start_drag(kind, &handle, x)?;
        Ok(Some(handle))
    }

    /// Start dragging a specific marker
    ///
    /// Fails with `NotEditable` for annotations that are not editable. Any
    /// drag already in progress is ended first.
    pub fn start_drag(&mut self, kind: ViewKind, handle: &MarkerHandle, x: f64) -> ViewerResult<()> {
        if self.drag_view.is_some() {
            self.end_drag()?;
        }
        let view = match kind {
            ViewKind::Overview => &mut self.overview,
            ViewKind::Zoomview => &mut self.zoomview,
        };
        let ctx = view.layer_context();
        match handle.kind {
            MarkerKind::Point => {
                let point = self
                    .points
                    .get(&handle.id)
                    .ok_or_else(|| ViewerError::PointNotFound(handle.id.clone()))?;
                view.points_layer_mut()
                    .begin_drag(point, MarkerKind::Point, x, &ctx)?;
                self.events.push(ViewerEvent::PointDragStart {
                    point: point.clone(),
                    view: kind,
                });
            }
            marker => {
                let segment = self
                    .segments
                    .get(&handle.id)
                    .ok_or_else(|| ViewerError::SegmentNotFound(handle.id.clone()))?;
                view.segments_layer_mut().begin_drag(segment, marker, x, &ctx)?;
                self.events.push(ViewerEvent::SegmentDragStart {
                    segment: segment.clone(),
                    view: kind,
                    marker,
                });
            }
        }
        self.drag_view = Some(kind);
        Ok(())
    }

    /// Move the dragged marker to pointer `x`
    ///
    /// Writes the clamped time straight into the collection and redraws only
    /// the moved annotation, in every view. No update notification fires.
    pub fn drag_to(&mut self, x: f64) -> ViewerResult<()> {
        let kind = self.drag_view.ok_or(ViewerError::NoDragSession)?;
        let view = self.view(kind);
        let ctx = view.layer_context();

        let (target, marker) = if let Some(session) = view.points_layer().drag_session() {
            let point = self
                .points
                .get(&session.handle.id)
                .ok_or_else(|| ViewerError::PointNotFound(session.handle.id.clone()))?;
            (view.points_layer().drag_to(point, x, &ctx)?, session.handle.kind)
        } else if let Some(session) = view.segments_layer().drag_session() {
            let segment = self
                .segments
                .get(&session.handle.id)
                .ok_or_else(|| ViewerError::SegmentNotFound(session.handle.id.clone()))?;
            (view.segments_layer().drag_to(segment, x, &ctx)?, session.handle.kind)
        } else {
            return Err(ViewerError::NoDragSession);
        };

        match target {
            DragTarget::Point { id, time } => {
                let Some(point) = self.points.set_time(&id, time) else {
                    log::warn!("Drag target point {} vanished", id);
                    return Ok(());
                };
                for view in [&mut self.overview, &mut self.zoomview] {
                    let ctx = view.layer_context();
                    view.points_layer_mut().relocate(&point, marker, &ctx);
                }
                self.events
                    .push(ViewerEvent::PointDragMove { point, view: kind });
            }
            DragTarget::Segment {
                id,
                start_time,
                end_time,
            } => {
                let Some(segment) = self.segments.set_times(&id, start_time, end_time) else {
                    log::warn!(
                        "Rejected drag of segment {} to {:.3}..{:.3}",
                        id,
                        start_time,
                        end_time
                    );
                    return Ok(());
                };
                for view in [&mut self.overview, &mut self.zoomview] {
                    let ctx = view.layer_context();
                    view.segments_layer_mut().relocate(&segment, marker, &ctx);
                }
                self.events.push(ViewerEvent::SegmentDragMove {
                    segment,
                    view: kind,
                    marker,
                });
            }
        }
        Ok(())
    }

    /// Forget the drag view once its layer has dropped the session
    fn sync_drag_view(&mut self) {
        let Some(kind) = self.drag_view else {
            return;
        };
        let view = self.view(kind);
        if view.points_layer().drag_session().is_none()
            && view.segments_layer().drag_session().is_none()
        {
            log::debug!("Drag in {} cancelled by removal", kind.name());
            self.drag_view = None;
        }
    }

    /// Finish the drag; the moved time is already applied
    pub fn end_drag(&mut self) -> ViewerResult<()> {
        let kind = self.drag_view.take().ok_or(ViewerError::NoDragSession)?;
        let view = match kind {
            ViewKind::Overview => &mut self.overview,
            ViewKind::Zoomview => &mut self.zoomview,
        };

        if view.points_layer().drag_session().is_some() {
            let session = view.points_layer_mut().end_drag()?;
            if let Some(point) = self.points.get(&session.handle.id) {
                self.events.push(ViewerEvent::PointDragEnd {
                    point: point.clone(),
                    view: kind,
                    initial_time: session.initial_time,
                });
            }
        } else if view.segments_layer().drag_session().is_some() {
            let session = view.segments_layer_mut().end_drag()?;
            if let Some(segment) = self.segments.get(&session.handle.id) {
                self.events.push(ViewerEvent::SegmentDragEnd {
                    segment: segment.clone(),
                    view: kind,
                    marker: session.handle.kind,
                    initial_time: session.initial_time,
                });
            }
        } else {
            return Err(ViewerError::NoDragSession);
        }

        self.rebuild_cues();
        Ok(())
    }

    // =========================================================================
    // Player notifications
    // =========================================================================

    /// Ask the player to seek, clamped to the media duration
    pub fn seek(&mut self, time: f64) -> ViewerResult<()> {
        check_time("time", time)?;
        let time = time.min(self.player.duration().max(0.0));
        self.player.seek(time);
        Ok(())
    }

    pub fn on_playing(&mut self) {
        let time = self.player.current_time();
        self.emitter.on_playing(time);
        self.update_playhead(time);
    }

    pub fn on_pause(&mut self) {
        self.emitter.on_pause();
        self.update_playhead(self.player.current_time());
    }

    pub fn on_ended(&mut self) {
        self.emitter.on_ended();
        self.update_playhead(self.player.current_time());
    }

    /// Media time-update notification
    ///
    /// Ignored by the cue scan while the player is seeking.
    pub fn on_time_update(&mut self, time: f64) {
        self.update_playhead(time);
        if self.player.is_seeking() {
            self.emitter.on_seeking(time);
            return;
        }
        let events = self.emitter.on_time_update(time);
        self.push_cue_events(events);
    }

    /// A seek completed at `time`
    ///
    /// Segment enter/exit events come from diffing the active set, never from
    /// scanning the cues that were jumped over.
    pub fn on_seeked(&mut self, time: f64) {
        self.overview.sync_playhead(time);
        if self.zoomview.seek_to(time, Recenter::NearEdge) {
            self.after_window_change(ViewKind::Zoomview);
        }
        let events = self.emitter.on_seeked(time, self.segments.all());
        self.push_cue_events(events);
    }

    /// Display refresh tick
    ///
    /// Advances the zoom animation and, when the emitter is driven by display
    /// refreshes, runs the cue scan against the player's current time.
    pub fn on_animation_frame(&mut self) -> ViewerResult<()> {
        let time = self.player.current_time();

        if self.zoomview.on_animation_frame()? == AnimationTick::Finished {
            self.after_window_change(ViewKind::Zoomview);
            // Playback may have moved on while the animation ran
            self.update_playhead(time);
        }

        if self.emitter.wants_frame() {
            if self.player.is_playing() {
                self.update_playhead(time);
            }
            if self.player.is_seeking() {
                self.emitter.on_seeking(time);
            } else {
                let events = self.emitter.on_frame(time);
                self.push_cue_events(events);
            }
        }
        Ok(())
    }

    pub fn set_page_visibility(&mut self, visibility: PageVisibility) {
        self.emitter.set_page_visibility(visibility);
    }

    pub fn set_automation(&mut self, automated: bool) {
        self.emitter.set_automation(automated);
    }

    /// Move both playheads, auto-scrolling the zoomview during playback
    fn update_playhead(&mut self, time: f64) {
        self.overview.sync_playhead(time);
        let follow = self.config.zoomview.auto_scroll
            && self.player.is_playing()
            && !self.player.is_seeking();
        if follow {
            if self.zoomview.seek_to(time, Recenter::NearEdge) {
                self.after_window_change(ViewKind::Zoomview);
            }
        } else {
            self.zoomview.sync_playhead(time);
        }
    }

    fn push_cue_events(&mut self, events: Vec<CueEvent>) {
        for event in events {
            let queued = match event {
                CueEvent::PointEnter { id, time } => self
                    .points
                    .get(&id)
                    .map(|point| ViewerEvent::PointEnter {
                        point: point.clone(),
                        time,
                    }),
                CueEvent::SegmentEnter { id, time } => self
                    .segments
                    .get(&id)
                    .map(|segment| ViewerEvent::SegmentEnter {
                        segment: segment.clone(),
                        time,
                    }),
                CueEvent::SegmentExit { id, time } => self
                    .segments
                    .get(&id)
                    .map(|segment| ViewerEvent::SegmentExit {
                        segment: segment.clone(),
                        time,
                    }),
            };
            match queued {
                Some(event) => self.events.push(event),
                None => log::debug!("Dropped cue event for a removed annotation"),
            }
        }
    }
}
