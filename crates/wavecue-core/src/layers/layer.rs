//! Generic visibility-windowed annotation layer

use std::collections::{BTreeMap, HashSet};

use super::drag::{DragSession, DragTarget};
use super::marker::{Marker, MarkerHandle, MarkerKind};
use super::{LayerContext, LayerItem};
use crate::error::{ViewerError, ViewerResult};

/// Marker churn counters, for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerStats {
    pub created: u64,
    pub destroyed: u64,
    pub redraws: u64,
}

impl LayerStats {
    /// Shapes currently alive according to the counters
    pub fn live(&self) -> u64 {
        self.created - self.destroyed
    }
}

/// One view's shapes for one annotation kind
///
/// Shapes are keyed by annotation id. An entry exists only while its
/// annotation is inside the view's visible window.
#[derive(Debug)]
pub struct AnnotationLayer<A: LayerItem> {
    shapes: BTreeMap<String, A::Shape>,
    visible: bool,
    drag: Option<DragSession>,
    stats: LayerStats,
    marker_width: f64,
    hit_tolerance: f64,
}

impl<A: LayerItem> AnnotationLayer<A> {
    pub fn new(marker_width: f64, hit_tolerance: f64) -> Self {
        Self {
            shapes: BTreeMap::new(),
            visible: true,
            drag: None,
            stats: LayerStats::default(),
            marker_width,
            hit_tolerance,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn shapes(&self) -> impl Iterator<Item = (&str, &A::Shape)> {
        self.shapes.iter().map(|(id, shape)| (id.as_str(), shape))
    }

    pub fn shape(&self, id: &str) -> Option<&A::Shape> {
        self.shapes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.shapes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn stats(&self) -> LayerStats {
        self.stats
    }

    pub fn marker_width(&self) -> f64 {
        self.marker_width
    }

    // =========================================================================
    // Collection notifications
    // =========================================================================

    /// Create shapes for newly added annotations that are in view
    ///
    /// Redraws once for the whole batch.
    pub fn on_add(&mut self, items: &[A], ctx: &LayerContext) {
        let window = ctx.window();
        for item in items.iter().filter(|item| item.is_visible(window)) {
            self.insert(item, ctx);
        }
        self.redraw();
    }

    /// Remove the annotation's shape, then recreate it if still in view
    pub fn on_update(&mut self, item: &A, ctx: &LayerContext) {
        self.destroy(item.id());
        if item.is_visible(ctx.window()) {
            self.insert(item, ctx);
        }
        self.redraw();
    }

    pub fn on_remove(&mut self, ids: &[&str]) {
        for id in ids {
            self.destroy(id);
            if self.drag.as_ref().is_some_and(|d| d.handle.id == *id) {
                log::debug!("Drag on removed {} {} cancelled", A::KIND, id);
                self.drag = None;
            }
        }
        self.redraw();
    }

    /// Destroy every shape and forget all ids, including any drag in progress
    pub fn on_remove_all(&mut self) {
        let ids: Vec<String> = self.shapes.keys().cloned().collect();
        for id in &ids {
            self.destroy(id);
        }
        self.shapes.clear();
        self.drag = None;
        self.redraw();
    }

    /// Re-evaluate every annotation against the current window
    ///
    /// Creates shapes that came into view, destroys shapes that left it and
    /// repositions the rest. Calling it twice with the same context leaves the
    /// same shape set as calling it once.
    pub fn refresh_for_window(&mut self, items: &[A], ctx: &LayerContext) {
        let window = ctx.window();
        let before = self.shapes.len();

        let current: HashSet<&str> = items.iter().map(|item| item.id()).collect();
        let stale: Vec<String> = self
            .shapes
            .keys()
            .filter(|id| !current.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &stale {
            self.destroy(id);
        }

        for item in items {
            if item.is_visible(window) {
                if let Some(shape) = self.shapes.get_mut(item.id()) {
                    *shape = item.build_shape(ctx);
                } else {
                    self.insert(item, ctx);
                }
            } else {
                self.destroy(item.id());
            }
        }

        log::trace!(
            "{} layer refreshed for {:.3}..{:.3}s: {} -> {} shapes",
            A::KIND,
            window.start,
            window.end,
            before,
            self.shapes.len()
        );
        self.redraw();
    }

    /// Move one marker of an annotation, used while dragging
    ///
    /// An existing shape is updated in place; only an annotation entering or
    /// leaving the window creates or destroys a shape.
    pub fn relocate(&mut self, item: &A, kind: MarkerKind, ctx: &LayerContext) {
        if item.is_visible(ctx.window()) {
            if let Some(shape) = self.shapes.get_mut(item.id()) {
                item.move_marker(shape, kind, ctx);
            } else {
                self.insert(item, ctx);
            }
        } else {
            self.destroy(item.id());
        }
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.redraw();
        }
    }

    // =========================================================================
    // Hit testing and drag
    // =========================================================================

    /// Marker under view-relative `x`, first match in id order
    pub fn marker_at(&self, x: f64) -> Option<MarkerHandle> {
        self.find_marker(x, |_| true)
    }

    /// Editable marker under view-relative `x`, first match in id order
    ///
    /// Non-editable markers are skipped, so one lying on top of an editable
    /// marker does not hide it.
    pub fn draggable_at(&self, x: f64) -> Option<MarkerHandle> {
        self.find_marker(x, Marker::editable)
    }

    fn find_marker(&self, x: f64, accept: impl Fn(&Marker) -> bool) -> Option<MarkerHandle> {
        if !self.visible {
            return None;
        }
        let half_width = self.marker_width / 2.0 + self.hit_tolerance;
        self.shapes
            .iter()
            .filter_map(|(id, shape)| A::hit(shape, x, half_width).map(|kind| (id, shape, kind)))
            .find(|(_, shape, kind)| A::marker(shape, *kind).is_some_and(&accept))
            .map(|(id, _, kind)| MarkerHandle::new(id.clone(), kind))
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Start dragging one of `item`'s markers
    ///
    /// Fails with `NotEditable` for annotations that are not editable.
    pub fn begin_drag(
        &mut self,
        item: &A,
        kind: MarkerKind,
        pointer_x: f64,
        ctx: &LayerContext,
    ) -> ViewerResult<DragSession> {
        if !item.editable() {
            return Err(ViewerError::NotEditable(item.id().to_string()));
        }
        let initial_time = item
            .handle_time(kind)
            .ok_or_else(|| ViewerError::NotEditable(item.id().to_string()))?;

        let session = DragSession::new(
            MarkerHandle::new(item.id(), kind),
            pointer_x,
            ctx.x_of(initial_time),
            initial_time,
        );
        log::debug!("Drag started on {} {} ({:?})", A::KIND, item.id(), kind);
        self.drag = Some(session.clone());
        Ok(session)
    }

    /// Candidate time(s) for the dragged marker at pointer `pointer_x`
    pub fn drag_to(&self, item: &A, pointer_x: f64, ctx: &LayerContext) -> ViewerResult<DragTarget> {
        let session = self.drag.as_ref().ok_or(ViewerError::NoDragSession)?;
        if session.handle.id != item.id() {
            return Err(ViewerError::NoDragSession);
        }
        let x = session.target_x(pointer_x);
        item.drag_target(session.handle.kind, x, ctx, self.marker_width)
            .ok_or(ViewerError::NoDragSession)
    }

    pub fn end_drag(&mut self) -> ViewerResult<DragSession> {
        let session = self.drag.take().ok_or(ViewerError::NoDragSession)?;
        log::debug!("Drag ended on {} {}", A::KIND, session.handle.id);
        Ok(session)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn insert(&mut self, item: &A, ctx: &LayerContext) {
        let shape = item.build_shape(ctx);
        if let Some(old) = self.shapes.insert(item.id().to_string(), shape) {
            A::destroy_shape(old);
            self.stats.destroyed += 1;
        }
        self.stats.created += 1;
    }

    fn destroy(&mut self, id: &str) {
        if let Some(shape) = self.shapes.remove(id) {
            A::destroy_shape(shape);
            self.stats.destroyed += 1;
        }
    }

    fn redraw(&mut self) {
        self.stats.redraws += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{Point, PointOptions, Points, Segment, SegmentOptions, Segments};
    use crate::layers::{DragTarget, Marker};
    use crate::timescale::TimeScale;

    /// 100 pixels per second, 200px wide, window starting at `offset` px
    fn ctx(offset: f64) -> LayerContext {
        LayerContext {
            timescale: TimeScale::new(100, 1),
            frame_offset: offset,
            width: 200.0,
            duration: 10.0,
        }
    }

    fn points(times: &[f64]) -> Vec<Point> {
        let mut points = Points::default();
        points
            .add(times.iter().map(|t| PointOptions::at(*t).editable(true)).collect())
            .unwrap()
    }

    fn segments(ranges: &[(f64, f64)]) -> Vec<Segment> {
        let mut segments = Segments::default();
        segments
            .add(
                ranges
                    .iter()
                    .map(|(s, e)| SegmentOptions::range(*s, *e).editable(true))
                    .collect(),
            )
            .unwrap()
    }

    #[test]
    fn test_on_add_only_creates_visible_and_redraws_once() {
        let items = points(&[0.5, 1.5, 2.5, 5.0]);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));

        // Window is 0..2s
        assert_eq!(layer.len(), 2);
        assert!(layer.contains("point.0"));
        assert!(layer.contains("point.1"));
        assert_eq!(layer.stats().redraws, 1);
        assert_eq!(layer.stats().created, 2);
    }

    #[test]
    fn test_point_marker_position_is_view_relative() {
        let items = points(&[1.5]);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(100.0));
        let marker = layer.shape("point.0").unwrap();
        assert!((marker.position() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_refresh_for_window_churn_and_idempotence() {
        let items = points(&[0.5, 1.5, 2.5, 3.5]);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));

        layer.refresh_for_window(&items, &ctx(150.0));
        let once: Vec<String> = layer.shapes().map(|(id, _)| id.to_string()).collect();
        let stats_once = layer.stats();
        assert_eq!(once, vec!["point.1", "point.2"]);

        layer.refresh_for_window(&items, &ctx(150.0));
        let twice: Vec<String> = layer.shapes().map(|(id, _)| id.to_string()).collect();
        assert_eq!(once, twice);
        assert_eq!(layer.stats().live(), stats_once.live());
        assert_eq!(layer.stats().live(), layer.len() as u64);
    }

    #[test]
    fn test_refresh_drops_ids_no_longer_in_collection() {
        let items = points(&[0.5, 1.0]);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));
        layer.refresh_for_window(&items[..1], &ctx(0.0));
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_refresh_large_collection() {
        let times: Vec<f64> = (0..5000).map(|i| i as f64 / 500.0).collect();
        let items = points(&times);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));
        assert_eq!(layer.len(), 1000);

        // Drop every other point from the collection
        let kept: Vec<Point> = items.iter().step_by(2).cloned().collect();
        layer.refresh_for_window(&kept, &ctx(0.0));
        assert_eq!(layer.len(), 500);
        assert!(layer.contains("point.0"));
        assert!(!layer.contains("point.1"));
        assert_eq!(layer.stats().live(), 500);
    }

    #[test]
    fn test_segment_visibility_boundaries() {
        // Window 2..4s
        let items = segments(&[(1.0, 2.0), (2.0, 3.0), (3.5, 6.0)]);
        let mut layer: AnnotationLayer<Segment> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(200.0));

        assert!(!layer.contains("segment.0"));
        assert!(layer.contains("segment.1"));
        assert!(layer.contains("segment.2"));

        // Partially visible segment body is clipped to the view
        let shape = layer.shape("segment.2").unwrap();
        assert!((shape.body.x_start - 150.0).abs() < 1e-9);
        assert_eq!(shape.body.x_end, 200.0);
        assert!(shape.end.position() > 200.0);
    }

    #[test]
    fn test_on_update_moves_out_of_view() {
        let mut items = points(&[0.5]);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));

        items[0].time = 5.0;
        layer.on_update(&items[0], &ctx(0.0));
        assert!(layer.is_empty());

        items[0].time = 1.0;
        layer.on_update(&items[0], &ctx(0.0));
        assert!(matches!(layer.shape("point.0"), Some(Marker::Point { time, .. }) if *time == 1.0));
    }

    #[test]
    fn test_remove_all_clears_map_and_drag() {
        let items = points(&[0.5, 1.0]);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));
        layer
            .begin_drag(&items[0], MarkerKind::Point, 50.0, &ctx(0.0))
            .unwrap();

        layer.on_remove_all();
        assert!(layer.is_empty());
        assert!(layer.drag_session().is_none());
        assert_eq!(layer.stats().live(), 0);
    }

    #[test]
    fn test_marker_at_respects_visibility() {
        let items = points(&[1.0]);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));

        assert_eq!(
            layer.marker_at(106.0),
            Some(MarkerHandle::new("point.0", MarkerKind::Point))
        );
        assert_eq!(layer.marker_at(120.0), None);

        layer.set_visible(false);
        assert_eq!(layer.marker_at(100.0), None);
    }

    #[test]
    fn test_draggable_at_skips_fixed_markers() {
        let mut collection = Points::default();
        let items = collection
            .add(vec![PointOptions::at(1.0), PointOptions::at(1.03).editable(true)])
            .unwrap();
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));

        assert_eq!(
            layer.marker_at(101.0),
            Some(MarkerHandle::new("point.0", MarkerKind::Point))
        );
        assert_eq!(
            layer.draggable_at(101.0),
            Some(MarkerHandle::new("point.1", MarkerKind::Point))
        );
        assert_eq!(layer.draggable_at(93.0), None);
    }

    #[test]
    fn test_relocate_updates_shape_in_place() {
        let mut items = segments(&[(0.5, 1.0)]);
        let mut layer: AnnotationLayer<Segment> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));
        let before = layer.stats();

        items[0].end_time = 1.5;
        layer.relocate(&items[0], MarkerKind::SegmentEnd, &ctx(0.0));
        let shape = layer.shape("segment.0").unwrap();
        assert!((shape.end.position() - 150.0).abs() < 1e-9);
        assert_eq!(shape.end.time(), 1.5);
        assert!((shape.start.position() - 50.0).abs() < 1e-9);
        assert!((shape.body.x_end - 150.0).abs() < 1e-9);
        assert_eq!(layer.stats().created, before.created);
        assert_eq!(layer.stats().destroyed, before.destroyed);

        // Leaving the window still destroys the shape
        items[0].start_time = 3.0;
        items[0].end_time = 3.5;
        layer.relocate(&items[0], MarkerKind::SegmentStart, &ctx(0.0));
        assert!(layer.is_empty());
        assert_eq!(layer.stats().destroyed, before.destroyed + 1);
    }

    #[test]
    fn test_relocate_point_keeps_label() {
        let mut collection = Points::default();
        let mut items = collection
            .add(vec![PointOptions::at(1.0).label("drop").editable(true)])
            .unwrap();
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));

        items[0].time = 1.25;
        layer.relocate(&items[0], MarkerKind::Point, &ctx(0.0));
        let marker = layer.shape("point.0").unwrap();
        assert!((marker.position() - 125.0).abs() < 1e-9);
        assert!(matches!(marker, Marker::Point { label, .. } if label == "drop"));
        assert_eq!(layer.stats().created, 1);
    }

    #[test]
    fn test_begin_drag_rejects_non_editable() {
        let mut collection = Points::default();
        let items = collection.add(vec![PointOptions::at(1.0)]).unwrap();
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        let err = layer
            .begin_drag(&items[0], MarkerKind::Point, 100.0, &ctx(0.0))
            .unwrap_err();
        assert_eq!(err, ViewerError::NotEditable("point.0".to_string()));
        assert!(layer.drag_session().is_none());
    }

    #[test]
    fn test_segment_start_drag_clamps_against_end() {
        let items = segments(&[(0.5, 1.0)]);
        let mut layer: AnnotationLayer<Segment> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));
        layer
            .begin_drag(&items[0], MarkerKind::SegmentStart, 50.0, &ctx(0.0))
            .unwrap();

        // Try to push start past end: stops one marker width short
        let target = layer.drag_to(&items[0], 180.0, &ctx(0.0)).unwrap();
        match target {
            DragTarget::Segment {
                start_time, end_time, ..
            } => {
                assert!((start_time - 0.9).abs() < 1e-9);
                assert_eq!(end_time, 1.0);
            }
            other => panic!("unexpected target {:?}", other),
        }

        // Dragging before the track start clamps to zero
        let target = layer.drag_to(&items[0], -500.0, &ctx(0.0)).unwrap();
        assert!(matches!(target, DragTarget::Segment { start_time, .. } if start_time == 0.0));
    }

    #[test]
    fn test_segment_end_drag_clamps_against_start() {
        let items = segments(&[(0.5, 1.0)]);
        let mut layer: AnnotationLayer<Segment> = AnnotationLayer::new(10.0, 3.0);
        layer.on_add(&items, &ctx(0.0));
        layer
            .begin_drag(&items[0], MarkerKind::SegmentEnd, 100.0, &ctx(0.0))
            .unwrap();

        let target = layer.drag_to(&items[0], 0.0, &ctx(0.0)).unwrap();
        assert!(matches!(target, DragTarget::Segment { end_time, .. } if (end_time - 0.6).abs() < 1e-9));

        // Past the end of the track clamps to the duration
        let target = layer.drag_to(&items[0], 5000.0, &ctx(0.0)).unwrap();
        assert!(matches!(target, DragTarget::Segment { end_time, .. } if end_time == 10.0));
    }

    #[test]
    fn test_drag_without_session() {
        let items = points(&[1.0]);
        let mut layer: AnnotationLayer<Point> = AnnotationLayer::new(10.0, 3.0);
        assert_eq!(
            layer.drag_to(&items[0], 10.0, &ctx(0.0)).unwrap_err(),
            ViewerError::NoDragSession
        );
        assert_eq!(layer.end_drag().unwrap_err(), ViewerError::NoDragSession);
    }
}
