//! Annotation layers: per-view marker lifecycle for points and segments
//!
//! Each view owns one `PointsLayer` and one `SegmentsLayer`. A layer keeps
//! exactly one shape per visible annotation and none for invisible ones.
//! Layers never own annotations; they are handed the current collection
//! contents whenever something changes.
//!
//! The points and segments layers share all of their bookkeeping through the
//! generic `AnnotationLayer`; only shape construction, hit testing and drag
//! clamping differ, via the `LayerItem` trait.

mod drag;
mod layer;
mod marker;

pub use drag::{DragSession, DragTarget};
pub use layer::{AnnotationLayer, LayerStats};
pub use marker::{Marker, MarkerHandle, MarkerKind, MarkerUpdate, SegmentBody, SegmentShape};

use crate::annotations::{Annotation, Point, Segment};
use crate::timescale::TimeScale;
use crate::types::TimeWindow;

pub type PointsLayer = AnnotationLayer<Point>;
pub type SegmentsLayer = AnnotationLayer<Segment>;

/// View geometry needed to place markers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerContext {
    pub timescale: TimeScale,
    /// Left edge of the visible window, in full-track pixels
    pub frame_offset: f64,
    /// Visible width in pixels
    pub width: f64,
    /// Track duration in seconds
    pub duration: f64,
}

impl LayerContext {
    /// View-relative x for `time`
    pub fn x_of(&self, time: f64) -> f64 {
        self.timescale.time_to_pixels_exact(time) - self.frame_offset
    }

    /// Time under view-relative `x`
    pub fn time_at(&self, x: f64) -> f64 {
        self.timescale.pixels_to_time(x + self.frame_offset)
    }

    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.time_at(0.0), self.time_at(self.width))
    }
}

/// An annotation a layer can draw
pub trait LayerItem: Annotation {
    type Shape: Clone + std::fmt::Debug;

    fn build_shape(&self, ctx: &LayerContext) -> Self::Shape;

    fn destroy_shape(shape: Self::Shape);

    /// Marker of `shape` under `x`, if any
    fn hit(shape: &Self::Shape, x: f64, half_width: f64) -> Option<MarkerKind>;

    fn marker(shape: &Self::Shape, kind: MarkerKind) -> Option<&Marker>;

    /// Move only marker `kind` of `shape` to this annotation's current time
    fn move_marker(&self, shape: &mut Self::Shape, kind: MarkerKind, ctx: &LayerContext);

    /// Time of the annotation boundary behind marker `kind`
    fn handle_time(&self, kind: MarkerKind) -> Option<f64>;

    /// Clamp a dragged marker to `x` and convert to new annotation time(s)
    fn drag_target(
        &self,
        kind: MarkerKind,
        x: f64,
        ctx: &LayerContext,
        marker_width: f64,
    ) -> Option<DragTarget>;
}

impl LayerItem for Point {
    type Shape = Marker;

    fn build_shape(&self, ctx: &LayerContext) -> Marker {
        Marker::Point {
            x: ctx.x_of(self.time),
            time: self.time,
            label: self.label_text.clone(),
            color: self.color,
            editable: self.editable,
        }
    }

    fn destroy_shape(shape: Marker) {
        shape.destroy();
    }

    fn hit(shape: &Marker, x: f64, half_width: f64) -> Option<MarkerKind> {
        shape.hit(x, half_width).then_some(MarkerKind::Point)
    }

    fn marker(shape: &Marker, kind: MarkerKind) -> Option<&Marker> {
        (kind == MarkerKind::Point).then_some(shape)
    }

    fn move_marker(&self, shape: &mut Marker, kind: MarkerKind, ctx: &LayerContext) {
        if kind == MarkerKind::Point {
            shape.update(MarkerUpdate {
                x: Some(ctx.x_of(self.time)),
                time: Some(self.time),
                ..Default::default()
            });
        }
    }

    fn handle_time(&self, kind: MarkerKind) -> Option<f64> {
        (kind == MarkerKind::Point).then_some(self.time)
    }

    fn drag_target(
        &self,
        kind: MarkerKind,
        x: f64,
        ctx: &LayerContext,
        _marker_width: f64,
    ) -> Option<DragTarget> {
        if kind != MarkerKind::Point {
            return None;
        }
        let time = ctx.time_at(x).clamp(0.0, ctx.duration);
        Some(DragTarget::Point {
            id: self.id.clone(),
            time,
        })
    }
}

impl LayerItem for Segment {
    type Shape = SegmentShape;

    fn build_shape(&self, ctx: &LayerContext) -> SegmentShape {
        let start_x = ctx.x_of(self.start_time);
        let end_x = ctx.x_of(self.end_time);
        SegmentShape {
            start: Marker::SegmentStart {
                x: start_x,
                time: self.start_time,
                color: self.color,
                editable: self.editable,
            },
            end: Marker::SegmentEnd {
                x: end_x,
                time: self.end_time,
                color: self.color,
                editable: self.editable,
            },
            body: SegmentBody {
                x_start: start_x.clamp(0.0, ctx.width),
                x_end: end_x.clamp(0.0, ctx.width),
            },
            label: self.label_text.clone(),
            color: self.color,
        }
    }

    fn destroy_shape(shape: SegmentShape) {
        shape.destroy();
    }

    fn hit(shape: &SegmentShape, x: f64, half_width: f64) -> Option<MarkerKind> {
        // Prefer the nearer handle when both are in range
        let d_start = (shape.start.position() - x).abs();
        let d_end = (shape.end.position() - x).abs();
        match (d_start <= half_width, d_end <= half_width) {
            (true, true) if d_end < d_start => Some(MarkerKind::SegmentEnd),
            (true, _) => Some(MarkerKind::SegmentStart),
            (false, true) => Some(MarkerKind::SegmentEnd),
            (false, false) => None,
        }
    }

    fn marker(shape: &SegmentShape, kind: MarkerKind) -> Option<&Marker> {
        match kind {
            MarkerKind::SegmentStart => Some(&shape.start),
            MarkerKind::SegmentEnd => Some(&shape.end),
            MarkerKind::Point => None,
        }
    }

    fn move_marker(&self, shape: &mut SegmentShape, kind: MarkerKind, ctx: &LayerContext) {
        let (marker, time) = match kind {
            MarkerKind::SegmentStart => (&mut shape.start, self.start_time),
            MarkerKind::SegmentEnd => (&mut shape.end, self.end_time),
            MarkerKind::Point => return,
        };
        marker.update(MarkerUpdate {
            x: Some(ctx.x_of(time)),
            time: Some(time),
            ..Default::default()
        });
        shape.body = SegmentBody {
            x_start: shape.start.position().clamp(0.0, ctx.width),
            x_end: shape.end.position().clamp(0.0, ctx.width),
        };
    }

    fn handle_time(&self, kind: MarkerKind) -> Option<f64> {
        match kind {
            MarkerKind::SegmentStart => Some(self.start_time),
            MarkerKind::SegmentEnd => Some(self.end_time),
            MarkerKind::Point => None,
        }
    }

    fn drag_target(
        &self,
        kind: MarkerKind,
        x: f64,
        ctx: &LayerContext,
        marker_width: f64,
    ) -> Option<DragTarget> {
        match kind {
            MarkerKind::SegmentStart => {
                let limit = ctx.x_of(self.end_time) - marker_width;
                let start_time = ctx.time_at(x.min(limit)).clamp(0.0, ctx.duration);
                Some(DragTarget::Segment {
                    id: self.id.clone(),
                    start_time,
                    end_time: self.end_time,
                })
            }
            MarkerKind::SegmentEnd => {
                let limit = ctx.x_of(self.start_time) + marker_width;
                let end_time = ctx.time_at(x.max(limit)).clamp(0.0, ctx.duration);
                Some(DragTarget::Segment {
                    id: self.id.clone(),
                    start_time: self.start_time,
                    end_time,
                })
            }
            MarkerKind::Point => None,
        }
    }
}
