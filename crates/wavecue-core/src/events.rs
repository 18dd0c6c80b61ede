//! Notifications delivered to the host
//!
//! The viewer queues events while handling a call and the host collects them
//! with `Viewer::drain_events`. Annotation payloads are snapshots taken when
//! the event was queued.

use crate::annotations::{Point, Segment};
use crate::layers::MarkerKind;
use crate::types::TimeWindow;
use crate::view::ViewKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    // Points
    PointsAdd(Vec<Point>),
    PointsRemove(Vec<Point>),
    PointsRemoveAll,
    PointsUpdate(Point),
    /// Playback crossed a point
    PointEnter { point: Point, time: f64 },
    PointDragStart { point: Point, view: ViewKind },
    PointDragMove { point: Point, view: ViewKind },
    PointDragEnd {
        point: Point,
        view: ViewKind,
        /// Point time before the drag started
        initial_time: f64,
    },

    // Segments
    SegmentsAdd(Vec<Segment>),
    SegmentsRemove(Vec<Segment>),
    SegmentsRemoveAll,
    SegmentsUpdate(Segment),
    SegmentEnter { segment: Segment, time: f64 },
    SegmentExit { segment: Segment, time: f64 },
    SegmentDragStart {
        segment: Segment,
        view: ViewKind,
        marker: MarkerKind,
    },
    SegmentDragMove {
        segment: Segment,
        view: ViewKind,
        marker: MarkerKind,
    },
    SegmentDragEnd {
        segment: Segment,
        view: ViewKind,
        marker: MarkerKind,
        initial_time: f64,
    },

    // Views
    ZoomUpdate { previous: u32, current: u32 },
    VisibleRangeChanged { view: ViewKind, window: TimeWindow },
}

impl ViewerEvent {
    /// Dotted event name, e.g. `segments.enter`
    pub fn name(&self) -> &'static str {
        match self {
            ViewerEvent::PointsAdd(_) => "points.add",
            ViewerEvent::PointsRemove(_) => "points.remove",
            ViewerEvent::PointsRemoveAll => "points.remove_all",
            ViewerEvent::PointsUpdate(_) => "points.update",
            ViewerEvent::PointEnter { .. } => "points.enter",
            ViewerEvent::PointDragStart { .. } => "points.dragstart",
            ViewerEvent::PointDragMove { .. } => "points.dragmove",
            ViewerEvent::PointDragEnd { .. } => "points.dragend",
            ViewerEvent::SegmentsAdd(_) => "segments.add",
            ViewerEvent::SegmentsRemove(_) => "segments.remove",
            ViewerEvent::SegmentsRemoveAll => "segments.remove_all",
            ViewerEvent::SegmentsUpdate(_) => "segments.update",
            ViewerEvent::SegmentEnter { .. } => "segments.enter",
            ViewerEvent::SegmentExit { .. } => "segments.exit",
            ViewerEvent::SegmentDragStart { .. } => "segments.dragstart",
            ViewerEvent::SegmentDragMove { .. } => "segments.dragmove",
            ViewerEvent::SegmentDragEnd { .. } => "segments.dragend",
            ViewerEvent::ZoomUpdate { .. } => "zoom.update",
            ViewerEvent::VisibleRangeChanged { .. } => "view.range_changed",
        }
    }
}
