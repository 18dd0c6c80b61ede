//! Marker drag sessions
//!
//! A drag is a start/move/end sequence against one marker. During the move
//! phase the annotation time is written straight into the collection through
//! a narrow setter, so no update notification fires until the drag ends.

use super::marker::MarkerHandle;

/// One in-progress drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub handle: MarkerHandle,
    /// Pointer x when the drag began
    pub origin_x: f64,
    /// Marker x when the drag began
    pub marker_x: f64,
    /// Annotation time before the drag, for the end-of-drag event
    pub initial_time: f64,
}

impl DragSession {
    pub fn new(handle: MarkerHandle, origin_x: f64, marker_x: f64, initial_time: f64) -> Self {
        Self {
            handle,
            origin_x,
            marker_x,
            initial_time,
        }
    }

    /// Marker x for pointer position `pointer_x`, keeping the grab offset
    pub fn target_x(&self, pointer_x: f64) -> f64 {
        self.marker_x + (pointer_x - self.origin_x)
    }
}

/// New annotation time(s) produced by a drag move
#[derive(Debug, Clone, PartialEq)]
pub enum DragTarget {
    Point {
        id: String,
        time: f64,
    },
    Segment {
        id: String,
        start_time: f64,
        end_time: f64,
    },
}

impl DragTarget {
    pub fn id(&self) -> &str {
        match self {
            DragTarget::Point { id, .. } | DragTarget::Segment { id, .. } => id,
        }
    }
}
