//! On-screen marker shapes
//!
//! Markers are ephemeral: a layer creates them when an annotation becomes
//! visible and destroys them (rather than hiding) when it leaves the window.
//! Positions are view-relative pixels: `time_to_pixels(time) - frame_offset`.

use crate::types::Rgba;

/// Which marker of an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Point,
    SegmentStart,
    SegmentEnd,
}

/// Identifies one draggable marker in a layer
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarkerHandle {
    pub id: String,
    pub kind: MarkerKind,
}

impl MarkerHandle {
    pub fn new(id: impl Into<String>, kind: MarkerKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Field changes for `Marker::update`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerUpdate {
    pub x: Option<f64>,
    pub time: Option<f64>,
    pub label: Option<String>,
    pub color: Option<Rgba>,
    pub editable: Option<bool>,
}

/// Closed set of marker variants
#[derive(Debug, Clone, PartialEq)]
pub enum Marker {
    Point {
        x: f64,
        time: f64,
        label: String,
        color: Rgba,
        editable: bool,
    },
    SegmentStart {
        x: f64,
        time: f64,
        color: Rgba,
        editable: bool,
    },
    SegmentEnd {
        x: f64,
        time: f64,
        color: Rgba,
        editable: bool,
    },
}

impl Marker {
    pub fn kind(&self) -> MarkerKind {
        match self {
            Marker::Point { .. } => MarkerKind::Point,
            Marker::SegmentStart { .. } => MarkerKind::SegmentStart,
            Marker::SegmentEnd { .. } => MarkerKind::SegmentEnd,
        }
    }

    /// View-relative x position in pixels
    pub fn position(&self) -> f64 {
        match self {
            Marker::Point { x, .. } | Marker::SegmentStart { x, .. } | Marker::SegmentEnd { x, .. } => *x,
        }
    }

    pub fn time(&self) -> f64 {
        match self {
            Marker::Point { time, .. }
            | Marker::SegmentStart { time, .. }
            | Marker::SegmentEnd { time, .. } => *time,
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            Marker::Point { color, .. }
            | Marker::SegmentStart { color, .. }
            | Marker::SegmentEnd { color, .. } => *color,
        }
    }

    pub fn editable(&self) -> bool {
        match self {
            Marker::Point { editable, .. }
            | Marker::SegmentStart { editable, .. }
            | Marker::SegmentEnd { editable, .. } => *editable,
        }
    }

    /// Apply field changes in place
    pub fn update(&mut self, changes: MarkerUpdate) {
        match self {
            Marker::Point {
                x,
                time,
                label,
                color,
                editable,
            } => {
                if let Some(new_label) = &changes.label {
                    label.clone_from(new_label);
                }
                apply_common(x, time, color, editable, &changes);
            }
            Marker::SegmentStart {
                x,
                time,
                color,
                editable,
            }
            | Marker::SegmentEnd {
                x,
                time,
                color,
                editable,
            } => apply_common(x, time, color, editable, &changes),
        }
    }

    /// Release the marker
    pub fn destroy(self) {
        log::trace!("Destroyed {:?} marker at x={:.1}", self.kind(), self.position());
    }

    /// Whether `x` lies within `half_width` of this marker
    pub fn hit(&self, x: f64, half_width: f64) -> bool {
        (self.position() - x).abs() <= half_width
    }
}

fn apply_common(
    x: &mut f64,
    time: &mut f64,
    color: &mut Rgba,
    editable: &mut bool,
    changes: &MarkerUpdate,
) {
    if let Some(v) = changes.x {
        *x = v;
    }
    if let Some(v) = changes.time {
        *time = v;
    }
    if let Some(v) = changes.color {
        *color = v;
    }
    if let Some(v) = changes.editable {
        *editable = v;
    }
}

/// Segment fill region, clipped to the view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBody {
    pub x_start: f64,
    pub x_end: f64,
}

impl SegmentBody {
    pub fn width(&self) -> f64 {
        (self.x_end - self.x_start).max(0.0)
    }
}

/// Everything drawn for one segment: two handles, the body and a label
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentShape {
    pub start: Marker,
    pub end: Marker,
    pub body: SegmentBody,
    pub label: String,
    pub color: Rgba,
}

impl SegmentShape {
    pub fn destroy(self) {
        self.start.destroy();
        self.end.destroy();
    }
}
