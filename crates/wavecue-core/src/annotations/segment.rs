//! Segment annotation: a labelled time range

use super::Annotation;
use crate::error::{check_time, ViewerError, ViewerResult};
use crate::types::{Rgba, TimeWindow};

/// A time-range annotation, always `start_time < end_time`
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub(crate) id: String,
    pub(crate) start_time: f64,
    pub(crate) end_time: f64,
    pub(crate) label_text: String,
    pub(crate) color: Rgba,
    pub(crate) editable: bool,
}

impl Segment {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn label_text(&self) -> &str {
        &self.label_text
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn editable(&self) -> bool {
        self.editable
    }

    /// Whether the playhead at `time` is inside this segment
    pub fn contains(&self, time: f64) -> bool {
        self.start_time <= time && time < self.end_time
    }

    /// Apply an update atomically: the resulting range is checked first
    pub(crate) fn apply(&mut self, update: &SegmentUpdate) -> ViewerResult<()> {
        let start = match update.start_time {
            Some(t) => check_time("start_time", t)?,
            None => self.start_time,
        };
        let end = match update.end_time {
            Some(t) => check_time("end_time", t)?,
            None => self.end_time,
        };
        check_range(start, end)?;

        self.start_time = start;
        self.end_time = end;
        if let Some(label) = &update.label_text {
            self.label_text = label.clone();
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(editable) = update.editable {
            self.editable = editable;
        }
        Ok(())
    }
}

pub(crate) fn check_range(start: f64, end: f64) -> ViewerResult<()> {
    if start < end {
        Ok(())
    } else {
        Err(ViewerError::InvalidSegmentRange { start, end })
    }
}

impl Annotation for Segment {
    const KIND: &'static str = "segment";

    fn id(&self) -> &str {
        &self.id
    }

    fn editable(&self) -> bool {
        self.editable
    }

    fn is_visible(&self, window: TimeWindow) -> bool {
        window.overlaps(self.start_time, self.end_time)
    }

    fn not_found(id: &str) -> ViewerError {
        ViewerError::SegmentNotFound(id.to_string())
    }
}

/// Options for creating a segment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentOptions {
    /// Generated when omitted
    pub id: Option<String>,
    pub start_time: f64,
    pub end_time: f64,
    pub label_text: String,
    /// Configured default colour when omitted
    pub color: Option<Rgba>,
    pub editable: bool,
}

impl SegmentOptions {
    pub fn range(start_time: f64, end_time: f64) -> Self {
        Self {
            start_time,
            end_time,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label_text = label.into();
        self
    }

    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }
}

/// Partial update of a segment; `None` fields are left unchanged
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentUpdate {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub label_text: Option<String>,
    pub color: Option<Rgba>,
    pub editable: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64) -> Segment {
        Segment {
            id: "s".to_string(),
            start_time: start,
            end_time: end,
            label_text: "intro".to_string(),
            color: Rgba::rgb(0.0, 0.0, 1.0),
            editable: true,
        }
    }

    #[test]
    fn test_visibility_touching_edges() {
        let window = TimeWindow::new(10.0, 20.0);
        // Ends exactly where the window starts: not visible
        assert!(!segment(5.0, 10.0).is_visible(window));
        // Starts exactly at the window start: visible
        assert!(segment(10.0, 11.0).is_visible(window));
        // Partially visible on either side
        assert!(segment(5.0, 11.0).is_visible(window));
        assert!(segment(19.0, 30.0).is_visible(window));
        // Covers the whole window
        assert!(segment(0.0, 30.0).is_visible(window));
        assert!(!segment(20.0, 30.0).is_visible(window));
    }

    #[test]
    fn test_apply_rejects_inverted_range_atomically() {
        let mut s = segment(1.0, 2.0);
        let update = SegmentUpdate {
            start_time: Some(3.0),
            label_text: Some("changed".to_string()),
            ..Default::default()
        };
        let err = s.apply(&update).unwrap_err();
        assert_eq!(err, ViewerError::InvalidSegmentRange { start: 3.0, end: 2.0 });
        assert_eq!(s, segment(1.0, 2.0));
    }

    #[test]
    fn test_apply_moves_both_ends() {
        let mut s = segment(1.0, 2.0);
        let update = SegmentUpdate {
            start_time: Some(5.0),
            end_time: Some(6.0),
            ..Default::default()
        };
        s.apply(&update).unwrap();
        assert_eq!((s.start_time(), s.end_time()), (5.0, 6.0));
    }

    #[test]
    fn test_contains_is_half_open() {
        let s = segment(1.0, 2.0);
        assert!(s.contains(1.0));
        assert!(!s.contains(2.0));
    }
}
