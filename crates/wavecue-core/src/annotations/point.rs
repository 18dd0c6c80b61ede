//! Point annotation: a single labelled instant

use super::Annotation;
use crate::error::{check_time, ViewerError, ViewerResult};
use crate::types::{Rgba, TimeWindow};

/// A time-point annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub(crate) id: String,
    pub(crate) time: f64,
    pub(crate) label_text: String,
    pub(crate) color: Rgba,
    pub(crate) editable: bool,
}

impl Point {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn time(&self) -> f64 {
        self.time
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

    /// Apply an update after validating it; on error nothing changes
    pub(crate) fn apply(&mut self, update: &PointUpdate) -> ViewerResult<()> {
        if let Some(time) = update.time {
            check_time("time", time)?;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
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

impl Annotation for Point {
    const KIND: &'static str = "point";

    fn id(&self) -> &str {
        &self.id
    }

    fn editable(&self) -> bool {
        self.editable
    }

    fn is_visible(&self, window: TimeWindow) -> bool {
        window.contains(self.time)
    }

    fn not_found(id: &str) -> ViewerError {
        ViewerError::PointNotFound(id.to_string())
    }
}

/// Options for creating a point
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointOptions {
    /// Generated when omitted
    pub id: Option<String>,
    pub time: f64,
    pub label_text: String,
    /// Configured default colour when omitted
    pub color: Option<Rgba>,
    pub editable: bool,
}

impl PointOptions {
    pub fn at(time: f64) -> Self {
        Self {
            time,
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

/// Partial update of a point; `None` fields are left unchanged
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointUpdate {
    pub time: Option<f64>,
    pub label_text: Option<String>,
    pub color: Option<Rgba>,
    pub editable: Option<bool>,
}
