//! Viewer error types

use thiserror::Error;

/// Errors returned by viewer operations
///
/// Usage and not-found errors are rejected synchronously and leave all state
/// unchanged. `ResolutionUnavailable` is recoverable: the viewer clamps and
/// reports it alongside a successful result instead of failing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// A time value was negative, NaN or infinite
    #[error("Invalid time for {field}: {value}")]
    InvalidTime { field: &'static str, value: f64 },

    /// A segment would end up with start >= end
    #[error("Invalid segment range: start {start} must be before end {end}")]
    InvalidSegmentRange { start: f64, end: f64 },

    /// Scroll request did not supply exactly one of pixels/seconds
    #[error("Scroll requires exactly one of pixels or seconds")]
    InvalidScroll,

    /// An annotation with this id already exists
    #[error("Duplicate annotation id: {0}")]
    DuplicateId(String),

    /// No point with this id
    #[error("Point not found: {0}")]
    PointNotFound(String),

    /// No segment with this id
    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    /// No view with this name
    #[error("View not found: {0}")]
    ViewNotFound(String),

    /// Zoom level index outside the configured levels
    #[error("Zoom level index {index} out of range (0..{count})")]
    ZoomLevelOutOfRange { index: usize, count: usize },

    /// The annotation is not editable, so it cannot be dragged
    #[error("Annotation is not editable: {0}")]
    NotEditable(String),

    /// Drag move/end without a drag in progress
    #[error("No drag session in progress")]
    NoDragSession,

    /// Operation not supported by this view
    #[error("{operation} is not supported by the {view} view")]
    Unsupported { operation: &'static str, view: &'static str },

    /// Requested resolution is finer than the source data provides
    #[error("Zoom scale {requested} unavailable, source resolution is {minimum} samples per pixel")]
    ResolutionUnavailable { requested: u32, minimum: u32 },

    /// Waveform data could not be produced
    #[error("Waveform sample store error: {0}")]
    SampleStore(String),
}

/// Result type for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Check that a time is finite and non-negative
pub(crate) fn check_time(field: &'static str, value: f64) -> ViewerResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ViewerError::InvalidTime { field, value })
    }
}
