//! Colours and sizes for the waveform canvases

use iced::Color;
use wavecue_core::view::ViewKind;
use wavecue_core::Rgba;

/// Overview canvas height in pixels
pub const OVERVIEW_HEIGHT: f32 = 75.0;

/// Zoomview canvas height in pixels
pub const ZOOMVIEW_HEIGHT: f32 = 240.0;

/// Convert a core colour to an iced colour
pub fn to_color(rgba: Rgba) -> Color {
    Color::from_rgba(rgba.r, rgba.g, rgba.b, rgba.a)
}

/// Per-view drawing style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformStyle {
    pub height: f32,
    pub background: Color,
    pub waveform: Color,
    pub playhead: Color,
    /// Alpha applied to segment colours for the body fill
    pub segment_body_alpha: f32,
    /// Width of point and segment marker lines
    pub marker_line_width: f32,
    /// Text size of point and segment labels
    pub label_size: f32,
}

impl WaveformStyle {
    pub fn overview() -> Self {
        Self {
            height: OVERVIEW_HEIGHT,
            background: Color::from_rgb(0.1, 0.1, 0.12),
            waveform: Color::from_rgb(0.55, 0.55, 0.6),
            playhead: Color::from_rgb(1.0, 1.0, 1.0),
            segment_body_alpha: 0.2,
            marker_line_width: 1.0,
            label_size: 10.0,
        }
    }

    pub fn zoomview() -> Self {
        Self {
            height: ZOOMVIEW_HEIGHT,
            background: Color::from_rgb(0.08, 0.08, 0.1),
            waveform: Color::from_rgb(0.0, 0.8, 0.8),
            playhead: Color::from_rgb(1.0, 1.0, 1.0),
            segment_body_alpha: 0.25,
            marker_line_width: 2.0,
            label_size: 12.0,
        }
    }

    pub fn for_view(kind: ViewKind) -> Self {
        match kind {
            ViewKind::Overview => Self::overview(),
            ViewKind::Zoomview => Self::zoomview(),
        }
    }
}
