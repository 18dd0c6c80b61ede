//! Viewer configuration
//!
//! Stored as YAML. Every section uses `#[serde(default)]`, so a file only
//! needs the values it overrides.
//!
//! ```yaml
//! zoomview:
//!   zoom_levels: [512, 1024, 2048, 4096]
//!   animation:
//!     enabled: true
//!     zoom_in_frames: 15
//!     zoom_out_frames: 30
//! markers:
//!   marker_width: 10.0
//! ```

mod file;

pub use file::{ConfigError, ConfigResult};

use crate::types::{Rgba, DEFAULT_POINT_COLOR, DEFAULT_SEGMENT_COLOR};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub zoomview: ZoomviewConfig,
    pub overview: OverviewConfig,
    pub markers: MarkerConfig,
    pub cues: CueConfig,
}

impl ViewerConfig {
    /// Clamp values into usable ranges
    pub fn validate(&mut self) {
        self.zoomview.validate();
        self.markers.marker_width = self.markers.marker_width.clamp(1.0, 100.0);
        self.markers.hit_tolerance = self.markers.hit_tolerance.clamp(0.0, 50.0);
    }
}

/// Zoomed view settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomviewConfig {
    /// Zoom levels in samples per pixel, ascending
    pub zoom_levels: Vec<u32>,
    /// Index into `zoom_levels` used at startup
    pub initial_zoom_index: usize,
    /// Keep the playhead in view during playback
    pub auto_scroll: bool,
    /// Distance from the right edge (px) at which auto-scroll kicks in
    pub auto_scroll_margin: f64,
    pub animation: AnimationConfig,
}

impl Default for ZoomviewConfig {
    fn default() -> Self {
        Self {
            zoom_levels: vec![512, 1024, 2048, 4096],
            initial_zoom_index: 0,
            auto_scroll: true,
            auto_scroll_margin: 100.0,
            animation: AnimationConfig::default(),
        }
    }
}

impl ZoomviewConfig {
    fn validate(&mut self) {
        self.zoom_levels.retain(|&level| level > 0);
        self.zoom_levels.sort_unstable();
        self.zoom_levels.dedup();
        if self.zoom_levels.is_empty() {
            self.zoom_levels = ZoomviewConfig::default().zoom_levels;
        }
        self.initial_zoom_index = self.initial_zoom_index.min(self.zoom_levels.len() - 1);
        self.auto_scroll_margin = self.auto_scroll_margin.max(0.0);
        self.animation.zoom_in_frames = self.animation.zoom_in_frames.max(1);
        self.animation.zoom_out_frames = self.animation.zoom_out_frames.max(1);
    }
}

/// Zoom transition animation
///
/// Zooming in needs fewer frames than zooming out. Frame counts are tunable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub enabled: bool,
    pub zoom_in_frames: u32,
    pub zoom_out_frames: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            zoom_in_frames: 15,
            zoom_out_frames: 30,
        }
    }
}

/// Overview settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewConfig {
    pub show_playhead: bool,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self { show_playhead: true }
    }
}

/// Marker geometry and colours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    /// Marker handle width in pixels; segment handles keep at least this apart
    pub marker_width: f64,
    /// Extra pixels either side of a marker accepted as a hit
    pub hit_tolerance: f64,
    pub point_color: Rgba,
    pub segment_color: Rgba,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            marker_width: 10.0,
            hit_tolerance: 3.0,
            point_color: DEFAULT_POINT_COLOR,
            segment_color: DEFAULT_SEGMENT_COLOR,
        }
    }
}

/// Cue emission settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueConfig {
    /// Emit point/segment enter and exit events during playback
    pub emit_cues: bool,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self { emit_cues: true }
    }
}

/// Default config file path: ~/.config/wavecue/config.yaml
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavecue")
        .join("config.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.zoomview.zoom_levels, vec![512, 1024, 2048, 4096]);
        assert_eq!(config.zoomview.animation.zoom_in_frames, 15);
        assert_eq!(config.zoomview.animation.zoom_out_frames, 30);
        assert!(config.cues.emit_cues);
    }

    #[test]
    fn test_validate_zoom_levels() {
        let mut config = ViewerConfig::default();
        config.zoomview.zoom_levels = vec![2048, 0, 512, 512];
        config.zoomview.initial_zoom_index = 10;
        config.zoomview.animation.zoom_in_frames = 0;
        config.validate();

        assert_eq!(config.zoomview.zoom_levels, vec![512, 2048]);
        assert_eq!(config.zoomview.initial_zoom_index, 1);
        assert_eq!(config.zoomview.animation.zoom_in_frames, 1);
    }

    #[test]
    fn test_validate_empty_levels_restores_defaults() {
        let mut config = ViewerConfig::default();
        config.zoomview.zoom_levels.clear();
        config.validate();
        assert_eq!(config.zoomview.zoom_levels.len(), 4);
    }
}
