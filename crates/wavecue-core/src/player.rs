//! Media player adapter
//!
//! The viewer never plays audio. The host wraps its playback engine in a
//! `MediaPlayer` and forwards the engine's notifications (`playing`, `pause`,
//! `ended`, `timeupdate`, `seeked`) to the matching `Viewer::on_*` methods.

/// Host playback engine as seen by the viewer
pub trait MediaPlayer {
    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Media duration in seconds
    fn duration(&self) -> f64;

    fn is_playing(&self) -> bool;

    /// Whether a seek is in progress
    fn is_seeking(&self) -> bool;

    /// Ask the engine to seek; it reports completion through `Viewer::on_seeked`
    fn seek(&mut self, time: f64);
}
