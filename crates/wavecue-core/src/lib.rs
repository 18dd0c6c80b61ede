//! wavecue core - waveform viewport, annotation and cue scheduling engine
//!
//! Drives two synchronized waveform views (a whole-track overview and a
//! zoomable window), keeps point and segment annotations on screen as the
//! window moves, and emits enter/exit notifications as playback crosses
//! annotation boundaries. Drawing is left to the host; see `wavecue-widgets`.

pub mod annotations;
pub mod config;
pub mod cues;
pub mod error;
pub mod events;
pub mod layers;
pub mod player;
pub mod schedule;
pub mod timescale;
pub mod types;
pub mod view;
pub mod viewer;
pub mod waveform;

pub use error::{ViewerError, ViewerResult};
pub use events::ViewerEvent;
pub use player::MediaPlayer;
pub use types::*;
pub use viewer::{ViewWidths, Viewer};
