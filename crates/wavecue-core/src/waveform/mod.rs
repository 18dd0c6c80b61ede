//! Waveform sample store
//!
//! - `WaveformData`: immutable min/max columns with resampling
//! - `WaveformBuilder`: background generation from PCM with a single failure path

mod builder;
mod data;

pub use builder::{BuildRequest, BuildResult, WaveformBuilder};
pub use data::{ChannelData, Peak, Resample, WaveformData};
