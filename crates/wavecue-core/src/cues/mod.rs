//! Cue scheduling
//!
//! - `Cue`: a (time, boundary kind, id) entry derived from an annotation
//! - `CueEmitter`: sorted cue index, playback scan and seek diffing
//! - `TickSource`: display-refresh or time-update driven scans

mod cue;
mod emitter;
mod tick;

pub use cue::{build_cues, Cue, CueEvent, CueKind};
pub use emitter::{CueEmitter, EmitterState};
pub use tick::{
    select_tick_source, tick_source, FrameTicks, PageVisibility, TickKind, TickSource,
    TimeUpdateTicks,
};
