//! Cue emitter: enter/exit notifications during playback
//!
//! States:
//!
//! ```text
//!   Idle --attach--> Attached --playing--> Scheduling
//!                       ^                      |
//!                       +----pause / ended-----+
//!   (any) --detach--> Idle
//! ```
//!
//! The cue index is rebuilt from the collections after every annotation
//! mutation. Playback scans walk the sorted index between the previous and
//! the current time; seeks skip the scan and diff the active segment set.

use std::collections::HashSet;

use super::cue::{build_cues, Cue, CueEvent, CueKind};
use super::tick::{select_tick_source, tick_source, PageVisibility, TickKind, TickSource};
use crate::annotations::{Point, Segment};

/// Emitter lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    /// Not attached to a viewer
    Idle,
    /// Index built, no playback
    Attached,
    /// Playback in progress, emitting
    Scheduling,
}

#[derive(Debug)]
pub struct CueEmitter {
    state: EmitterState,
    cues: Vec<Cue>,
    active: HashSet<String>,
    ticks: Box<dyn TickSource>,
    visibility: PageVisibility,
    automated: bool,
}

impl Default for CueEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl CueEmitter {
    pub fn new() -> Self {
        let visibility = PageVisibility::Visible;
        Self {
            state: EmitterState::Idle,
            cues: Vec::new(),
            active: HashSet::new(),
            ticks: tick_source(select_tick_source(visibility, false)),
            visibility,
            automated: false,
        }
    }

    pub fn state(&self) -> EmitterState {
        self.state
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn tick_kind(&self) -> TickKind {
        self.ticks.kind()
    }

    /// Whether the emitter needs the next display refresh
    pub fn wants_frame(&self) -> bool {
        self.state == EmitterState::Scheduling && self.ticks.wants_frame()
    }

    pub fn is_active(&self, segment_id: &str) -> bool {
        self.active.contains(segment_id)
    }

    /// Active segment ids, sorted
    pub fn active_segments(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.active.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    pub fn attach(&mut self, points: &[Point], segments: &[Segment]) {
        self.state = EmitterState::Attached;
        self.rebuild(points, segments);
        log::debug!("Cue emitter attached with {} cues", self.cues.len());
    }

    pub fn detach(&mut self) {
        self.ticks.stop();
        self.cues.clear();
        self.active.clear();
        self.state = EmitterState::Idle;
        log::debug!("Cue emitter detached");
    }

    /// Discard and rebuild the cue index
    ///
    /// Ignored while detached. Active ids whose segment no longer exists are
    /// dropped without an exit event.
    pub fn rebuild(&mut self, points: &[Point], segments: &[Segment]) {
        if self.state == EmitterState::Idle {
            return;
        }
        self.cues = build_cues(points, segments);
        self.active
            .retain(|id| segments.iter().any(|s| s.id == *id));
        log::trace!("Cue index rebuilt: {} cues", self.cues.len());
    }

    pub fn on_playing(&mut self, time: f64) {
        if self.state == EmitterState::Idle {
            return;
        }
        self.state = EmitterState::Scheduling;
        self.ticks.start(time);
    }

    pub fn on_pause(&mut self) {
        self.stop_scheduling();
    }

    pub fn on_ended(&mut self) {
        self.stop_scheduling();
    }

    fn stop_scheduling(&mut self) {
        if self.state == EmitterState::Scheduling {
            self.ticks.stop();
            self.state = EmitterState::Attached;
        }
    }

    pub fn set_page_visibility(&mut self, visibility: PageVisibility) {
        self.visibility = visibility;
        self.select_ticks();
    }

    pub fn set_automation(&mut self, automated: bool) {
        self.automated = automated;
        self.select_ticks();
    }

    /// Swap tick sources when the selection changes, carrying the scan time
    fn select_ticks(&mut self) {
        let kind = select_tick_source(self.visibility, self.automated);
        if kind == self.ticks.kind() {
            return;
        }
        let previous = self.ticks.previous_time();
        self.ticks.stop();
        self.ticks = tick_source(kind);
        if self.state == EmitterState::Scheduling {
            self.ticks.start(previous);
        } else {
            self.ticks.reset(previous);
        }
        log::debug!("Cue tick source switched to {:?}", kind);
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    /// Display refresh with the player's current time
    pub fn on_frame(&mut self, current_time: f64) -> Vec<CueEvent> {
        if self.state != EmitterState::Scheduling {
            return Vec::new();
        }
        match self.ticks.on_frame(current_time) {
            Some((time, previous)) => self.emit_between(time, previous),
            None => Vec::new(),
        }
    }

    /// Playback position moved while a seek is in flight
    ///
    /// No scan runs, so boundaries between the old and new position never
    /// fire. The next scan starts from `time`; `on_seeked` settles the
    /// active set.
    pub fn on_seeking(&mut self, time: f64) {
        if self.state == EmitterState::Idle {
            return;
        }
        self.ticks.reset(time);
    }

    /// Media time-update notification
    pub fn on_time_update(&mut self, time: f64) -> Vec<CueEvent> {
        if self.state != EmitterState::Scheduling {
            return Vec::new();
        }
        match self.ticks.on_time_update(time) {
            Some((time, previous)) => self.emit_between(time, previous),
            None => Vec::new(),
        }
    }

    // =========================================================================
    // Emission
    // =========================================================================

    /// Scan cues crossed moving from `previous` to `time`
    ///
    /// Forward scans take `previous < cue <= time` in ascending order; reverse
    /// scans take `time <= cue < previous` in descending order. Crossing a
    /// segment start enters it going forward and exits it going backward; a
    /// segment end is the mirror image.
    pub fn emit_between(&mut self, time: f64, previous: f64) -> Vec<CueEvent> {
        if time == previous || time.is_nan() || previous.is_nan() {
            return Vec::new();
        }
        let forward = time > previous;

        let crossed: Vec<(CueKind, String)> = if forward {
            let lo = self.cues.partition_point(|c| c.time <= previous);
            self.cues[lo..]
                .iter()
                .take_while(|c| c.time <= time)
                .map(|c| (c.kind, c.id.clone()))
                .collect()
        } else {
            let lo = self.cues.partition_point(|c| c.time < time);
            let hi = self.cues.partition_point(|c| c.time < previous);
            self.cues[lo..hi.max(lo)]
                .iter()
                .rev()
                .map(|c| (c.kind, c.id.clone()))
                .collect()
        };

        let mut events = Vec::with_capacity(crossed.len());
        for (kind, id) in crossed {
            let entering = match kind {
                CueKind::Point => {
                    events.push(CueEvent::PointEnter { id, time });
                    continue;
                }
                CueKind::SegmentStart => forward,
                CueKind::SegmentEnd => !forward,
            };
            if entering {
                self.active.insert(id.clone());
                events.push(CueEvent::SegmentEnter { id, time });
            } else {
                self.active.remove(&id);
                events.push(CueEvent::SegmentExit { id, time });
            }
        }
        events
    }

    /// Discrete jump to `time`
    ///
    /// Recomputes the active set directly from `segments` without visiting
    /// intermediate cues: exits for segments no longer containing `time`,
    /// then enters for newly containing ones, each in collection order.
    pub fn on_seeked(&mut self, time: f64, segments: &[Segment]) -> Vec<CueEvent> {
        self.ticks.reset(time);
        if self.state == EmitterState::Idle {
            return Vec::new();
        }

        let now: HashSet<&str> = segments
            .iter()
            .filter(|s| s.contains(time))
            .map(|s| s.id.as_str())
            .collect();

        let mut events = Vec::new();
        for segment in segments {
            let id = segment.id.as_str();
            if self.active.contains(id) && !now.contains(id) {
                events.push(CueEvent::SegmentExit {
                    id: id.to_string(),
                    time,
                });
            }
        }
        for segment in segments {
            let id = segment.id.as_str();
            if now.contains(id) && !self.active.contains(id) {
                events.push(CueEvent::SegmentEnter {
                    id: id.to_string(),
                    time,
                });
            }
        }

        self.active = now.into_iter().map(str::to_string).collect();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{PointOptions, Points, SegmentOptions, Segments};

    fn ids(events: &[CueEvent]) -> Vec<String> {
        events
            .iter()
            .map(|e| match e {
                CueEvent::PointEnter { id, .. } => format!("enter:{}", id),
                CueEvent::SegmentEnter { id, .. } => format!("enter:{}", id),
                CueEvent::SegmentExit { id, .. } => format!("exit:{}", id),
            })
            .collect()
    }

    fn attached(points: &Points, segments: &Segments) -> CueEmitter {
        let mut emitter = CueEmitter::new();
        emitter.attach(points.all(), segments.all());
        emitter
    }

    fn three_points() -> Points {
        let mut points = Points::default();
        points
            .add(vec![
                PointOptions::at(1.05).id("p1"),
                PointOptions::at(1.07).id("p2"),
                PointOptions::at(1.09).id("p3"),
            ])
            .unwrap();
        points
    }

    fn abc() -> Segments {
        let mut segments = Segments::default();
        segments
            .add(vec![
                SegmentOptions::range(2.0, 4.0).id("A"),
                SegmentOptions::range(6.0, 8.0).id("B"),
                SegmentOptions::range(10.0, 12.0).id("C"),
            ])
            .unwrap();
        segments
    }

    #[test]
    fn test_point_order_forward_and_reverse() {
        let mut emitter = attached(&three_points(), &Segments::default());
        assert_eq!(
            ids(&emitter.emit_between(1.1, 1.0)),
            vec!["enter:p1", "enter:p2", "enter:p3"]
        );
        assert_eq!(
            ids(&emitter.emit_between(1.0, 1.1)),
            vec!["enter:p3", "enter:p2", "enter:p1"]
        );
    }

    #[test]
    fn test_boundary_policy() {
        let mut emitter = attached(&three_points(), &Segments::default());
        // previous time already processed, new time included
        assert_eq!(ids(&emitter.emit_between(1.07, 1.05)), vec!["enter:p2"]);
        assert_eq!(ids(&emitter.emit_between(1.05, 1.07)), vec!["enter:p1"]);
        assert!(emitter.emit_between(1.07, 1.07).is_empty());
    }

    #[test]
    fn test_segment_enter_exit_pairing() {
        let mut segments = Segments::default();
        segments
            .add(vec![SegmentOptions::range(1.05, 1.09).id("s")])
            .unwrap();
        let mut emitter = attached(&Points::default(), &segments);

        assert_eq!(ids(&emitter.emit_between(1.1, 1.0)), vec!["enter:s", "exit:s"]);
        assert!(!emitter.is_active("s"));
        assert_eq!(ids(&emitter.emit_between(1.0, 1.1)), vec!["enter:s", "exit:s"]);

        assert_eq!(ids(&emitter.emit_between(1.06, 1.0)), vec!["enter:s"]);
        assert!(emitter.is_active("s"));
        assert_eq!(ids(&emitter.emit_between(1.0, 1.06)), vec!["exit:s"]);
        assert!(!emitter.is_active("s"));
    }

    #[test]
    fn test_seek_skips_intermediate_segments() {
        let segments = abc();
        let mut emitter = attached(&Points::default(), &segments);

        assert_eq!(ids(&emitter.on_seeked(3.0, segments.all())), vec!["enter:A"]);
        assert_eq!(
            ids(&emitter.on_seeked(11.0, segments.all())),
            vec!["exit:A", "enter:C"]
        );
        assert_eq!(emitter.active_segments(), vec!["C"]);
        assert!(emitter.on_seeked(11.5, segments.all()).is_empty());
    }

    #[test]
    fn test_position_jump_during_seek_is_not_scanned() {
        let segments = abc();
        let mut emitter = attached(&Points::default(), &segments);
        emitter.on_seeked(3.0, segments.all());
        emitter.on_playing(3.0);

        emitter.on_seeking(11.0);
        assert!(emitter.wants_frame());
        assert!(emitter.on_frame(11.0).is_empty());
        assert_eq!(
            ids(&emitter.on_seeked(11.0, segments.all())),
            vec!["exit:A", "enter:C"]
        );
    }

    #[test]
    fn test_state_machine() {
        let segments = abc();
        let mut emitter = CueEmitter::new();
        emitter.on_playing(0.0);
        assert_eq!(emitter.state(), EmitterState::Idle);

        emitter.attach(&[], segments.all());
        assert_eq!(emitter.cues().len(), 6);
        emitter.on_playing(1.0);
        assert_eq!(emitter.state(), EmitterState::Scheduling);
        assert!(emitter.wants_frame());

        assert_eq!(ids(&emitter.on_frame(2.5)), vec!["enter:A"]);
        emitter.on_pause();
        assert_eq!(emitter.state(), EmitterState::Attached);
        assert!(!emitter.wants_frame());
        assert!(emitter.on_frame(5.0).is_empty());

        emitter.detach();
        assert_eq!(emitter.state(), EmitterState::Idle);
        assert!(emitter.cues().is_empty());
    }

    #[test]
    fn test_background_switches_to_time_updates() {
        let segments = abc();
        let mut emitter = attached(&Points::default(), &segments);
        emitter.on_playing(1.0);
        assert!(emitter.on_time_update(2.5).is_empty());

        emitter.set_page_visibility(PageVisibility::Hidden);
        assert_eq!(emitter.tick_kind(), TickKind::TimeUpdate);
        assert!(!emitter.wants_frame());
        // Scan continues from the last frame time
        assert_eq!(ids(&emitter.on_time_update(2.5)), vec!["enter:A"]);
        assert!(emitter.on_frame(3.0).is_empty());

        emitter.set_page_visibility(PageVisibility::Visible);
        assert_eq!(emitter.tick_kind(), TickKind::Frame);
        assert_eq!(ids(&emitter.on_frame(4.5)), vec!["exit:A"]);
    }

    #[test]
    fn test_rebuild_drops_removed_active_segment() {
        let mut segments = abc();
        let mut emitter = attached(&Points::default(), &segments);
        emitter.on_seeked(3.0, segments.all());
        assert!(emitter.is_active("A"));

        segments.remove_by_id(&["A"]).unwrap();
        emitter.rebuild(&[], segments.all());
        assert!(!emitter.is_active("A"));
        assert_eq!(emitter.cues().len(), 4);
    }
}
