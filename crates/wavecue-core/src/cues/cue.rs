//! Cue index entries

use crate::annotations::{Point, Segment};

/// Which boundary a cue marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    Point,
    SegmentStart,
    SegmentEnd,
}

/// One annotation boundary on the timeline
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub time: f64,
    pub kind: CueKind,
    /// Id of the point or segment
    pub id: String,
}

impl Cue {
    pub fn new(time: f64, kind: CueKind, id: impl Into<String>) -> Self {
        Self {
            time,
            kind,
            id: id.into(),
        }
    }
}

/// Build the time-sorted cue list for the given annotations
///
/// Points come first, then each segment's start and end, and the sort is
/// stable, so cues sharing a time keep that relative order.
pub fn build_cues(points: &[Point], segments: &[Segment]) -> Vec<Cue> {
    let mut cues: Vec<Cue> = points
        .iter()
        .map(|p| Cue::new(p.time, CueKind::Point, p.id.as_str()))
        .chain(segments.iter().flat_map(|s| {
            [
                Cue::new(s.start_time, CueKind::SegmentStart, s.id.as_str()),
                Cue::new(s.end_time, CueKind::SegmentEnd, s.id.as_str()),
            ]
        }))
        .collect();
    cues.sort_by(|a, b| a.time.total_cmp(&b.time));
    cues
}

/// What a playback scan or seek produced
#[derive(Debug, Clone, PartialEq)]
pub enum CueEvent {
    PointEnter { id: String, time: f64 },
    SegmentEnter { id: String, time: f64 },
    SegmentExit { id: String, time: f64 },
}

impl CueEvent {
    pub fn id(&self) -> &str {
        match self {
            CueEvent::PointEnter { id, .. }
            | CueEvent::SegmentEnter { id, .. }
            | CueEvent::SegmentExit { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{PointOptions, Points, SegmentOptions, Segments};

    #[test]
    fn test_build_cues_sorted_and_stable() {
        let mut points = Points::default();
        points
            .add(vec![
                PointOptions::at(2.0).id("late"),
                PointOptions::at(1.0).id("tie-a"),
            ])
            .unwrap();
        let mut segments = Segments::default();
        segments
            .add(vec![SegmentOptions::range(1.0, 3.0).id("s")])
            .unwrap();

        let cues = build_cues(points.all(), segments.all());
        let order: Vec<(&str, CueKind)> = cues.iter().map(|c| (c.id.as_str(), c.kind)).collect();
        assert_eq!(
            order,
            vec![
                ("tie-a", CueKind::Point),
                ("s", CueKind::SegmentStart),
                ("late", CueKind::Point),
                ("s", CueKind::SegmentEnd),
            ]
        );
    }
}
