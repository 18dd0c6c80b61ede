//! Segments collection

use super::segment::{check_range, Segment, SegmentOptions, SegmentUpdate};
use super::AnnotationStore;
use crate::error::{check_time, ViewerError, ViewerResult};
use crate::types::{Rgba, DEFAULT_SEGMENT_COLOR};

/// All segments of a viewer, in insertion order
#[derive(Debug, Clone)]
pub struct Segments {
    store: AnnotationStore<Segment>,
    default_color: Rgba,
}

impl Segments {
    pub fn new(default_color: Rgba) -> Self {
        Self {
            store: AnnotationStore::new(),
            default_color,
        }
    }

    pub fn all(&self) -> &[Segment] {
        self.store.all()
    }

    pub fn get(&self, id: &str) -> Option<&Segment> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.all().is_empty()
    }

    /// Segments overlapping `[start, end)`
    pub fn find(&self, start: f64, end: f64) -> Vec<&Segment> {
        self.all()
            .iter()
            .filter(|s| s.start_time < end && start < s.end_time)
            .collect()
    }

    /// Segments containing `time`, in insertion order
    pub fn overlapping_at(&self, time: f64) -> Vec<&Segment> {
        self.all().iter().filter(|s| s.contains(time)).collect()
    }

    /// Add a batch; if any entry is invalid nothing is added
    pub fn add(&mut self, options: Vec<SegmentOptions>) -> ViewerResult<Vec<Segment>> {
        for opts in &options {
            check_time("start_time", opts.start_time)?;
            check_time("end_time", opts.end_time)?;
            check_range(opts.start_time, opts.end_time)?;
        }
        let ids = self
            .store
            .assign_ids(options.iter().map(|o| o.id.clone()).collect())?;

        let created: Vec<Segment> = options
            .into_iter()
            .zip(ids)
            .map(|(opts, id)| Segment {
                id,
                start_time: opts.start_time,
                end_time: opts.end_time,
                label_text: opts.label_text,
                color: opts.color.unwrap_or(self.default_color),
                editable: opts.editable,
            })
            .collect();

        self.store.extend(created.clone());
        log::debug!("Added {} segment(s), {} total", created.len(), self.len());
        Ok(created)
    }

    /// Update one segment, returning its new state
    ///
    /// An update that would leave `start_time >= end_time` is rejected and the
    /// segment keeps its previous values.
    pub fn update(&mut self, id: &str, update: &SegmentUpdate) -> ViewerResult<Segment> {
        let segment = self
            .store
            .get_mut(id)
            .ok_or_else(|| ViewerError::SegmentNotFound(id.to_string()))?;
        segment.apply(update)?;
        Ok(segment.clone())
    }

    /// Remove segments by id; fails without removing anything if an id is unknown
    pub fn remove_by_id(&mut self, ids: &[&str]) -> ViewerResult<Vec<Segment>> {
        self.store.remove_ids(ids)
    }

    /// Remove segments starting at exactly `start_time` (and ending at
    /// `end_time`, when given)
    pub fn remove_by_time(&mut self, start_time: f64, end_time: Option<f64>) -> Vec<Segment> {
        self.store.remove_where(|s| {
            s.start_time == start_time && end_time.map_or(true, |end| s.end_time == end)
        })
    }

    pub fn remove_all(&mut self) -> Vec<Segment> {
        self.store.clear()
    }

    /// Move segment boundaries during a drag, bypassing the update cycle
    ///
    /// Still refuses an inverted range.
    pub(crate) fn set_times(&mut self, id: &str, start: f64, end: f64) -> Option<Segment> {
        if check_range(start, end).is_err() {
            return None;
        }
        let segment = self.store.get_mut(id)?;
        segment.start_time = start;
        segment.end_time = end;
        Some(segment.clone())
    }
}

impl Default for Segments {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_COLOR)
    }
}
