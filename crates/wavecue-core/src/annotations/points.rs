//! Points collection

use super::point::{Point, PointOptions, PointUpdate};
use super::AnnotationStore;
use crate::error::{check_time, ViewerResult};
use crate::types::{Rgba, DEFAULT_POINT_COLOR};

/// All points of a viewer, in insertion order
#[derive(Debug, Clone)]
pub struct Points {
    store: AnnotationStore<Point>,
    default_color: Rgba,
}

impl Points {
    pub fn new(default_color: Rgba) -> Self {
        Self {
            store: AnnotationStore::new(),
            default_color,
        }
    }

    pub fn all(&self) -> &[Point] {
        self.store.all()
    }

    pub fn get(&self, id: &str) -> Option<&Point> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.all().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.all().is_empty()
    }

    /// Points with `start <= time < end`
    pub fn find(&self, start: f64, end: f64) -> Vec<&Point> {
        self.all()
            .iter()
            .filter(|p| start <= p.time && p.time < end)
            .collect()
    }

    /// Add a batch; if any entry is invalid nothing is added
    pub fn add(&mut self, options: Vec<PointOptions>) -> ViewerResult<Vec<Point>> {
        for opts in &options {
            check_time("time", opts.time)?;
        }
        let ids = self
            .store
            .assign_ids(options.iter().map(|o| o.id.clone()).collect())?;

        let created: Vec<Point> = options
            .into_iter()
            .zip(ids)
            .map(|(opts, id)| Point {
                id,
                time: opts.time,
                label_text: opts.label_text,
                color: opts.color.unwrap_or(self.default_color),
                editable: opts.editable,
            })
            .collect();

        self.store.extend(created.clone());
        log::debug!("Added {} point(s), {} total", created.len(), self.len());
        Ok(created)
    }

    /// Update one point, returning its new state
    pub fn update(&mut self, id: &str, update: &PointUpdate) -> ViewerResult<Point> {
        let point = self
            .store
            .get_mut(id)
            .ok_or_else(|| crate::error::ViewerError::PointNotFound(id.to_string()))?;
        point.apply(update)?;
        Ok(point.clone())
    }

    /// Remove points by id; fails without removing anything if an id is unknown
    pub fn remove_by_id(&mut self, ids: &[&str]) -> ViewerResult<Vec<Point>> {
        self.store.remove_ids(ids)
    }

    /// Remove every point at exactly `time`
    pub fn remove_by_time(&mut self, time: f64) -> Vec<Point> {
        self.store.remove_where(|p| p.time == time)
    }

    pub fn remove_all(&mut self) -> Vec<Point> {
        self.store.clear()
    }

    /// Move a point during a drag, bypassing the update cycle
    pub(crate) fn set_time(&mut self, id: &str, time: f64) -> Option<Point> {
        let point = self.store.get_mut(id)?;
        point.time = time;
        Some(point.clone())
    }
}

impl Default for Points {
    fn default() -> Self {
        Self::new(DEFAULT_POINT_COLOR)
    }
}
