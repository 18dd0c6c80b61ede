//! Point and segment annotations
//!
//! The `Points` and `Segments` collections are the single source of truth for
//! annotations. Layers and the cue emitter only ever read them; all mutation
//! goes through the collection methods, which validate a whole request before
//! changing anything.

mod point;
mod points;
mod segment;
mod segments;

use std::collections::HashSet;

pub use point::{Point, PointOptions, PointUpdate};
pub use points::Points;
pub use segment::{Segment, SegmentOptions, SegmentUpdate};
pub use segments::Segments;

use crate::error::{ViewerError, ViewerResult};
use crate::types::TimeWindow;

/// Behaviour shared by points and segments
pub trait Annotation: Clone {
    /// Name used in logs and errors ("point" / "segment")
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn editable(&self) -> bool;

    /// Whether any part of the annotation falls inside `window`
    fn is_visible(&self, window: TimeWindow) -> bool;

    /// Error for a missing id of this kind
    fn not_found(id: &str) -> ViewerError;
}

/// Insertion-ordered id-keyed storage shared by both collections
#[derive(Debug, Clone)]
pub(crate) struct AnnotationStore<T: Annotation> {
    items: Vec<T>,
    next_id: u64,
}

impl<T: Annotation> AnnotationStore<T> {
    pub(crate) fn new() -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn all(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Final ids for a batch
    ///
    /// Explicit ids must be new and distinct. Generated ids skip anything
    /// already stored and any explicit id requested in the same batch.
    pub(crate) fn assign_ids(&mut self, requested: Vec<Option<String>>) -> ViewerResult<Vec<String>> {
        let mut reserved: HashSet<String> = HashSet::new();
        for id in requested.iter().flatten() {
            if self.contains(id) || !reserved.insert(id.clone()) {
                return Err(ViewerError::DuplicateId(id.clone()));
            }
        }

        let mut ids = Vec::with_capacity(requested.len());
        for id in requested {
            let id = match id {
                Some(id) => id,
                None => {
                    let generated = self.next_free_id(&reserved);
                    reserved.insert(generated.clone());
                    generated
                }
            };
            ids.push(id);
        }
        Ok(ids)
    }

    fn next_free_id(&mut self, reserved: &HashSet<String>) -> String {
        loop {
            let candidate = format!("{}.{}", T::KIND, self.next_id);
            self.next_id += 1;
            if !self.contains(&candidate) && !reserved.contains(&candidate) {
                return candidate;
            }
        }
    }

    pub(crate) fn extend(&mut self, items: Vec<T>) {
        self.items.extend(items);
    }

    /// Remove all listed ids, or nothing if any is missing
    pub(crate) fn remove_ids(&mut self, ids: &[&str]) -> ViewerResult<Vec<T>> {
        if let Some(missing) = ids.iter().find(|id| !self.contains(id)) {
            return Err(T::not_found(missing));
        }
        Ok(self.remove_where(|item| ids.iter().any(|id| *id == item.id())))
    }

    pub(crate) fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if pred(&item) {
                removed.push(item);
            } else {
                kept.push(item);
            }
        }
        self.items = kept;
        removed
    }

    pub(crate) fn clear(&mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }
}
