//! Discrete zoom levels for zoom in/out controls

use crate::error::{ViewerError, ViewerResult};

/// Ordered list of zoom scales with a current index
///
/// Levels are ascending samples-per-pixel, so zooming in moves towards
/// index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomLevels {
    levels: Vec<u32>,
    index: usize,
}

impl ZoomLevels {
    /// `levels` must be non-empty and ascending (config validation ensures it)
    pub fn new(levels: Vec<u32>, index: usize) -> Self {
        let levels = if levels.is_empty() { vec![512] } else { levels };
        let index = index.min(levels.len() - 1);
        Self { levels, index }
    }

    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> u32 {
        self.levels[self.index]
    }

    /// Nearest level finer than `scale`; `None` when none is
    pub fn finer_than(&self, scale: u32) -> Option<u32> {
        self.levels.iter().rev().copied().find(|&level| level < scale)
    }

    /// Nearest level coarser than `scale`; `None` when none is
    pub fn coarser_than(&self, scale: u32) -> Option<u32> {
        self.levels.iter().copied().find(|&level| level > scale)
    }

    /// Point the index at the first level not finer than `scale`
    ///
    /// Keeps `index()` meaningful after zooms to arbitrary scales.
    pub fn sync_to(&mut self, scale: u32) {
        self.index = self
            .levels
            .iter()
            .position(|&level| level >= scale)
            .unwrap_or(self.levels.len() - 1);
    }

    pub fn level(&self, index: usize) -> ViewerResult<u32> {
        self.levels
            .get(index)
            .copied()
            .ok_or(ViewerError::ZoomLevelOutOfRange {
                index,
                count: self.levels.len(),
            })
    }
}
