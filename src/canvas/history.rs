use std::collections::VecDeque;

use image::RgbaImage;

/// Each snapshot is a full RGBA frame at physical resolution, so keep this small.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Full-frame raster snapshots, each captured just before a stroke starts.
///
/// Bounded: pushing past the limit evicts the oldest snapshot.
#[derive(Debug)]
pub struct History {
    snapshots: VecDeque<RgbaImage>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create an empty history; a limit of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Append a snapshot, evicting the oldest when over the limit.
    pub fn push(&mut self, snapshot: RgbaImage) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.limit {
            self.snapshots.pop_front();
        }
    }

    /// Remove and return the most recent snapshot.
    pub fn pop(&mut self) -> Option<RgbaImage> {
        self.snapshots.pop_back()
    }

    /// The most recent snapshot, left in place.
    pub fn last(&self) -> Option<&RgbaImage> {
        self.snapshots.back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
