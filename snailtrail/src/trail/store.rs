//! Fixed-capacity circular buffer of trail samples.
//!
//! # Design
//!
//! - Capacity is fixed at construction; the buffer never reallocates
//! - `append` overwrites the slot at the write index and advances it
//! - Every index is wrapped modulo capacity, negative ones included
//! - Overwriting the oldest sample is silent: bounded memory, not an error

use tracing::debug;

use super::point::SnailPoint;
use crate::geo::GeoBounds;

/// Default number of trail samples retained.
pub const DEFAULT_TRAIL_CAPACITY: usize = 1000;

/// Circular store of [`SnailPoint`]s.
///
/// # Usage
///
/// ```ignore
/// let mut store = SnailPointStore::new(1000);
/// store.append(point);
///
/// // Oldest retained sample, once the buffer has wrapped
/// let oldest = store.at(store.current_write_index() as isize);
/// ```
#[derive(Debug, Clone)]
pub struct SnailPointStore {
    points: Box<[SnailPoint]>,
    /// Next slot to be overwritten.
    write_index: usize,
    /// Number of slots holding a real sample.
    filled: usize,
    /// Bounds the `far_visible` flags were last computed against.
    far_bounds: Option<GeoBounds>,
}

impl Default for SnailPointStore {
    fn default() -> Self {
        Self::new(DEFAULT_TRAIL_CAPACITY)
    }
}

impl SnailPointStore {
    /// Create an empty store. A capacity of zero is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: vec![SnailPoint::default(); capacity].into_boxed_slice(),
            write_index: 0,
            filled: 0,
            far_bounds: None,
        }
    }

    /// Fixed capacity `N`.
    pub fn capacity(&self) -> usize {
        self.points.len()
    }

    /// Number of valid samples currently retained (at most `N`).
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// The next slot that [`append`](Self::append) will overwrite.
    pub fn current_write_index(&self) -> usize {
        self.write_index
    }

    /// Overwrite the slot at the write index and advance it.
    pub fn append(&mut self, point: SnailPoint) {
        self.points[self.write_index] = point;
        self.write_index += 1;
        if self.write_index == self.points.len() {
            self.write_index = 0;
            debug!(capacity = self.points.len(), "Snail trail wrapped");
        }
        if self.filled < self.points.len() {
            self.filled += 1;
        }
    }

    /// Wrap any logical index into a slot number.
    #[inline]
    pub fn wrap(&self, index: isize) -> usize {
        index.rem_euclid(self.points.len() as isize) as usize
    }

    /// Point at a logical index, wrapped modulo capacity.
    #[inline]
    pub fn at(&self, index: isize) -> &SnailPoint {
        &self.points[self.wrap(index)]
    }

    /// Mutable access for cache updates by the renderer.
    #[inline]
    pub fn at_mut(&mut self, index: isize) -> &mut SnailPoint {
        let slot = self.wrap(index);
        &mut self.points[slot]
    }

    /// Bounds of the last visibility scan, `None` before the first one.
    pub fn far_bounds(&self) -> Option<&GeoBounds> {
        self.far_bounds.as_ref()
    }

    /// Rescan far visibility unless the flags already describe `bounds`.
    ///
    /// Returns `true` when a rescan happened. Every caller shares the same
    /// flags, so a view must pass its own bounds on every frame.
    pub fn refresh_visibility(&mut self, bounds: &GeoBounds) -> bool {
        if self.far_bounds.as_ref() == Some(bounds) {
            return false;
        }
        self.scan_visibility(bounds);
        true
    }

    /// Recompute the coarse far-visibility flag of every sample.
    ///
    /// Unwritten slots stay invisible.
    pub fn scan_visibility(&mut self, bounds: &GeoBounds) {
        let mut visible = 0usize;
        for point in self.points.iter_mut() {
            point.far_visible =
                point.is_valid() && bounds.contains(point.latitude, point.longitude);
            if point.far_visible {
                visible += 1;
            }
        }
        self.far_bounds = Some(*bounds);
        debug!(visible, total = self.filled, "Rescanned trail visibility");
    }

    /// Drop every cached colour bucket.
    pub fn invalidate_colours(&mut self) {
        for point in self.points.iter_mut() {
            point.colour = None;
        }
    }

    /// Iterate valid samples from oldest to newest.
    pub fn iter_chronological(&self) -> impl Iterator<Item = &SnailPoint> {
        let start = self.write_index as isize - self.filled as isize;
        (0..self.filled as isize).map(move |i| self.at(start + i))
    }

    /// The most recently appended sample.
    pub fn latest(&self) -> Option<&SnailPoint> {
        if self.filled == 0 {
            None
        } else {
            Some(self.at(self.write_index as isize - 1))
        }
    }
}
