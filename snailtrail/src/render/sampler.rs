//! Adaptive thinning of the trail window.
//!
//! Long trails are expensive to draw, and old history matters less than the
//! last few minutes. The sampler walks the requested window from oldest to
//! newest and accepts points at a stride that shrinks toward the present:
//!
//! ```text
//! oldest ─────────────────────────────────────────────── newest
//!  stride 3           stride 2                 stride 1  last 10
//! x  x  x  x  x  x  x x x x x x x x x xxxxxxxxxxxxxxxxxxxxxxxxxx
//! ```
//!
//! Stride changes happen at borders spaced a fifth of the window apart and
//! phased by the buffer offset. The schedule depends only on position in the
//! window, never on geometry.

use crate::config::TrailLength;
use crate::flight::DisplayMode;

/// Divisor for the short trail and for circling.
pub const DEFAULT_TRAIL_SHRINK: usize = 5;

/// The newest positions always drawn at full density.
pub const FULL_DENSITY_TAIL: usize = 10;

/// While circling, cruise points are only drawn within this many newest positions.
pub const CIRCLING_CRUISE_TAIL: usize = 60;

/// Stride at the old end of the window.
const INITIAL_SKIP_LEVEL: usize = 3;

/// Number of trail positions to consider this frame.
pub fn num_trail_max(
    length: TrailLength,
    mode: DisplayMode,
    capacity: usize,
    shrink: usize,
) -> usize {
    let shrink = shrink.max(1);
    let mut n = match length {
        TrailLength::Off => return 0,
        TrailLength::Long | TrailLength::Full => capacity,
        TrailLength::Short => capacity / shrink,
    };
    if mode.is_circling() {
        n /= shrink;
    }
    n
}

/// One accepted sample: its position in the window and its buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampledIndex {
    /// 0 is the oldest considered sample, `num_trail_max - 1` the newest.
    pub position: usize,
    /// Slot in the store.
    pub buffer_index: usize,
}

/// Thinning schedule over the most recent `num_trail_max` slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdaptiveSampler {
    num_trail_max: usize,
    capacity: usize,
    /// Slot of position 0.
    snail_offset: usize,
    /// Phase of the stride borders, follows the buffer so strides stay put
    /// as new samples arrive.
    zero_offset: usize,
}

impl AdaptiveSampler {
    /// Sampler for a trail mode and display mode.
    pub fn new(
        length: TrailLength,
        mode: DisplayMode,
        capacity: usize,
        shrink: usize,
        write_index: usize,
    ) -> Self {
        Self::with_window(
            num_trail_max(length, mode, capacity, shrink),
            capacity,
            write_index,
        )
    }

    /// Sampler for an explicit window size (clamped to capacity).
    pub fn with_window(num_trail_max: usize, capacity: usize, write_index: usize) -> Self {
        let capacity = capacity.max(1);
        let num_trail_max = num_trail_max.min(capacity);
        let snail_offset = (capacity + write_index % capacity - num_trail_max) % capacity;
        Self {
            num_trail_max,
            capacity,
            snail_offset,
            zero_offset: capacity - snail_offset,
        }
    }

    pub fn num_trail_max(&self) -> usize {
        self.num_trail_max
    }

    /// Slot of the oldest considered sample.
    pub fn snail_offset(&self) -> usize {
        self.snail_offset
    }

    /// Whether `position` is among the newest `tail` positions.
    #[inline]
    pub fn is_recent(&self, position: usize, tail: usize) -> bool {
        position + tail >= self.num_trail_max
    }

    /// Accepted samples, oldest first.
    pub fn iter(&self) -> SampleIter {
        let skip_divisor = self.num_trail_max / 5;
        SampleIter {
            sampler: *self,
            i: 0,
            skip_level: INITIAL_SKIP_LEVEL,
            skip_divisor,
            skip_border: skip_divisor + self.zero_offset % INITIAL_SKIP_LEVEL,
            index_skip: 0,
        }
    }

    fn sampled(&self, position: usize) -> SampledIndex {
        SampledIndex {
            position,
            buffer_index: (self.snail_offset + position) % self.capacity,
        }
    }
}

/// Iterator over the thinning schedule.
#[derive(Debug, Clone)]
pub struct SampleIter {
    sampler: AdaptiveSampler,
    i: usize,
    skip_level: usize,
    skip_divisor: usize,
    skip_border: usize,
    index_skip: usize,
}

impl Iterator for SampleIter {
    type Item = SampledIndex;

    fn next(&mut self) -> Option<SampledIndex> {
        let n = self.sampler.num_trail_max;
        while self.i < n {
            let i = self.i;
            self.i += 1;

            // The oldest position anchors the window
            if i == 0 {
                self.index_skip = 0;
                return Some(self.sampler.sampled(0));
            }

            if i >= self.skip_border {
                self.skip_level = self.skip_level.saturating_sub(1).max(1);
                self.skip_border =
                    i + 2 * (self.sampler.zero_offset % self.skip_level) + self.skip_divisor;
            }

            self.index_skip += 1;
            if !self.sampler.is_recent(i, FULL_DENSITY_TAIL) && self.index_skip < self.skip_level {
                continue;
            }
            self.index_skip = 0;
            return Some(self.sampler.sampled(i));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn positions(sampler: &AdaptiveSampler) -> Vec<usize> {
        sampler.iter().map(|s| s.position).collect()
    }

    #[test]
    fn test_num_trail_max_modes() {
        let cruise = DisplayMode::Cruise;
        let circling = DisplayMode::Circling;

        assert_eq!(num_trail_max(TrailLength::Off, cruise, 1000, 5), 0);
        assert_eq!(num_trail_max(TrailLength::Long, cruise, 1000, 5), 1000);
        assert_eq!(num_trail_max(TrailLength::Full, cruise, 1000, 5), 1000);
        assert_eq!(num_trail_max(TrailLength::Short, cruise, 1000, 5), 200);
        assert_eq!(num_trail_max(TrailLength::Long, circling, 1000, 5), 200);
        assert_eq!(num_trail_max(TrailLength::Short, circling, 1000, 5), 40);
    }

    #[test]
    fn test_offset_points_at_oldest_sample() {
        // 1500 samples into a 1000 slot buffer: write index is 500
        let sampler = AdaptiveSampler::with_window(1000, 1000, 500);
        assert_eq!(sampler.snail_offset(), 500);

        let first = sampler.iter().next().unwrap();
        assert_eq!(first, SampledIndex { position: 0, buffer_index: 500 });

        let last = sampler.iter().last().unwrap();
        assert_eq!(last.position, 999);
        assert_eq!(last.buffer_index, 499);
    }

    #[test]
    fn test_short_window_offset() {
        let sampler = AdaptiveSampler::with_window(200, 1000, 50);
        // Oldest considered slot wraps behind zero
        assert_eq!(sampler.snail_offset(), 850);
        assert_eq!(sampler.iter().last().unwrap().buffer_index, 49);
    }

    #[test]
    fn test_window_clamped_to_capacity() {
        let sampler = AdaptiveSampler::with_window(5000, 100, 0);
        assert_eq!(sampler.num_trail_max(), 100);
    }

    #[test]
    fn test_empty_window() {
        let sampler = AdaptiveSampler::new(TrailLength::Off, DisplayMode::Cruise, 1000, 5, 17);
        assert_eq!(sampler.iter().count(), 0);
    }

    #[test]
    fn test_small_window_fully_dense() {
        let sampler = AdaptiveSampler::with_window(8, 100, 40);
        assert_eq!(positions(&sampler), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_old_end_is_thinned() {
        let sampler = AdaptiveSampler::with_window(1000, 1000, 0);
        let accepted = positions(&sampler);

        let old = accepted.iter().filter(|&&p| p < 200).count();
        let recent = accepted.iter().filter(|&&p| p >= 800).count();
        assert!(old <= 200 / 3 + 1, "old fifth should be at stride 3, got {}", old);
        assert!(recent >= 190, "recent fifth should be near full density, got {}", recent);
        assert!(accepted.len() < 1000);
    }

    #[test]
    fn test_is_recent() {
        let sampler = AdaptiveSampler::with_window(100, 100, 0);
        assert!(sampler.is_recent(90, 10));
        assert!(!sampler.is_recent(89, 10));
        assert!(sampler.is_recent(40, 60));
        assert!(!sampler.is_recent(39, 60));
    }

    proptest! {
        /// Newest positions are always kept and strides never grow toward the present
        #[test]
        fn prop_density_bias(
            n in 1usize..1500,
            capacity_extra in 0usize..500,
            write_index in 0usize..2000
        ) {
            let capacity = n + capacity_extra;
            let sampler = AdaptiveSampler::with_window(n, capacity, write_index % capacity);
            let accepted = positions(&sampler);

            prop_assert_eq!(accepted.first().copied(), Some(0));
            for p in n.saturating_sub(FULL_DENSITY_TAIL)..n {
                prop_assert!(accepted.contains(&p), "position {} missing", p);
            }

            let strides: Vec<usize> = accepted.windows(2).map(|w| w[1] - w[0]).collect();
            for pair in strides.windows(2) {
                prop_assert!(pair[0] >= pair[1], "strides grew toward present: {:?}", strides);
            }
            prop_assert!(strides.iter().all(|&s| (1..=INITIAL_SKIP_LEVEL).contains(&s)));
        }

        /// Buffer slots follow positions modulo capacity
        #[test]
        fn prop_buffer_index_tracks_position(
            n in 1usize..500,
            write_index in 0usize..500
        ) {
            let capacity = 500;
            let sampler = AdaptiveSampler::with_window(n, capacity, write_index);
            for s in sampler.iter() {
                prop_assert_eq!(
                    s.buffer_index,
                    (capacity + write_index + s.position - n) % capacity
                );
            }
        }
    }
}
