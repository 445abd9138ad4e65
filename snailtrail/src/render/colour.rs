//! Climb-rate colour buckets.
//!
//! Climb and sink are normalised against different bounds derived from the
//! MacCready setting, then mapped linearly onto the snail palette:
//!
//! | vario | normalised by |
//! |-------|---------------|
//! | ≥ 0   | `1.5 × clamp(MC, 0.5, 5.0)` |
//! | < 0   | `1.5 × clamp(MC, 2.0, 5.0)` |
//!
//! The sink bound never drops below 3 m/s, so weak sink near zero keeps a
//! distinct shade from real sink.

use super::canvas::{SnailColour, NUM_SNAIL_COLOURS};

/// Manhattan distance (unscaled pixels) under which a point merges into the
/// previously drawn one.
pub const DEFAULT_MERGE_DISTANCE: i32 = 4;

/// Asymmetric vario normalisation bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarioScale {
    max: f64,
    min: f64,
}

impl VarioScale {
    pub fn from_mac_cready(mac_cready: f64) -> Self {
        Self {
            max: 1.5 * mac_cready.clamp(0.5, 5.0),
            min: -1.5 * mac_cready.clamp(2.0, 5.0),
        }
    }

    /// Climb rate mapped to +1.
    pub fn vario_max(&self) -> f64 {
        self.max
    }

    /// Sink rate mapped to -1 (negative).
    pub fn vario_min(&self) -> f64 {
        self.min
    }

    /// Normalise a climb rate; ±1 at the bounds, unclamped beyond.
    pub fn normalize(&self, vario: f64) -> f64 {
        if vario < 0.0 {
            vario / -self.min
        } else {
            vario / self.max
        }
    }

    /// Palette bucket for a climb rate.
    pub fn colour(&self, vario: f64) -> SnailColour {
        colour_bucket(self.normalize(vario))
    }
}

/// Map a normalised value in [-1, 1] onto the palette, clamping outliers.
pub fn colour_bucket(normalized: f64) -> SnailColour {
    let bucket = ((normalized + 1.0) / 2.0 * NUM_SNAIL_COLOURS as f64) as i64;
    SnailColour::new(bucket.clamp(0, NUM_SNAIL_COLOURS as i64 - 1) as usize)
}

/// Running sum of climb rates of points merged away since the last drawn point.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarioAverager {
    sum: f64,
    count: u32,
}

impl VarioAverager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate the vario of a merged point.
    pub fn add(&mut self, vario: f64) {
        self.sum += vario;
        self.count += 1;
    }

    pub fn is_pending(&self) -> bool {
        self.count > 0
    }

    /// Blend `vario` with everything accumulated, then reset.
    ///
    /// Weighted over the merged points plus the drawn one.
    pub fn take_blended(&mut self, vario: f64) -> f64 {
        if self.count == 0 {
            return vario;
        }
        let blended = (vario + self.sum) / (self.count as f64 + 1.0);
        *self = Self::default();
        blended
    }
}
