//! A single recorded trail sample.

use crate::geo::GeoPoint;
use crate::render::{ScreenPoint, SnailColour};

/// Time value of a slot that has never been written.
pub const INVALID_TIME: f64 = -1.0;

/// One sample of the snail trail.
///
/// Geographic fields are written once by the producer. `colour` and `screen`
/// are render caches: the renderer may overwrite them while building a frame
/// and nothing may rely on them being fresh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnailPoint {
    /// Flight-elapsed seconds, or [`INVALID_TIME`] for an unwritten slot.
    pub time: f64,
    /// Recorded longitude in degrees (before drift compensation).
    pub longitude: f64,
    /// Recorded latitude in degrees (before drift compensation).
    pub latitude: f64,
    /// Climb rate at capture, m/s.
    pub vario: f64,
    /// Whether the aircraft was circling when the point was captured.
    pub circling: bool,
    /// Coarse culling hint, checked before any projection work.
    pub far_visible: bool,
    /// How much of the wind drift applies to this point, 0..=1.
    pub drift_factor: f64,
    /// Cached colour bucket.
    pub colour: Option<SnailColour>,
    /// Cached screen position from the last render pass.
    pub screen: Option<ScreenPoint>,
}

impl Default for SnailPoint {
    fn default() -> Self {
        Self {
            time: INVALID_TIME,
            longitude: 0.0,
            latitude: 0.0,
            vario: 0.0,
            circling: false,
            far_visible: false,
            drift_factor: 0.0,
            colour: None,
            screen: None,
        }
    }
}

impl SnailPoint {
    /// Create a freshly captured point with empty caches.
    pub fn new(time: f64, position: GeoPoint, vario: f64, circling: bool) -> Self {
        Self {
            time,
            longitude: position.longitude,
            latitude: position.latitude,
            vario,
            circling,
            far_visible: true,
            drift_factor: 1.0,
            colour: None,
            screen: None,
        }
    }

    /// Set the drift factor, clamped to 0..=1.
    pub fn with_drift_factor(mut self, drift_factor: f64) -> Self {
        self.drift_factor = drift_factor.clamp(0.0, 1.0);
        self
    }

    /// Whether this slot holds a real sample.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.time >= 0.0
    }

    /// Recorded position.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_point_is_invalid() {
        let p = SnailPoint::default();
        assert!(!p.is_valid());
        assert_eq!(p.time, INVALID_TIME);
        assert!(!p.far_visible);
        assert!(p.colour.is_none());
    }

    #[test]
    fn test_new_point_is_valid_and_visible() {
        let p = SnailPoint::new(0.0, GeoPoint::new(46.0, 7.0), 1.2, true);
        assert!(p.is_valid());
        assert!(p.far_visible);
        assert!(p.circling);
        assert_eq!(p.position(), GeoPoint::new(46.0, 7.0));
        assert_eq!(p.drift_factor, 1.0);
    }

    #[test]
    fn test_drift_factor_clamped() {
        let p = SnailPoint::new(1.0, GeoPoint::default(), 0.0, false).with_drift_factor(3.0);
        assert_eq!(p.drift_factor, 1.0);
        let p = p.with_drift_factor(-0.5);
        assert_eq!(p.drift_factor, 0.0);
    }
}
