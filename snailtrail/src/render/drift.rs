//! Wind drift compensation for the trail while circling.
//!
//! In a thermal the air mass, and the glider with it, moves downwind. Old
//! trail points are shifted downwind by the time since capture so the drawn
//! circles stay centred on the thermal instead of smearing upwind.
//!
//! # Model
//!
//! ```text
//! reference  = current position moved upwind by wind speed × 60 s
//! drift/sec  = (position - reference) / 60
//! dt         = max(0, (now - point.time) × point.drift_factor)
//! drawn      = point + drift/sec × dt
//! ```

use crate::flight::FlightSnapshot;
use crate::geo::{find_lat_lon, GeoBounds, GeoPoint, WindVector};
use crate::trail::SnailPoint;

/// Reference duration for the drift measurement, seconds.
pub const DRIFT_REFERENCE_SECS: f64 = 60.0;

/// Per-frame drift parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriftCompensator {
    /// Latitude drift per second, degrees.
    drift_lat: f64,
    /// Longitude drift per second, degrees.
    drift_lon: f64,
}

impl DriftCompensator {
    /// No drift at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Measure the drift for the given wind at `position`.
    ///
    /// Drift only applies while circling with the drift feature enabled.
    pub fn new(position: GeoPoint, wind: WindVector, circling: bool, enabled: bool) -> Self {
        if !(enabled && circling) || wind.speed_ms <= 0.0 {
            return Self::none();
        }

        let reference = find_lat_lon(
            position,
            wind.bearing_deg,
            wind.speed_ms * DRIFT_REFERENCE_SECS,
        );
        Self {
            drift_lat: (position.latitude - reference.latitude) / DRIFT_REFERENCE_SECS,
            drift_lon: (position.longitude - reference.longitude) / DRIFT_REFERENCE_SECS,
        }
    }

    /// Drift for this frame's flight snapshot.
    pub fn from_snapshot(snapshot: &FlightSnapshot, enabled: bool) -> Self {
        Self::new(
            snapshot.position,
            snapshot.wind,
            snapshot.display_mode.is_circling(),
            enabled,
        )
    }

    pub fn is_active(&self) -> bool {
        self.drift_lat != 0.0 || self.drift_lon != 0.0
    }

    /// Per-second drift `(lat, lon)` in degrees.
    pub fn per_second(&self) -> (f64, f64) {
        (self.drift_lat, self.drift_lon)
    }

    /// Grow `bounds` by one reference duration of drift on every side.
    ///
    /// Visibility is tested on recorded positions, so a point just outside
    /// the view may drift into it.
    pub fn expand_bounds(&self, bounds: &GeoBounds) -> GeoBounds {
        bounds.expanded(
            DRIFT_REFERENCE_SECS * self.drift_lat,
            DRIFT_REFERENCE_SECS * self.drift_lon,
        )
    }

    /// Effective drift time of a point, seconds.
    #[inline]
    pub fn elapsed(&self, now: f64, point: &SnailPoint) -> f64 {
        ((now - point.time) * point.drift_factor).max(0.0)
    }

    /// Drift-compensated position of a point.
    #[inline]
    pub fn apply(&self, now: f64, point: &SnailPoint) -> GeoPoint {
        if !self.is_active() {
            return point.position();
        }
        let dt = self.elapsed(now, point);
        point
            .position()
            .offset(self.drift_lat * dt, self.drift_lon * dt)
    }
}
