//! Producer side of the trail: turns flight samples into snail points.

use tracing::trace;

use super::point::SnailPoint;
use super::store::SnailPointStore;
use crate::flight::FlightSample;

/// Default minimum spacing between recorded samples (seconds).
pub const DEFAULT_SAMPLE_INTERVAL_SECS: f64 = 1.0;

/// Altitude scale (metres) of the drift factor ramp.
const DRIFT_AGL_SCALE_M: f64 = 100.0;

/// Records trail points at a bounded rate.
#[derive(Debug, Clone)]
pub struct TrailRecorder {
    min_interval_secs: f64,
    last_recorded: Option<f64>,
}

impl Default for TrailRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_INTERVAL_SECS)
    }
}

impl TrailRecorder {
    pub fn new(min_interval_secs: f64) -> Self {
        Self {
            min_interval_secs: min_interval_secs.max(0.0),
            last_recorded: None,
        }
    }

    /// Record a sample into the store.
    ///
    /// Returns true if a point was appended. Samples taken on the ground, or
    /// sooner than the minimum interval after the previous point, are dropped.
    /// A sample older than the previous point restarts the interval (the
    /// producer replayed or reset the flight clock).
    pub fn record(&mut self, store: &mut SnailPointStore, sample: &FlightSample) -> bool {
        if !sample.flying || sample.time < 0.0 {
            return false;
        }

        if let Some(last) = self.last_recorded {
            let elapsed = sample.time - last;
            if elapsed == 0.0 || (elapsed > 0.0 && elapsed < self.min_interval_secs) {
                return false;
            }
        }

        let point = SnailPoint::new(
            sample.time,
            sample.position,
            sample.netto_vario,
            sample.circling,
        )
        .with_drift_factor(drift_factor(sample.altitude_agl));
        store.append(point);
        self.last_recorded = Some(sample.time);

        trace!(
            time = sample.time,
            circling = sample.circling,
            drift_factor = point.drift_factor,
            "Recorded snail point"
        );
        true
    }

    /// Forget the last recorded time (new flight).
    pub fn reset(&mut self) {
        self.last_recorded = None;
    }
}

/// Drift factor for a point captured at the given altitude above ground.
///
/// Ramps from 0 on the ground towards 1 a few hundred metres up, so trail
/// points near the surface barely drift. Unknown altitude drifts fully.
pub fn drift_factor(altitude_agl: Option<f64>) -> f64 {
    match altitude_agl {
        Some(agl) => {
            let hr = agl.max(0.0) / DRIFT_AGL_SCALE_M;
            2.0 / (1.0 + (-hr).exp()) - 1.0
        }
        None => 1.0,
    }
}
