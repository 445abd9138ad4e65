//! Synthetic glider flight for replay.
//!
//! The flight rolls on the ground briefly, then alternates straight cruise
//! legs with thermal climbs. Thermals drift downwind, so circling segments of
//! the trail smear unless drift compensation is on.

use snailtrail::flight::FlightSample;
use snailtrail::geo::{find_lat_lon, GeoPoint, WindVector};

/// Seconds on the ground before takeoff.
const GROUND_SECS: f64 = 10.0;

/// Duration of one full thermal circle.
const CIRCLE_SECS: f64 = 30.0;

/// Lowest altitude above ground the simulation descends to.
const MIN_AGL_M: f64 = 150.0;

/// Shape of the synthetic flight.
#[derive(Debug, Clone, Copy)]
pub struct FlightPlan {
    pub start: GeoPoint,
    pub wind: WindVector,
    /// Ground track of the cruise legs, degrees.
    pub track_deg: f64,
    /// Air speed on cruise legs, m/s.
    pub cruise_speed_ms: f64,
    pub cruise_secs: f64,
    pub climb_secs: f64,
    pub thermal_radius_m: f64,
    /// Average climb in thermals, m/s.
    pub climb_rate_ms: f64,
    /// Total flight time including the ground roll, seconds.
    pub duration_secs: f64,
}

impl Default for FlightPlan {
    fn default() -> Self {
        Self {
            start: GeoPoint::new(46.5, 7.5),
            wind: WindVector::new(270.0, 5.0),
            track_deg: 60.0,
            cruise_speed_ms: 30.0,
            cruise_secs: 300.0,
            climb_secs: 240.0,
            thermal_radius_m: 120.0,
            climb_rate_ms: 2.0,
            duration_secs: 1800.0,
        }
    }
}

/// Iterator of one-second fixes along a [`FlightPlan`].
#[derive(Debug, Clone)]
pub struct SyntheticFlight {
    plan: FlightPlan,
    time: f64,
    position: GeoPoint,
    altitude_agl: f64,
    thermal_centre: Option<GeoPoint>,
    circle_angle: f64,
}

impl SyntheticFlight {
    pub fn new(plan: FlightPlan) -> Self {
        Self {
            plan,
            time: 0.0,
            position: plan.start,
            altitude_agl: 600.0,
            thermal_centre: None,
            circle_angle: 0.0,
        }
    }

    fn drift_downwind(&self, p: GeoPoint) -> GeoPoint {
        find_lat_lon(p, self.plan.wind.bearing_deg + 180.0, self.plan.wind.speed_ms)
    }

    fn cruise_step(&mut self) -> (f64, f64) {
        self.thermal_centre = None;
        let moved = find_lat_lon(self.position, self.plan.track_deg, self.plan.cruise_speed_ms);
        self.position = self.drift_downwind(moved);
        let vario = -1.2 + 0.8 * (self.time / 20.0).sin();
        (vario, self.plan.track_deg)
    }

    fn circle_step(&mut self) -> (f64, f64) {
        let centre = match self.thermal_centre {
            Some(centre) => self.drift_downwind(centre),
            None => {
                // Enter the circle on its edge, turning right
                self.circle_angle = self.plan.track_deg - 90.0;
                find_lat_lon(self.position, self.plan.track_deg + 90.0, self.plan.thermal_radius_m)
            }
        };
        self.thermal_centre = Some(centre);

        self.circle_angle = (self.circle_angle + 360.0 / CIRCLE_SECS).rem_euclid(360.0);
        self.position = find_lat_lon(centre, self.circle_angle, self.plan.thermal_radius_m);
        let vario = self.plan.climb_rate_ms + 0.8 * self.circle_angle.to_radians().sin();
        (vario, (self.circle_angle + 90.0).rem_euclid(360.0))
    }
}

impl Iterator for SyntheticFlight {
    type Item = FlightSample;

    fn next(&mut self) -> Option<FlightSample> {
        if self.time >= self.plan.duration_secs {
            return None;
        }
        let time = self.time;
        self.time += 1.0;

        if time < GROUND_SECS {
            return Some(FlightSample {
                time,
                position: self.position,
                heading_deg: self.plan.track_deg,
                netto_vario: 0.0,
                circling: false,
                altitude_agl: Some(0.0),
                flying: false,
            });
        }

        let cycle = self.plan.cruise_secs + self.plan.climb_secs;
        let circling = cycle > 0.0 && (time - GROUND_SECS) % cycle >= self.plan.cruise_secs;
        let (vario, heading_deg) = if circling {
            self.circle_step()
        } else {
            self.cruise_step()
        };
        self.altitude_agl = (self.altitude_agl + vario).max(MIN_AGL_M);

        Some(FlightSample {
            time,
            position: self.position,
            heading_deg,
            netto_vario: vario,
            circling,
            altitude_agl: Some(self.altitude_agl),
            flying: true,
        })
    }
}
