//! Flight-state blackboard and the snapshot handed to the renderer.

use super::derived::DerivedInfo;
use super::mode::DisplayMode;
use crate::geo::{GeoPoint, WindVector};

/// Default MacCready setting, m/s.
pub const DEFAULT_MACCREADY: f64 = 1.0;

/// One fix as delivered by the flight-data producer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSample {
    /// Flight-elapsed seconds.
    pub time: f64,
    /// Aircraft position.
    pub position: GeoPoint,
    /// Ground track, degrees true.
    pub heading_deg: f64,
    /// Netto climb rate, m/s.
    pub netto_vario: f64,
    /// Circling detector output.
    pub circling: bool,
    /// Altitude above terrain, metres, when terrain data is available.
    pub altitude_agl: Option<f64>,
    /// Whether the aircraft is airborne.
    pub flying: bool,
}

/// Current flight state shared between producer and renderer.
#[derive(Debug, Clone)]
pub struct FlightState {
    /// Flight-elapsed seconds of the latest fix.
    pub time: f64,
    pub position: GeoPoint,
    pub heading_deg: f64,
    /// Pilot MacCready setting, m/s.
    pub mac_cready: f64,
    pub derived: DerivedInfo,
}

impl Default for FlightState {
    fn default() -> Self {
        Self {
            time: 0.0,
            position: GeoPoint::default(),
            heading_deg: 0.0,
            mac_cready: DEFAULT_MACCREADY,
            derived: DerivedInfo::default(),
        }
    }
}

impl FlightState {
    /// Fold a new fix into the blackboard.
    pub fn apply_sample(&mut self, sample: &FlightSample) {
        self.time = sample.time;
        self.position = sample.position;
        self.heading_deg = sample.heading_deg;
        self.derived.circling.circling = sample.circling;
        if let Some(agl) = sample.altitude_agl {
            self.derived.terrain.altitude_agl = agl;
        }
    }

    pub fn display_mode(&self) -> DisplayMode {
        DisplayMode::from_circling(self.derived.circling.circling)
    }

    /// Copy out the slice of state a render pass reads.
    pub fn snapshot(&self) -> FlightSnapshot {
        FlightSnapshot {
            time: self.time,
            position: self.position,
            heading_deg: self.heading_deg,
            wind: self.derived.wind,
            mac_cready: self.mac_cready,
            takeoff_time: self.derived.takeoff_time,
            display_mode: self.display_mode(),
        }
    }
}

/// Read-only view of the flight state for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSnapshot {
    pub time: f64,
    pub position: GeoPoint,
    pub heading_deg: f64,
    pub wind: WindVector,
    pub mac_cready: f64,
    pub takeoff_time: f64,
    pub display_mode: DisplayMode,
}

impl Default for FlightSnapshot {
    fn default() -> Self {
        FlightState::default().snapshot()
    }
}
