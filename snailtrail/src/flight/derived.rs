//! Derived flight state the trail engine reads, and its flight reset.
//!
//! Circling detection and thermal statistics are computed elsewhere; this
//! module only owns the values and knows how to clear them when a new flight
//! starts (full reset) or when persisted values are reloaded (partial reset).

use crate::geo::{GeoPoint, WindVector};

/// Glide ratio value meaning "not available".
pub const INVALID_GR: f64 = 999.0;

/// Number of terrain sweeps in the glide footprint.
pub const NUM_TERRAIN_SWEEPS: usize = 20;

/// Size of the climb rate history histogram.
pub const CLIMB_HISTORY_SIZE: usize = 200;

/// Glide ratio statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct VarioInfo {
    pub cruise_ld: f64,
    pub average_ld: f64,
    pub ld: f64,
    pub ld_vario: f64,
}

impl Default for VarioInfo {
    fn default() -> Self {
        Self {
            cruise_ld: INVALID_GR,
            average_ld: INVALID_GR,
            ld: INVALID_GR,
            ld_vario: INVALID_GR,
        }
    }
}

/// Thermal climb statistics, m/s and metres.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClimbInfo {
    pub last_thermal_average: f64,
    pub last_thermal_average_smooth: f64,
    pub thermal_gain: f64,
    pub thermal_average: f64,
}

impl ClimbInfo {
    /// Reset the values that must not survive a reload.
    fn clear_partial(&mut self) {
        self.last_thermal_average = 0.0;
        self.last_thermal_average_smooth = 0.0;
        self.thermal_gain = 0.0;
    }
}

/// Circling statistics. Start times are `-1` until known.
#[derive(Debug, Clone, PartialEq)]
pub struct CirclingInfo {
    pub circling: bool,
    pub time_cruising: f64,
    pub time_circling: f64,
    pub total_height_climb: f64,
    pub cruise_start_time: f64,
    pub climb_start_time: f64,
    pub min_altitude: f64,
    pub max_height_gain: f64,
}

impl Default for CirclingInfo {
    fn default() -> Self {
        Self {
            circling: false,
            time_cruising: 0.0,
            time_circling: 0.0,
            total_height_climb: 0.0,
            cruise_start_time: -1.0,
            climb_start_time: -1.0,
            min_altitude: 0.0,
            max_height_gain: 0.0,
        }
    }
}

/// Terrain clearance information.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainInfo {
    pub glide_footprint: [GeoPoint; NUM_TERRAIN_SWEEPS + 1],
    pub terrain_warning: bool,
    pub altitude_agl: f64,
}

impl Default for TerrainInfo {
    fn default() -> Self {
        Self {
            glide_footprint: [GeoPoint::default(); NUM_TERRAIN_SWEEPS + 1],
            terrain_warning: false,
            altitude_agl: 0.0,
        }
    }
}

/// Average climb rate per altitude band.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimbHistory {
    pub average_climb_rate: [f64; CLIMB_HISTORY_SIZE],
    pub samples: [u32; CLIMB_HISTORY_SIZE],
}

impl Default for ClimbHistory {
    fn default() -> Self {
        Self {
            average_climb_rate: [0.0; CLIMB_HISTORY_SIZE],
            samples: [0; CLIMB_HISTORY_SIZE],
        }
    }
}

/// Derived flight state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedInfo {
    pub vario: VarioInfo,
    pub climb: ClimbInfo,
    pub circling: CirclingInfo,
    pub terrain: TerrainInfo,
    pub climb_history: ClimbHistory,
    /// Estimated wind.
    pub wind: WindVector,
    /// Flight-elapsed time of takeoff, seconds.
    pub takeoff_time: f64,
    /// Located thermal centre, if any.
    pub thermal_estimate: Option<GeoPoint>,
    /// Climb rate per height band of the current thermal.
    pub thermal_band: Vec<f64>,
}

impl DerivedInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new flight.
    ///
    /// A full reset clears everything statistical. A partial reset keeps
    /// the flight totals and clears only the values that must not be
    /// carried over from persisted state.
    pub fn reset_flight(&mut self, full: bool) {
        if full {
            self.vario = VarioInfo::default();
            self.climb = ClimbInfo::default();
            self.circling = CirclingInfo::default();
            self.climb_history = ClimbHistory::default();
        } else {
            self.climb.clear_partial();
            self.circling.circling = false;
        }

        self.thermal_band.clear();
        self.thermal_estimate = None;
        self.terrain = TerrainInfo::default();
    }
}
