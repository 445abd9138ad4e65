//! Flight state shared between the sample producer and the renderer.

mod computer;
mod derived;
mod mode;
mod state;

pub use computer::{FlightComputer, SharedFlightComputer};
pub use derived::{
    CirclingInfo, ClimbHistory, ClimbInfo, DerivedInfo, TerrainInfo, VarioInfo,
    CLIMB_HISTORY_SIZE, INVALID_GR, NUM_TERRAIN_SWEEPS,
};
pub use mode::{DisplayMode, DisplayModeTracker};
pub use state::{FlightSample, FlightSnapshot, FlightState, DEFAULT_MACCREADY};
