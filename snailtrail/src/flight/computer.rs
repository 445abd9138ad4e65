//! The flight computer state shared between producer and renderer.
//!
//! # Architecture
//!
//! - `FlightComputer` - owns the trail store, recorder, flight state and the
//!   contest path
//! - `SharedFlightComputer` - cheap-to-clone handle around one coarse lock
//!
//! The producer thread takes the lock for each sample; the renderer takes it
//! once per frame for the trail and the overlay together, so a frame never
//! sees a half-written point.
//!
//! # Example
//!
//! ```ignore
//! let shared = SharedFlightComputer::new(FlightComputer::new(&config));
//!
//! // Producer thread
//! shared.process_sample(&sample);
//!
//! // Render thread
//! let mut computer = shared.lock();
//! let snapshot = computer.snapshot();
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use tracing::info;

use super::state::{FlightSample, FlightSnapshot, FlightState};
use crate::config::TrailConfig;
use crate::contest::{ContestPath, RecordedContestPath};
use crate::geo::WindVector;
use crate::trail::{SnailPoint, SnailPointStore, TrailRecorder};

/// Trail history plus the flight state it is rendered against.
pub struct FlightComputer {
    store: SnailPointStore,
    recorder: TrailRecorder,
    state: FlightState,
    contest: Box<dyn ContestPath>,
    airborne: bool,
}

impl FlightComputer {
    pub fn new(config: &TrailConfig) -> Self {
        Self {
            store: SnailPointStore::new(config.capacity),
            recorder: TrailRecorder::new(config.sample_interval_secs),
            state: FlightState::default(),
            contest: Box::new(RecordedContestPath::new()),
            airborne: false,
        }
    }

    /// Fold a fix into the flight state and record it on the trail.
    ///
    /// The first airborne fix sets the takeoff time. Returns true if a trail
    /// point was appended.
    pub fn process_sample(&mut self, sample: &FlightSample) -> bool {
        if sample.flying && !self.airborne {
            self.airborne = true;
            self.state.derived.takeoff_time = sample.time;
            info!(time = sample.time, "Takeoff detected");
        }
        self.state.apply_sample(sample);
        self.recorder.record(&mut self.store, sample)
    }

    /// Append a ready-made point, bypassing the recorder.
    pub fn append(&mut self, point: SnailPoint) {
        self.store.append(point);
    }

    /// Start a new flight.
    ///
    /// A full reset also drops the trail and the takeoff time; a partial one
    /// only clears derived values that must not be carried over.
    pub fn reset_flight(&mut self, full: bool) {
        self.state.derived.reset_flight(full);
        if full {
            self.store = SnailPointStore::new(self.store.capacity());
            self.recorder.reset();
            self.state.derived.takeoff_time = 0.0;
            self.airborne = false;
        }
        info!(full, "Flight reset");
    }

    pub fn set_wind(&mut self, wind: WindVector) {
        self.state.derived.wind = wind;
    }

    pub fn set_mac_cready(&mut self, mac_cready: f64) {
        self.state.mac_cready = mac_cready.max(0.0);
    }

    pub fn set_takeoff_time(&mut self, time: f64) {
        self.state.derived.takeoff_time = time;
        self.airborne = true;
    }

    /// Replace the contest path (the optimiser publishes whole solutions).
    pub fn set_contest_path(&mut self, path: Box<dyn ContestPath>) {
        self.contest = path;
    }

    pub fn is_airborne(&self) -> bool {
        self.airborne
    }

    pub fn store(&self) -> &SnailPointStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SnailPointStore {
        &mut self.store
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FlightState {
        &mut self.state
    }

    pub fn contest_path(&self) -> &dyn ContestPath {
        self.contest.as_ref()
    }

    pub fn snapshot(&self) -> FlightSnapshot {
        self.state.snapshot()
    }

    /// Split borrow for a render pass: mutable store caches, read-only path.
    pub fn render_parts(&mut self) -> (&mut SnailPointStore, &dyn ContestPath) {
        (&mut self.store, self.contest.as_ref())
    }
}

/// Handle to a flight computer shared across threads.
///
/// Lightweight and cheap to clone.
#[derive(Clone)]
pub struct SharedFlightComputer {
    inner: Arc<Mutex<FlightComputer>>,
}

impl SharedFlightComputer {
    pub fn new(computer: FlightComputer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(computer)),
        }
    }

    /// Lock for the duration of the returned guard.
    pub fn lock(&self) -> MutexGuard<'_, FlightComputer> {
        self.inner.lock()
    }

    /// Producer entry point: process one fix under the lock.
    pub fn process_sample(&self, sample: &FlightSample) -> bool {
        self.inner.lock().process_sample(sample)
    }

    /// Producer entry point: append one point under the lock.
    pub fn append(&self, point: SnailPoint) {
        self.inner.lock().append(point);
    }

    /// Copy of the current render inputs.
    pub fn snapshot(&self) -> FlightSnapshot {
        self.inner.lock().snapshot()
    }
}
