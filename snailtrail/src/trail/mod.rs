//! Trail storage and recording.
//!
//! ```text
//! FlightSample ──► TrailRecorder ──► SnailPointStore ──► render pipeline
//!  (producer)        (rate limit,       (fixed-size
//!                     drift factor)      ring buffer)
//! ```

mod point;
mod recorder;
mod store;

pub use point::{SnailPoint, INVALID_TIME};
pub use recorder::{drift_factor, TrailRecorder, DEFAULT_SAMPLE_INTERVAL_SECS};
pub use store::{SnailPointStore, DEFAULT_TRAIL_CAPACITY};
