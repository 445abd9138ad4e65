//! Trail rendering pipeline.
//!
//! ```text
//! store ──► AdaptiveSampler    which slots, oldest first
//!       ──► DriftCompensator   shift by wind × age while circling
//!       ──► Projection         geo to rotated screen pixels
//!       ──► VarioScale         climb rate to snail pen
//!       ──► TrailRenderer      merge, move/line, earliest time
//!       ──► ContestOverlay     contest path since trail start
//! ```
//!
//! `MapTrailView` runs the whole pipeline for one frame under a single lock.

mod canvas;
mod clip;
mod colour;
mod contest;
mod drift;
mod pixmap;
mod projection;
mod sampler;
mod trail;
mod view;

pub use canvas::{
    Canvas, CanvasOp, ClipRect, RecordingCanvas, ScreenPoint, SnailColour, NUM_SNAIL_COLOURS,
};
pub use clip::{clip_segment, Segment};
pub use colour::{colour_bucket, VarioAverager, VarioScale, DEFAULT_MERGE_DISTANCE};
pub use contest::{ContestOverlay, DEFAULT_MAX_OVERLAY_POINTS};
pub use drift::{DriftCompensator, DRIFT_REFERENCE_SECS};
pub use pixmap::{PixmapCanvas, SurfaceError, MAP_BACKGROUND};
pub use projection::{fixed_sin_cos, MapFrame, Projection};
pub use sampler::{
    num_trail_max, AdaptiveSampler, SampleIter, SampledIndex, CIRCLING_CRUISE_TAIL,
    DEFAULT_TRAIL_SHRINK, FULL_DENSITY_TAIL,
};
pub use trail::{TrailFrameStats, TrailRenderer};
pub use view::{FrameReport, MapTrailView};
