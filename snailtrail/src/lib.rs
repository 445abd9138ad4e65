//! Snailtrail - flight path recording and rendering for glide computers
//!
//! This library keeps a bounded history of recent aircraft positions and
//! climb rates, and draws it onto a rotated, scaled moving map as a "snail
//! trail": colour-coded by climb, thinned with age, drift-compensated while
//! thermalling.
//!
//! # Modules
//!
//! - [`trail`] - fixed-capacity point store and the sample recorder
//! - [`flight`] - flight state shared between producer and renderer
//! - [`render`] - sampling, projection, colour and the drawing pipeline
//! - [`contest`] - read-only contest path interface
//! - [`config`] - trail settings and INI loading
//! - [`geo`] - coordinates, bounds and great-circle helpers
//!
//! # Example
//!
//! ```ignore
//! let config = TrailConfig::default();
//! let shared = SharedFlightComputer::new(FlightComputer::new(&config));
//!
//! // Producer thread
//! shared.process_sample(&sample);
//!
//! // Render thread, once per frame
//! let mut view = MapTrailView::new(&config);
//! let trail_start = view.draw(&shared, &frame, &mut canvas, &clip);
//! ```

pub mod config;
pub mod contest;
pub mod flight;
pub mod geo;
pub mod render;
pub mod trail;

pub use config::{ConfigError, TrailConfig, TrailLength};
pub use flight::{FlightComputer, FlightSample, SharedFlightComputer};
pub use render::{MapFrame, MapTrailView};
