//! Per-map-view trail drawing.
//!
//! A `MapTrailView` owns the trail renderer's mode and colour state and the
//! overlay's scratch buffer for one map window. The far-visibility flags live
//! in the shared store together with the bounds they were computed for, so
//! several views over one flight each get flags matching their own frame.

use serde::Serialize;
use tracing::debug;

use super::canvas::{Canvas, ClipRect};
use super::contest::ContestOverlay;
use super::drift::DriftCompensator;
use super::projection::{MapFrame, Projection};
use super::trail::{TrailFrameStats, TrailRenderer};
use crate::config::{TrailConfig, TrailLength};
use crate::flight::{FlightComputer, FlightSnapshot, SharedFlightComputer};
use crate::geo::GeoBounds;

/// What one frame drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FrameReport {
    /// Earliest drawn trail time, `None` when nothing was drawn.
    pub trail_start: Option<f64>,
    pub trail: TrailFrameStats,
    /// Vertices of the contest overlay polyline (0 when not drawn).
    pub overlay_points: usize,
}

/// Trail drawing for one map view.
#[derive(Debug)]
pub struct MapTrailView {
    trail: TrailRenderer,
    overlay: ContestOverlay,
    far_margin: f64,
    report: FrameReport,
}

impl MapTrailView {
    pub fn new(config: &TrailConfig) -> Self {
        Self {
            trail: TrailRenderer::new(config),
            overlay: ContestOverlay::new(config.max_overlay_points),
            far_margin: config.far_margin,
            report: FrameReport::default(),
        }
    }

    pub fn set_length(&mut self, length: TrailLength) {
        self.trail.set_length(length);
    }

    pub fn renderer(&self) -> &TrailRenderer {
        &self.trail
    }

    /// Report of the last drawn frame.
    pub fn last_report(&self) -> &FrameReport {
        &self.report
    }

    /// Draw the trail and overlay under one acquisition of the shared lock.
    ///
    /// Returns the earliest drawn trail time.
    pub fn draw<C: Canvas + ?Sized>(
        &mut self,
        shared: &SharedFlightComputer,
        frame: &MapFrame,
        canvas: &mut C,
        clip: &ClipRect,
    ) -> Option<f64> {
        let mut computer = shared.lock();
        self.draw_locked(&mut computer, frame, canvas, clip)
    }

    /// Coarse culling area for `frame`: the screen grown by the far margin,
    /// then by the drift of one reference duration.
    pub fn far_bounds(&self, frame: &MapFrame, snapshot: &FlightSnapshot) -> GeoBounds {
        let drift = DriftCompensator::from_snapshot(snapshot, self.trail.drift_enabled());
        drift.expand_bounds(&frame.screen_bounds.scaled(self.far_margin))
    }

    /// Draw with the flight computer already locked by the caller.
    pub fn draw_locked<C: Canvas + ?Sized>(
        &mut self,
        computer: &mut FlightComputer,
        frame: &MapFrame,
        canvas: &mut C,
        clip: &ClipRect,
    ) -> Option<f64> {
        let snapshot = computer.snapshot();

        let far = self.far_bounds(frame, &snapshot);
        if computer.store_mut().refresh_visibility(&far) {
            debug!(
                min_lat = far.min_lat,
                max_lat = far.max_lat,
                min_lon = far.min_lon,
                max_lon = far.max_lon,
                "Far visibility bounds changed"
            );
        }

        let (store, contest) = computer.render_parts();
        let trail_start = self.trail.render(store, &snapshot, frame, canvas, clip);

        let projection = Projection::new(frame);
        let overlay_points = self.overlay.render(
            contest,
            self.trail.length(),
            &snapshot,
            trail_start,
            &projection,
            canvas,
            clip,
        );

        self.report = FrameReport {
            trail_start,
            trail: *self.trail.last_stats(),
            overlay_points,
        };
        trail_start
    }
}
