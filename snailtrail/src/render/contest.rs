//! Contest path overlay.
//!
//! With the full trail shown in cruise, the optimised contest path is drawn
//! over the part of the flight the trail covers. Contest times count from
//! takeoff while trail times count from flight start, so the trail start time
//! is shifted by the takeoff time before filtering.

use super::canvas::{Canvas, ClipRect, ScreenPoint, SnailColour};
use super::projection::Projection;
use crate::config::TrailLength;
use crate::contest::ContestPath;
use crate::flight::FlightSnapshot;

/// Maximum vertices in the overlay polyline.
pub const DEFAULT_MAX_OVERLAY_POINTS: usize = 5000;

/// Draws the contest path as one clipped polyline.
#[derive(Debug, Clone)]
pub struct ContestOverlay {
    max_points: usize,
    points: Vec<ScreenPoint>,
}

impl Default for ContestOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OVERLAY_POINTS)
    }
}

impl ContestOverlay {
    pub fn new(max_points: usize) -> Self {
        Self {
            max_points,
            points: Vec::new(),
        }
    }

    /// Contest-time bound for this frame, if the overlay is drawn at all.
    pub fn time_bound(
        length: TrailLength,
        snapshot: &FlightSnapshot,
        trail_start: Option<f64>,
    ) -> Option<f64> {
        if length != TrailLength::Full || snapshot.display_mode.is_circling() {
            return None;
        }
        trail_start.map(|t| t - snapshot.takeoff_time)
    }

    /// Draw the overlay. Returns the number of vertices drawn.
    ///
    /// Vertices beyond the polygon limit are dropped; fewer than two
    /// collected vertices draw nothing.
    #[allow(clippy::too_many_arguments)]
    pub fn render<C: Canvas + ?Sized>(
        &mut self,
        path: &dyn ContestPath,
        length: TrailLength,
        snapshot: &FlightSnapshot,
        trail_start: Option<f64>,
        projection: &Projection,
        canvas: &mut C,
        clip: &ClipRect,
    ) -> usize {
        let Some(bound) = Self::time_bound(length, snapshot, trail_start) else {
            return 0;
        };

        self.points.clear();
        for index in 0..path.len() {
            if self.points.len() >= self.max_points {
                break;
            }
            let Some(point) = path.point(index) else {
                break;
            };
            if point.time >= bound {
                self.points.push(projection.project(point.position()));
            }
        }

        if self.points.len() < 2 {
            return 0;
        }
        canvas.select_pen(SnailColour::MIDDLE);
        canvas.clipped_polyline(&self.points, clip);
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contest::{ContestPoint, RecordedContestPath};
    use crate::flight::DisplayMode;
    use crate::geo::{GeoBounds, GeoPoint};
    use crate::render::canvas::{CanvasOp, RecordingCanvas};
    use crate::render::projection::MapFrame;

    fn projection() -> Projection {
        Projection::new(&MapFrame {
            pan: GeoPoint::new(46.0, 7.0),
            origin: ScreenPoint::new(160, 120),
            aircraft: ScreenPoint::new(160, 120),
            display_angle_deg: 0.0,
            scale: 10_000.0,
            screen_bounds: GeoBounds::new(45.9, 46.1, 6.9, 7.1),
        })
    }

    fn snapshot(takeoff: f64, mode: DisplayMode) -> FlightSnapshot {
        FlightSnapshot {
            takeoff_time: takeoff,
            display_mode: mode,
            ..Default::default()
        }
    }

    fn path(times: impl IntoIterator<Item = f64>) -> RecordedContestPath {
        times
            .into_iter()
            .map(|t| ContestPoint::new(t, GeoPoint::new(46.0 + t * 1e-4, 7.0)))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_only_full_trail_in_cruise() {
        let snap = snapshot(0.0, DisplayMode::Cruise);
        assert_eq!(ContestOverlay::time_bound(TrailLength::Full, &snap, Some(10.0)), Some(10.0));
        assert_eq!(ContestOverlay::time_bound(TrailLength::Long, &snap, Some(10.0)), None);
        assert_eq!(ContestOverlay::time_bound(TrailLength::Full, &snap, None), None);

        let circling = snapshot(0.0, DisplayMode::Circling);
        assert_eq!(ContestOverlay::time_bound(TrailLength::Full, &circling, Some(10.0)), None);
    }

    #[test]
    fn test_bound_shifted_by_takeoff() {
        let path = path((0..10).map(|i| i as f64 * 100.0));
        let mut canvas = RecordingCanvas::new();
        let mut overlay = ContestOverlay::default();

        // Trail starts 700 s into the flight, takeoff was at 300 s
        let drawn = overlay.render(
            &path,
            TrailLength::Full,
            &snapshot(300.0, DisplayMode::Cruise),
            Some(700.0),
            &projection(),
            &mut canvas,
            &ClipRect::from_size(320, 240),
        );
        // Contest times 400..=900
        assert_eq!(drawn, 6);
        assert_eq!(canvas.ops()[0], CanvasOp::SelectPen(SnailColour::MIDDLE));
        assert_eq!(canvas.polylines()[0].len(), 6);
    }

    #[test]
    fn test_single_point_draws_nothing() {
        let path = path([0.0, 100.0, 200.0]);
        let mut canvas = RecordingCanvas::new();
        let mut overlay = ContestOverlay::default();

        let drawn = overlay.render(
            &path,
            TrailLength::Full,
            &snapshot(0.0, DisplayMode::Cruise),
            Some(150.0),
            &projection(),
            &mut canvas,
            &ClipRect::from_size(320, 240),
        );
        assert_eq!(drawn, 0);
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_empty_path_draws_nothing() {
        let mut canvas = RecordingCanvas::new();
        let mut overlay = ContestOverlay::default();
        let drawn = overlay.render(
            &RecordedContestPath::new(),
            TrailLength::Full,
            &snapshot(0.0, DisplayMode::Cruise),
            Some(0.0),
            &projection(),
            &mut canvas,
            &ClipRect::from_size(320, 240),
        );
        assert_eq!(drawn, 0);
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_overflow_truncates() {
        let path = path((0..50).map(|i| i as f64));
        let mut canvas = RecordingCanvas::new();
        let mut overlay = ContestOverlay::new(20);

        let drawn = overlay.render(
            &path,
            TrailLength::Full,
            &snapshot(0.0, DisplayMode::Cruise),
            Some(0.0),
            &projection(),
            &mut canvas,
            &ClipRect::from_size(320, 240),
        );
        assert_eq!(drawn, 20);
        assert_eq!(canvas.polylines()[0].len(), 20);
    }
}
