//! Snail trail rendering.
//!
//! One pass per frame, oldest sample to newest:
//!
//! 1. The sampler picks which slots take part (dense recent, sparse old)
//! 2. Mode filters drop stale cruise legs while circling, unwritten slots
//!    and points outside the coarse far-visibility area
//! 3. Points outside the drift-expanded view are dropped unless they
//!    continue a visible run
//! 4. Survivors are drift-compensated and projected; points landing within
//!    a few pixels of the last drawn one are merged into the next colour
//! 5. Visible runs are drawn as connected paths, closed to the aircraft

use serde::Serialize;
use tracing::trace;

use super::canvas::{Canvas, ClipRect, ScreenPoint};
use super::colour::{VarioAverager, VarioScale};
use super::drift::DriftCompensator;
use super::projection::{MapFrame, Projection};
use super::sampler::{AdaptiveSampler, CIRCLING_CRUISE_TAIL};
use crate::config::{TrailConfig, TrailLength};
use crate::flight::{DisplayModeTracker, FlightSnapshot};
use crate::trail::SnailPointStore;

/// Counters from the most recent render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrailFrameStats {
    /// Slots handed out by the sampler.
    pub sampled: usize,
    /// Points that produced a move or line operation.
    pub drawn: usize,
    /// Points merged into a neighbour's colour.
    pub merged: usize,
    /// Earliest drawn sample time.
    pub earliest_time: Option<f64>,
}

/// Renders the trail for one map view.
///
/// Carries the state that must survive between frames: the display mode and
/// vario bounds of the previous frame, which decide whether cached colours
/// are still usable.
#[derive(Debug)]
pub struct TrailRenderer {
    length: TrailLength,
    drift_enabled: bool,
    shrink: usize,
    merge_distance: i32,
    mode_tracker: DisplayModeTracker,
    last_scale: Option<VarioScale>,
    stats: TrailFrameStats,
}

impl TrailRenderer {
    pub fn new(config: &TrailConfig) -> Self {
        Self {
            length: config.length,
            drift_enabled: config.drift_enabled,
            shrink: config.shrink.max(1),
            merge_distance: config.scaled_merge_distance(),
            mode_tracker: DisplayModeTracker::new(),
            last_scale: None,
            stats: TrailFrameStats::default(),
        }
    }

    pub fn length(&self) -> TrailLength {
        self.length
    }

    pub fn set_length(&mut self, length: TrailLength) {
        self.length = length;
    }

    pub fn drift_enabled(&self) -> bool {
        self.drift_enabled
    }

    pub fn set_drift_enabled(&mut self, enabled: bool) {
        self.drift_enabled = enabled;
    }

    /// Counters from the last call to [`render`](Self::render).
    pub fn last_stats(&self) -> &TrailFrameStats {
        &self.stats
    }

    /// Draw the trail.
    ///
    /// Returns the time of the earliest sample actually drawn, or `None` when
    /// the trail is off or nothing was drawn.
    pub fn render<C: Canvas + ?Sized>(
        &mut self,
        store: &mut SnailPointStore,
        snapshot: &FlightSnapshot,
        frame: &MapFrame,
        canvas: &mut C,
        clip: &ClipRect,
    ) -> Option<f64> {
        self.stats = TrailFrameStats::default();
        if !self.length.is_active() {
            return None;
        }

        let mode = snapshot.display_mode;
        let scale = VarioScale::from_mac_cready(snapshot.mac_cready);
        let mode_changed = self.mode_tracker.update(mode);
        if mode_changed || self.last_scale != Some(scale) {
            store.invalidate_colours();
            self.last_scale = Some(scale);
        }

        let drift = DriftCompensator::from_snapshot(snapshot, self.drift_enabled);
        let bounds = drift.expand_bounds(&frame.screen_bounds);
        let projection = Projection::new(frame);
        let sampler = AdaptiveSampler::new(
            self.length,
            mode,
            store.capacity(),
            self.shrink,
            store.current_write_index(),
        );
        let circling = mode.is_circling();

        let mut last_visible = false;
        let mut last_drawn = ScreenPoint::default();
        let mut averager = VarioAverager::new();
        let mut earliest: Option<f64> = None;

        for sample in sampler.iter() {
            self.stats.sampled += 1;
            let slot = sample.buffer_index as isize;
            let point = *store.at(slot);

            if !point.is_valid() {
                last_visible = false;
                continue;
            }

            // Only recent cruise legs are shown while thermalling
            if circling
                && !point.circling
                && !sampler.is_recent(sample.position, CIRCLING_CRUISE_TAIL)
            {
                last_visible = false;
                continue;
            }

            if !point.far_visible {
                last_visible = false;
                continue;
            }

            let this_visible = bounds.contains(point.latitude, point.longitude);
            if !this_visible && !last_visible {
                continue;
            }

            let screen = projection.project(drift.apply(snapshot.time, &point));
            store.at_mut(slot).screen = Some(screen);

            if last_visible && this_visible && screen.manhattan(&last_drawn) < self.merge_distance {
                averager.add(point.vario);
                self.stats.merged += 1;
                continue;
            }

            let colour = if averager.is_pending() {
                scale.colour(averager.take_blended(point.vario))
            } else if let Some(cached) = point.colour {
                cached
            } else {
                let colour = scale.colour(point.vario);
                store.at_mut(slot).colour = Some(colour);
                colour
            };
            canvas.select_pen(colour);

            if last_visible {
                canvas.line_to(screen, clip);
            } else {
                canvas.move_to(screen);
            }
            self.stats.drawn += 1;

            earliest = Some(earliest.map_or(point.time, |t| t.min(point.time)));
            last_drawn = screen;
            last_visible = this_visible;
        }

        if last_visible {
            canvas.line_to(frame.aircraft, clip);
        }

        self.stats.earliest_time = earliest;
        trace!(
            mode = %mode,
            sampled = self.stats.sampled,
            drawn = self.stats.drawn,
            merged = self.stats.merged,
            drift = drift.is_active(),
            "Rendered snail trail"
        );
        earliest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::DisplayMode;
    use crate::geo::{GeoBounds, GeoPoint, WindVector};
    use crate::render::canvas::{CanvasOp, RecordingCanvas, SnailColour};
    use crate::trail::SnailPoint;

    const PAN: GeoPoint = GeoPoint::new(46.0, 7.0);

    fn clip() -> ClipRect {
        ClipRect::from_size(640, 480)
    }

    fn frame() -> MapFrame {
        MapFrame {
            pan: PAN,
            origin: ScreenPoint::new(320, 240),
            aircraft: ScreenPoint::new(320, 240),
            display_angle_deg: 0.0,
            scale: 10_000.0,
            screen_bounds: GeoBounds::new(45.9, 46.1, 6.9, 7.1),
        }
    }

    fn wide_frame() -> MapFrame {
        MapFrame {
            screen_bounds: GeoBounds::everything(),
            ..frame()
        }
    }

    fn snapshot(time: f64, mode: DisplayMode) -> FlightSnapshot {
        FlightSnapshot {
            time,
            position: PAN,
            heading_deg: 0.0,
            wind: WindVector::default(),
            mac_cready: 2.0,
            takeoff_time: 0.0,
            display_mode: mode,
        }
    }

    fn renderer(length: TrailLength) -> TrailRenderer {
        TrailRenderer::new(&TrailConfig {
            length,
            ..Default::default()
        })
    }

    /// Points marching north-east, each ~10 px apart.
    fn fill_line(store: &mut SnailPointStore, count: usize, vario: f64) {
        for t in 0..count {
            let p = PAN.offset(t as f64 * 1e-3 - 0.05, t as f64 * 1e-3 - 0.05);
            store.append(SnailPoint::new(t as f64, p, vario, false));
        }
    }

    #[test]
    fn test_disabled_trail_draws_nothing() {
        let mut store = SnailPointStore::new(100);
        fill_line(&mut store, 50, 1.0);
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Off);

        let t = r.render(
            &mut store,
            &snapshot(50.0, DisplayMode::Cruise),
            &frame(),
            &mut canvas,
            &clip(),
        );
        assert_eq!(t, None);
        assert!(canvas.ops().is_empty());
        assert_eq!(r.last_stats().sampled, 0);
    }

    #[test]
    fn test_empty_store_returns_none() {
        let mut store = SnailPointStore::new(100);
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        let t = r.render(
            &mut store,
            &snapshot(0.0, DisplayMode::Cruise),
            &frame(),
            &mut canvas,
            &clip(),
        );
        assert_eq!(t, None);
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn test_earliest_time_after_wrap() {
        let mut store = SnailPointStore::new(1000);
        for t in 0..1500 {
            let p = PAN.offset((t % 100) as f64 * 1e-3, (t / 100) as f64 * 1e-3);
            store.append(SnailPoint::new(t as f64, p, 0.5, false));
        }
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        let t = r.render(
            &mut store,
            &snapshot(1500.0, DisplayMode::Cruise),
            &wide_frame(),
            &mut canvas,
            &clip(),
        );
        assert_eq!(t, Some(500.0));
        assert_eq!(r.last_stats().earliest_time, Some(500.0));
    }

    #[test]
    fn test_run_starts_with_move_and_closes_to_aircraft() {
        let mut store = SnailPointStore::new(100);
        fill_line(&mut store, 20, 1.0);
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        r.render(
            &mut store,
            &snapshot(20.0, DisplayMode::Cruise),
            &frame(),
            &mut canvas,
            &clip(),
        );

        let ops = canvas.ops();
        assert!(matches!(ops[0], CanvasOp::SelectPen(_)));
        assert!(matches!(ops[1], CanvasOp::MoveTo(_)));
        assert_eq!(canvas.move_count(), 1);
        assert_eq!(ops.last(), Some(&CanvasOp::LineTo(ScreenPoint::new(320, 240))));
        // 20 points all drawn: one move, 19 lines, plus the closing line
        assert_eq!(canvas.line_count(), 20);
    }

    #[test]
    fn test_invisible_point_breaks_run() {
        let mut store = SnailPointStore::new(100);
        fill_line(&mut store, 20, 1.0);
        store.at_mut(10).far_visible = false;
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        r.render(
            &mut store,
            &snapshot(20.0, DisplayMode::Cruise),
            &frame(),
            &mut canvas,
            &clip(),
        );
        assert_eq!(canvas.move_count(), 2);
    }

    #[test]
    fn test_point_leaving_view_is_connected_then_run_breaks() {
        let mut store = SnailPointStore::new(100);
        fill_line(&mut store, 10, 1.0);
        // Far outside the view: drawn as the end of the run, then the run breaks
        store.append(SnailPoint::new(10.0, PAN.offset(0.5, 0.0), 1.0, false));
        store.append(SnailPoint::new(11.0, PAN.offset(0.6, 0.0), 1.0, false));
        store.append(SnailPoint::new(12.0, PAN.offset(0.001, 0.0), 1.0, false));
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        r.render(
            &mut store,
            &snapshot(13.0, DisplayMode::Cruise),
            &frame(),
            &mut canvas,
            &clip(),
        );

        assert_eq!(r.last_stats().drawn, 12);
        assert_eq!(canvas.move_count(), 2);
    }

    #[test]
    fn test_merged_points_average_into_next_colour() {
        let mut store = SnailPointStore::new(10);
        let a = PAN.offset(0.01, 0.0);
        let b = PAN.offset(0.02, 0.0);
        store.append(SnailPoint::new(0.0, a, 0.0, false));
        // Same screen position as the first point: merged
        store.append(SnailPoint::new(1.0, a, 2.0, false));
        store.append(SnailPoint::new(2.0, b, -1.0, false));
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        r.render(
            &mut store,
            &snapshot(3.0, DisplayMode::Cruise),
            &frame(),
            &mut canvas,
            &clip(),
        );

        assert_eq!(r.last_stats().merged, 1);
        assert_eq!(canvas.move_count(), 1);
        // One trail segment plus the closing line
        assert_eq!(canvas.line_count(), 2);

        let scale = VarioScale::from_mac_cready(2.0);
        let expected = scale.colour((2.0 + -1.0) / 2.0);
        assert_eq!(canvas.line_pens()[0], expected);
    }

    #[test]
    fn test_identical_points_single_segment() {
        let mut store = SnailPointStore::new(10);
        let a = PAN.offset(0.01, 0.0);
        let b = PAN.offset(0.03, 0.0);
        store.append(SnailPoint::new(0.0, a, 1.0, false));
        store.append(SnailPoint::new(1.0, b, 3.0, false));
        store.append(SnailPoint::new(2.0, b, 0.0, false));
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);
        let mut frame = frame();
        // Aircraft far away so the closing line is distinct
        frame.aircraft = ScreenPoint::new(0, 0);

        r.render(
            &mut store,
            &snapshot(3.0, DisplayMode::Cruise),
            &frame,
            &mut canvas,
            &clip(),
        );

        let lines: Vec<_> = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, CanvasOp::LineTo(p) if *p != ScreenPoint::new(0, 0)))
            .collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(r.last_stats().merged, 1);
    }

    #[test]
    fn test_colour_matches_vario_scale() {
        let mut store = SnailPointStore::new(10);
        store.append(SnailPoint::new(0.0, PAN.offset(0.01, 0.0), 2.0, false));
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        r.render(
            &mut store,
            &snapshot(1.0, DisplayMode::Cruise),
            &frame(),
            &mut canvas,
            &clip(),
        );

        assert_eq!(canvas.ops()[0], CanvasOp::SelectPen(SnailColour::new(12)));
        assert_eq!(store.at(0).colour, Some(SnailColour::new(12)));
        assert!(store.at(0).screen.is_some());
    }

    #[test]
    fn test_colour_cache_invalidated_on_mac_cready_change() {
        let mut store = SnailPointStore::new(10);
        store.append(SnailPoint::new(0.0, PAN.offset(0.01, 0.0), 2.0, false));
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        r.render(
            &mut store,
            &snapshot(1.0, DisplayMode::Cruise),
            &frame(),
            &mut canvas,
            &clip(),
        );
        assert_eq!(store.at(0).colour, Some(SnailColour::new(12)));

        let mut snap = snapshot(2.0, DisplayMode::Cruise);
        snap.mac_cready = 4.0;
        canvas.clear();
        r.render(&mut store, &snap, &frame(), &mut canvas, &clip());

        let expected = VarioScale::from_mac_cready(4.0).colour(2.0);
        assert_ne!(expected, SnailColour::new(12));
        assert_eq!(canvas.ops()[0], CanvasOp::SelectPen(expected));
    }

    #[test]
    fn test_circling_hides_old_cruise_points() {
        let mut store = SnailPointStore::new(1000);
        // 200 cruise points then 100 circling points
        for t in 0..300 {
            let p = PAN.offset((t % 20) as f64 * 1e-3, (t / 20) as f64 * 1e-3);
            store.append(SnailPoint::new(t as f64, p, 1.0, t >= 200));
        }
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);
        r.set_drift_enabled(false);

        let t = r
            .render(
                &mut store,
                &snapshot(300.0, DisplayMode::Circling),
                &wide_frame(),
                &mut canvas,
                &clip(),
            )
            .unwrap();
        // Window is 1000 / 5 = 200 positions (times 100..299); cruise points
        // only within the newest 60 positions, and those are all circling
        assert!(t >= 200.0, "earliest drawn {}", t);
    }

    #[test]
    fn test_circling_keeps_recent_cruise_points() {
        let mut store = SnailPointStore::new(1000);
        for t in 0..300 {
            let p = PAN.offset((t % 20) as f64 * 1e-3, (t / 20) as f64 * 1e-3);
            // Just entered the thermal: only the last 20 points are circling
            store.append(SnailPoint::new(t as f64, p, 1.0, t >= 280));
        }
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);

        let t = r
            .render(
                &mut store,
                &snapshot(300.0, DisplayMode::Circling),
                &wide_frame(),
                &mut canvas,
                &clip(),
            )
            .unwrap();
        // Cruise points of the newest 60 positions (times 240..) remain
        assert!((240.0..280.0).contains(&t), "earliest drawn {}", t);
    }

    #[test]
    fn test_drift_moves_points_while_circling() {
        let mut store = SnailPointStore::new(100);
        store.append(SnailPoint::new(0.0, PAN.offset(0.001, 0.0), 1.0, true));
        store.append(SnailPoint::new(59.0, PAN.offset(0.002, 0.0), 1.0, true));

        let mut snap = snapshot(60.0, DisplayMode::Circling);
        snap.wind = WindVector::new(270.0, 10.0);

        let mut still = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);
        r.set_drift_enabled(false);
        r.render(&mut store, &snap, &frame(), &mut still, &clip());

        let mut drifted = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);
        r.render(&mut store, &snap, &frame(), &mut drifted, &clip());

        let first_x = |c: &RecordingCanvas| match c.ops()[1] {
            CanvasOp::MoveTo(p) => p.x,
            ref other => panic!("expected move, got {:?}", other),
        };
        // 600 m east at 10000 px per degree of latitude is about 54 px
        let shift = first_x(&drifted) - first_x(&still);
        assert!((50..=58).contains(&shift), "shift {}", shift);
    }

    #[test]
    fn test_point_drifting_into_view_is_drawn() {
        let mut store = SnailPointStore::new(100);
        // Just west of the view, recorded a minute ago
        store.append(SnailPoint::new(0.0, PAN.offset(0.0, -0.102), 1.0, true));
        store.append(SnailPoint::new(55.0, PAN.offset(0.001, 0.0), 1.0, true));

        let mut snap = snapshot(60.0, DisplayMode::Circling);
        // 15 m/s from the west carries it about 0.0117 degrees east
        snap.wind = WindVector::new(270.0, 15.0);

        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);
        let t = r.render(&mut store, &snap, &frame(), &mut canvas, &clip());
        assert_eq!(t, Some(0.0));
        assert!(matches!(canvas.ops()[1], CanvasOp::MoveTo(_)));
        assert_eq!(r.last_stats().drawn, 2);

        // Without drift the view is not expanded and the point stays culled
        let mut canvas = RecordingCanvas::new();
        let mut r = renderer(TrailLength::Long);
        r.set_drift_enabled(false);
        let t = r.render(&mut store, &snap, &frame(), &mut canvas, &clip());
        assert_eq!(t, Some(55.0));
        assert_eq!(r.last_stats().drawn, 1);
    }
}
