//! Geographic to screen projection for the trail.
//!
//! Flat-earth projection around the pan point: longitude is shrunk by the
//! cosine of latitude, the result is rotated into the display orientation
//! with 1024-scaled integer trig and translated to the screen origin.

use std::sync::OnceLock;

use super::canvas::{ClipRect, ScreenPoint};
use crate::geo::{GeoBounds, GeoPoint};

/// Entries in the fixed-point trig tables (one full turn).
const TRIG_TABLE_SIZE: usize = 4096;

/// Fixed-point scale of the trig tables.
const TRIG_ONE: i64 = 1024;

struct TrigTables {
    sin: Vec<i32>,
    cos: Vec<i32>,
}

fn trig_tables() -> &'static TrigTables {
    static TABLES: OnceLock<TrigTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let step = std::f64::consts::TAU / TRIG_TABLE_SIZE as f64;
        let sin = (0..TRIG_TABLE_SIZE)
            .map(|i| ((i as f64 * step).sin() * TRIG_ONE as f64).round() as i32)
            .collect();
        let cos = (0..TRIG_TABLE_SIZE)
            .map(|i| ((i as f64 * step).cos() * TRIG_ONE as f64).round() as i32)
            .collect();
        TrigTables { sin, cos }
    })
}

/// Table slot for an angle in degrees (any range).
fn trig_index(angle_deg: f64) -> usize {
    let normalized = angle_deg.rem_euclid(360.0);
    ((normalized * TRIG_TABLE_SIZE as f64 / 360.0) as usize) % TRIG_TABLE_SIZE
}

/// Fixed-point `(sin, cos)` of an angle, scaled by 1024.
pub fn fixed_sin_cos(angle_deg: f64) -> (i32, i32) {
    let tables = trig_tables();
    let i = trig_index(angle_deg);
    (tables.sin[i], tables.cos[i])
}

/// Map view state for one frame.
///
/// Every element drawn in the frame must use the same values so the trail
/// lines up with the rest of the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapFrame {
    /// Geographic point shown at `origin`.
    pub pan: GeoPoint,
    /// Screen position of the pan point.
    pub origin: ScreenPoint,
    /// Screen position of the aircraft symbol.
    pub aircraft: ScreenPoint,
    /// Map rotation: the bearing that points up, degrees.
    pub display_angle_deg: f64,
    /// Pixels per degree of latitude.
    pub scale: f64,
    /// Geographic bounds of the visible map.
    pub screen_bounds: GeoBounds,
}

impl MapFrame {
    /// Frame centred on `position`, with bounds computed from the clip rectangle.
    pub fn centred_on(
        position: GeoPoint,
        display_angle_deg: f64,
        scale: f64,
        clip: &ClipRect,
    ) -> Self {
        let origin = ScreenPoint::new(
            clip.left + clip.width() / 2,
            clip.top + clip.height() / 2,
        );
        let mut frame = Self {
            pan: position,
            origin,
            aircraft: origin,
            display_angle_deg,
            scale,
            screen_bounds: GeoBounds::from_point(position),
        };
        frame.screen_bounds = Projection::new(&frame).visible_bounds(clip);
        frame
    }
}

/// Frame-scoped projection parameters, computed once per frame.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pan: GeoPoint,
    scale: f64,
    origin: ScreenPoint,
    sin: i64,
    cos: i64,
    xxs: i64,
    yys: i64,
}

impl Projection {
    pub fn new(frame: &MapFrame) -> Self {
        let (sin, cos) = fixed_sin_cos(frame.display_angle_deg);
        Self {
            pan: frame.pan,
            scale: frame.scale,
            origin: frame.origin,
            sin: sin as i64,
            cos: cos as i64,
            xxs: frame.origin.x as i64 * TRIG_ONE - TRIG_ONE / 2,
            yys: frame.origin.y as i64 * TRIG_ONE + TRIG_ONE / 2,
        }
    }

    /// Project a geographic position to the screen.
    #[inline]
    pub fn project(&self, p: GeoPoint) -> ScreenPoint {
        let y = ((self.pan.latitude - p.latitude) * self.scale).round() as i64;
        let x = ((self.pan.longitude - p.longitude) * p.latitude.to_radians().cos() * self.scale)
            .round() as i64;

        ScreenPoint::new(
            ((self.xxs - x * self.cos + y * self.sin) / TRIG_ONE) as i32,
            ((y * self.cos + x * self.sin + self.yys) / TRIG_ONE) as i32,
        )
    }

    /// Approximate inverse projection, used for view bounds.
    pub fn unproject(&self, s: ScreenPoint) -> GeoPoint {
        let (sin, cos) = (
            self.sin as f64 / TRIG_ONE as f64,
            self.cos as f64 / TRIG_ONE as f64,
        );
        let dx = (s.x - self.origin.x) as f64;
        let dy = (s.y - self.origin.y) as f64;

        let x = -dx * cos + dy * sin;
        let y = dx * sin + dy * cos;

        let latitude = self.pan.latitude - y / self.scale;
        let lon_scale = latitude.to_radians().cos().max(1e-6) * self.scale;
        GeoPoint::new(latitude, self.pan.longitude - x / lon_scale)
    }

    /// Geographic box containing the whole clip rectangle.
    pub fn visible_bounds(&self, clip: &ClipRect) -> GeoBounds {
        let corners = [
            ScreenPoint::new(clip.left, clip.top),
            ScreenPoint::new(clip.right, clip.top),
            ScreenPoint::new(clip.left, clip.bottom),
            ScreenPoint::new(clip.right, clip.bottom),
        ];
        let mut bounds = GeoBounds::from_point(self.unproject(corners[0]));
        for corner in &corners[1..] {
            bounds.expand(self.unproject(*corner));
        }
        bounds
    }
}
