//! Latitude/longitude bounding rectangles.

use super::GeoPoint;

/// Geographic bounding box of a map view.
///
/// Containment is strict on all four edges, so a point exactly on the edge
/// is outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude
    pub min_lat: f64,
    /// Maximum (northernmost) latitude
    pub max_lat: f64,
    /// Minimum (westernmost) longitude
    pub min_lon: f64,
    /// Maximum (easternmost) longitude
    pub max_lon: f64,
}

impl GeoBounds {
    /// Create a new bounding box.
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Create a bounding box from a single point.
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            min_lat: point.latitude,
            max_lat: point.latitude,
            min_lon: point.longitude,
            max_lon: point.longitude,
        }
    }

    /// A box that contains every finite coordinate.
    pub fn everything() -> Self {
        Self::new(-90.0, 90.0, -180.0, 180.0).expanded(1.0, 1.0)
    }

    /// Expand this bounding box to include a point.
    pub fn expand(&mut self, point: GeoPoint) {
        self.min_lat = self.min_lat.min(point.latitude);
        self.max_lat = self.max_lat.max(point.latitude);
        self.min_lon = self.min_lon.min(point.longitude);
        self.max_lon = self.max_lon.max(point.longitude);
    }

    /// Grow every edge outward by the given margins (absolute values are used).
    pub fn expanded(&self, d_lat: f64, d_lon: f64) -> Self {
        let d_lat = d_lat.abs();
        let d_lon = d_lon.abs();
        Self {
            min_lat: self.min_lat - d_lat,
            max_lat: self.max_lat + d_lat,
            min_lon: self.min_lon - d_lon,
            max_lon: self.max_lon + d_lon,
        }
    }

    /// Grow the box by a fraction of its own size on each side.
    pub fn scaled(&self, fraction: f64) -> Self {
        self.expanded(self.height() * fraction, self.width() * fraction)
    }

    /// Strict containment test.
    #[inline]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        longitude > self.min_lon
            && longitude < self.max_lon
            && latitude > self.min_lat
            && latitude < self.max_lat
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Get the width of the bounds in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Get the height of the bounds in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}
