//! Geographic primitives for the trail engine.
//!
//! Positions are WGS84 degrees. Distances are metres on a spherical earth,
//! which is plenty for drift offsets of a few kilometres.

mod bounds;

pub use bounds::GeoBounds;

/// Mean earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoPoint {
    /// Latitude in degrees (positive north).
    pub latitude: f64,
    /// Longitude in degrees (positive east).
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new position.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Offset this position by raw degree deltas.
    pub fn offset(&self, d_lat: f64, d_lon: f64) -> Self {
        Self {
            latitude: self.latitude + d_lat,
            longitude: self.longitude + d_lon,
        }
    }
}

/// Wind vector as reported by the derived flight state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindVector {
    /// Direction the wind blows *from*, degrees true.
    pub bearing_deg: f64,
    /// Wind speed in metres per second.
    pub speed_ms: f64,
}

impl WindVector {
    pub const fn new(bearing_deg: f64, speed_ms: f64) -> Self {
        Self {
            bearing_deg,
            speed_ms,
        }
    }
}

/// Great-circle destination from `origin` along `bearing_deg` for `distance_m`.
///
/// Bearing is degrees true (0 = north, 90 = east).
pub fn find_lat_lon(origin: GeoPoint, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    if distance_m == 0.0 {
        return origin;
    }

    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();
    let brg = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * brg.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (brg.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
}

/// Wrap a longitude into [-180, 180).
fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_lat_lon_zero_distance() {
        let origin = GeoPoint::new(47.5, 8.2);
        assert_eq!(find_lat_lon(origin, 123.0, 0.0), origin);
    }

    #[test]
    fn test_find_lat_lon_north() {
        let origin = GeoPoint::new(0.0, 0.0);
        // One degree of latitude is ~111.2 km
        let dest = find_lat_lon(origin, 0.0, 111_195.0);
        assert!((dest.latitude - 1.0).abs() < 0.001, "got {}", dest.latitude);
        assert!(dest.longitude.abs() < 1e-9);
    }

    #[test]
    fn test_find_lat_lon_east_scales_with_latitude() {
        let equator = find_lat_lon(GeoPoint::new(0.0, 10.0), 90.0, 10_000.0);
        let north = find_lat_lon(GeoPoint::new(60.0, 10.0), 90.0, 10_000.0);

        let d_eq = equator.longitude - 10.0;
        let d_north = north.longitude - 10.0;
        // cos(60°) = 0.5, so the same distance covers twice the longitude
        assert!((d_north / d_eq - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_find_lat_lon_southwest() {
        let dest = find_lat_lon(GeoPoint::new(45.0, 7.0), 225.0, 5_000.0);
        assert!(dest.latitude < 45.0);
        assert!(dest.longitude < 7.0);
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(45.0), 45.0);
    }

    #[test]
    fn test_geo_point_offset() {
        let p = GeoPoint::new(50.0, 8.0).offset(0.5, -1.0);
        assert_eq!(p, GeoPoint::new(50.5, 7.0));
    }
}
