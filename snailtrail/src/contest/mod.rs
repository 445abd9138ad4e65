//! Read-only access to the optimised contest path.
//!
//! The optimiser runs elsewhere; the overlay only needs an ordered list of
//! timed positions. Times are seconds since takeoff.

use crate::geo::GeoPoint;

/// One vertex of the contest path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContestPoint {
    /// Seconds since takeoff.
    pub time: f64,
    pub longitude: f64,
    pub latitude: f64,
}

impl ContestPoint {
    pub fn new(time: f64, position: GeoPoint) -> Self {
        Self {
            time,
            longitude: position.longitude,
            latitude: position.latitude,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Ordered query interface over a contest path.
pub trait ContestPath: Send {
    /// Number of vertices.
    fn len(&self) -> usize;

    /// Vertex at `index`, `None` past the end.
    fn point(&self, index: usize) -> Option<ContestPoint>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Contest path held as a plain vector.
#[derive(Debug, Clone, Default)]
pub struct RecordedContestPath {
    points: Vec<ContestPoint>,
}

impl RecordedContestPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole path (the optimiser publishes complete solutions).
    pub fn set_points(&mut self, points: Vec<ContestPoint>) {
        self.points = points;
    }

    pub fn push(&mut self, point: ContestPoint) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

impl From<Vec<ContestPoint>> for RecordedContestPath {
    fn from(points: Vec<ContestPoint>) -> Self {
        Self { points }
    }
}

impl ContestPath for RecordedContestPath {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Option<ContestPoint> {
        self.points.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorded_path_queries() {
        let mut path = RecordedContestPath::new();
        assert!(path.is_empty());

        path.push(ContestPoint::new(0.0, GeoPoint::new(46.0, 7.0)));
        path.push(ContestPoint::new(60.0, GeoPoint::new(46.1, 7.1)));

        assert_eq!(path.len(), 2);
        assert_eq!(path.point(1).unwrap().time, 60.0);
        assert_eq!(path.point(1).unwrap().position(), GeoPoint::new(46.1, 7.1));
        assert!(path.point(2).is_none());
    }

    #[test]
    fn test_set_points_replaces() {
        let mut path = RecordedContestPath::from(vec![ContestPoint::new(
            0.0,
            GeoPoint::new(46.0, 7.0),
        )]);
        path.set_points(Vec::new());
        assert!(path.is_empty());
    }
}
