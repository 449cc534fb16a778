//! Coordinates and polylines for route geometries.
//!
//! Polylines are kept as decoded coordinate sequences. Any wire encoding
//! (GeoJSON from OSRM, JSON to a frontend) happens at the boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate from latitude and longitude in degrees.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Range check only: lat in [-90, 90], lng in [-180, 180].
    pub fn validate(&self) -> Result<()> {
        if !(self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat)) {
            return Err(Error::invalid(format!("latitude {} out of range", self.lat)));
        }
        if !(self.lng.is_finite() && (-180.0..=180.0).contains(&self.lng)) {
            return Err(Error::invalid(format!("longitude {} out of range", self.lng)));
        }
        Ok(())
    }

    /// Linear interpolation in degree space; fine for the short segments of
    /// a road geometry.
    pub fn lerp(&self, other: &Coordinate, t: f64) -> Coordinate {
        Coordinate {
            lat: self.lat + (other.lat - self.lat) * t,
            lng: self.lng + (other.lng - self.lng) * t,
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// An ordered, drivable path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new polyline from a list of coordinates.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Checks the path is non-empty and every point is in range.
    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(Error::invalid("polyline has no points"));
        }
        self.points.iter().try_for_each(Coordinate::validate)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns its points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the polyline has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the starting point, if any.
    pub fn first(&self) -> Option<Coordinate> {
        self.points.first().copied()
    }

    /// Returns the end point, if any.
    pub fn last(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }

    /// Copies points `start..=end` (clamped to the path) into a new polyline.
    pub fn window(&self, start: usize, end: usize) -> Polyline {
        if self.points.is_empty() {
            return Polyline::new(Vec::new());
        }
        let end = end.min(self.points.len() - 1);
        let start = start.min(end);
        Polyline::new(self.points[start..=end].to_vec())
    }

    /// Appends the next leg. The leg's first point is the joint shared with
    /// this polyline's last point and is dropped.
    pub fn append_leg(&mut self, leg: Polyline) {
        if self.points.is_empty() {
            self.points = leg.points;
            return;
        }
        self.points.extend(leg.points.into_iter().skip(1));
    }

    /// Stitches consecutive legs into one path.
    pub fn concat(legs: impl IntoIterator<Item = Polyline>) -> Polyline {
        let mut joined = Polyline::new(Vec::new());
        for leg in legs {
            joined.append_leg(leg);
        }
        joined
    }
}

impl From<Vec<(f64, f64)>> for Polyline {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(Coordinate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_points() {
        let polyline = Polyline::from(vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)]);
        assert_eq!(polyline.len(), 3);
        assert_eq!(polyline.first(), Some(Coordinate::new(38.5, -120.2)));
        assert_eq!(polyline.last(), Some(Coordinate::new(43.252, -126.453)));
    }

    #[test]
    fn test_empty_polyline_is_invalid() {
        let polyline = Polyline::new(vec![]);
        assert!(polyline.is_empty());
        assert!(matches!(polyline.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn test_out_of_range_point_is_invalid() {
        let polyline = Polyline::from(vec![(10.0, 10.0), (91.0, 10.0)]);
        assert!(polyline.validate().is_err());
        assert!(Coordinate::new(0.0, -181.0).validate().is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
        assert!(Coordinate::new(-90.0, 180.0).validate().is_ok());
    }

    #[test]
    fn test_concat_drops_joint() {
        let first = Polyline::from(vec![(0.0, 0.0), (0.1, 0.0), (0.2, 0.0)]);
        let second = Polyline::from(vec![(0.2, 0.0), (0.3, 0.0)]);
        let third = Polyline::from(vec![(0.3, 0.0), (0.4, 0.0)]);

        let joined = Polyline::concat(vec![first, second, third]);

        assert_eq!(
            joined,
            Polyline::from(vec![(0.0, 0.0), (0.1, 0.0), (0.2, 0.0), (0.3, 0.0), (0.4, 0.0)])
        );
    }

    #[test]
    fn test_window_clamps() {
        let polyline = Polyline::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert_eq!(polyline.window(1, 2).points().len(), 2);
        assert_eq!(polyline.window(2, 99), Polyline::from(vec![(2.0, 0.0), (3.0, 0.0)]));
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(2.0, 4.0);
        assert_eq!(a.lerp(&b, 0.5), Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn test_display() {
        let text = Coordinate::new(36.17, -115.14).to_string();
        assert_eq!(text, "(36.17000, -115.14000)");
    }
}
