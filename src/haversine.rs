//! Great-circle distance kernel and a straight-line routing fallback.
//!
//! Every distance in the planner goes through [`distance`], so route
//! bookkeeping and station filtering agree on the same arithmetic.

use tracing::debug;

use crate::error::{Error, Result};
use crate::polyline::{Coordinate, Polyline};
use crate::traits::{RouteLeg, RoutingProvider};

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude on the haversine sphere.
pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Default spacing between synthesized points of a fallback route.
const DEFAULT_SAMPLE_SPACING_KM: f64 = 5.0;

/// Great-circle distance between two points in kilometers.
pub fn distance(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Distance from `point` to the closest point of the segment `start..end`.
///
/// The projection parameter is found in a local equirectangular frame centred
/// on the segment; the returned distance is the great-circle distance to the
/// projected point.
pub fn distance_to_segment(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    let ref_lat = ((start.lat + end.lat) / 2.0).to_radians();
    let kx = KM_PER_DEGREE * ref_lat.cos();
    let ky = KM_PER_DEGREE;

    let sx = (end.lng - start.lng) * kx;
    let sy = (end.lat - start.lat) * ky;
    let px = (point.lng - start.lng) * kx;
    let py = (point.lat - start.lat) * ky;

    let seg_len_sq = sx * sx + sy * sy;
    if seg_len_sq < 1e-12 {
        return distance(point, start);
    }

    let t = ((px * sx + py * sy) / seg_len_sq).clamp(0.0, 1.0);
    distance(point, start.lerp(&end, t))
}

/// Minimum distance from `point` to any segment of `line`.
///
/// Segments, not just vertices, are measured so a station beside the middle
/// of a long sparse segment is still found.
pub fn distance_to_polyline(point: Coordinate, line: &Polyline) -> Result<f64> {
    let points = line.points();
    if points.len() < 2 {
        return Err(Error::invalid(format!(
            "distance to polyline needs at least 2 points, got {}",
            points.len()
        )));
    }

    Ok(points
        .windows(2)
        .map(|pair| distance_to_segment(point, pair[0], pair[1]))
        .fold(f64::INFINITY, f64::min))
}

/// Sum of consecutive segment distances.
pub fn cumulative_distance(line: &Polyline) -> f64 {
    line.points()
        .windows(2)
        .map(|pair| distance(pair[0], pair[1]))
        .sum()
}

/// Routing provider that follows the great-circle chord (fallback when OSRM
/// is unavailable).
///
/// Ignores roads entirely, but is always available and deterministic.
#[derive(Debug, Clone)]
pub struct HaversineRouter {
    /// Spacing between synthesized points in km.
    pub sample_spacing_km: f64,
}

impl Default for HaversineRouter {
    fn default() -> Self {
        Self {
            sample_spacing_km: DEFAULT_SAMPLE_SPACING_KM,
        }
    }
}

impl HaversineRouter {
    pub fn new(sample_spacing_km: f64) -> Self {
        Self { sample_spacing_km }
    }
}

impl RoutingProvider for HaversineRouter {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteLeg> {
        origin.validate()?;
        destination.validate()?;
        if !(self.sample_spacing_km.is_finite() && self.sample_spacing_km > 0.0) {
            return Err(Error::invalid("sample spacing must be positive"));
        }

        let straight = distance(origin, destination);
        let segments = ((straight / self.sample_spacing_km).ceil() as usize).max(1);
        let points = (0..=segments)
            .map(|i| match i {
                0 => origin,
                i if i == segments => destination,
                i => origin.lerp(&destination, i as f64 / segments as f64),
            })
            .collect();
        let polyline = Polyline::new(points);
        let distance_km = cumulative_distance(&polyline);

        debug!(%origin, %destination, distance_km, segments, "haversine fallback route");
        Ok(RouteLeg {
            polyline,
            distance_km,
        })
    }
}
