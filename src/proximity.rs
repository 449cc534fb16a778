//! Candidate station filtering against a route or a point.
//!
//! Filters run in parallel with rayon but always preserve input order, so
//! planning stays deterministic.

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::haversine::{distance, distance_to_polyline};
use crate::polyline::{Coordinate, Polyline};
use crate::station::Station;

/// Stations the planner may stop at.
///
/// Keeps bookable stations (free slot, operational) with positive power.
/// With a ceiling set, also drops stations that would take longer than
/// `max_full_charge_hours` to fill a `battery_capacity_kwh` pack.
pub fn eligible_stations(
    stations: &[Station],
    battery_capacity_kwh: f64,
    max_full_charge_hours: Option<f64>,
) -> Vec<Station> {
    let eligible: Vec<Station> = stations
        .par_iter()
        .filter(|station| station.is_bookable() && station.power_rating_kw > 0.0)
        .filter(|station| match max_full_charge_hours {
            Some(ceiling) => station
                .full_charge_hours(battery_capacity_kwh)
                .is_ok_and(|hours| hours <= ceiling),
            None => true,
        })
        .cloned()
        .collect();

    debug!(total = stations.len(), eligible = eligible.len(), "filtered candidate stations");
    eligible
}

/// Stations whose lateral distance to `route` is at most `max_distance_km`.
pub fn stations_near_route(
    route: &Polyline,
    stations: &[Station],
    max_distance_km: f64,
) -> Result<Vec<Station>> {
    if route.len() < 2 {
        return Err(Error::invalid(format!(
            "route needs at least 2 points for a lateral search, got {}",
            route.len()
        )));
    }

    Ok(stations
        .par_iter()
        .filter(|station| {
            distance_to_polyline(station.coordinate, route).is_ok_and(|lateral| lateral <= max_distance_km)
        })
        .cloned()
        .collect())
}

/// Stations within straight-line `max_distance_km` of `origin`.
pub fn stations_reachable_from(
    origin: Coordinate,
    stations: &[Station],
    max_distance_km: f64,
) -> Vec<Station> {
    stations
        .par_iter()
        .filter(|station| distance(origin, station.coordinate) <= max_distance_km)
        .cloned()
        .collect()
}
