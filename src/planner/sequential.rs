use tracing::{debug, info, warn};

use super::{remove_station, PlanOptions, PlanningStrategy};
use crate::energy::usable_range_above;
use crate::error::{Error, Result};
use crate::haversine::{cumulative_distance, distance, distance_to_segment};
use crate::plan::{assemble, RoutePlan, Waypoint};
use crate::polyline::{Coordinate, Polyline};
use crate::proximity::{eligible_stations, stations_near_route, stations_reachable_from};
use crate::station::Station;
use crate::traits::{RouteLeg, RoutingProvider};
use crate::vehicle::VehicleState;

/// Slack when comparing accumulated segment lengths against range.
const WALK_TOLERANCE_KM: f64 = 1e-6;

/// Where a walk along the reference route ran out of range.
#[derive(Debug, Clone, Copy)]
struct RangeWalk {
    /// Last vertex reached within range.
    last_index: usize,
    reached_end: bool,
    /// Interpolated point on the next segment where range expires.
    run_out: Coordinate,
}

/// Builds the route leg by leg through the routing provider.
///
/// One reference route is fetched for the whole journey. The vehicle walks it
/// until range runs out; a station is then searched in widening lateral bands
/// around the walked part of the route plus a few lookahead points. Among
/// stations reachable from the current position, the one closest to the
/// run-out point wins. After all stops are known, a road leg is fetched for
/// each consecutive pair, strictly in order, and the legs are stitched into
/// the final polyline.
pub fn plan_sequential<R: RoutingProvider + ?Sized>(
    router: &R,
    origin: Coordinate,
    destination: Coordinate,
    stations: &[Station],
    vehicle: &VehicleState,
    options: &PlanOptions,
) -> Result<RoutePlan> {
    origin.validate()?;
    destination.validate()?;
    vehicle.validate()?;
    options.validate()?;

    let reference = router.route(origin, destination)?;
    reference.polyline.validate()?;
    let points = reference.polyline.points();
    let last = points.len() - 1;

    let mut candidates = eligible_stations(
        stations,
        vehicle.battery_capacity_kwh,
        options.max_full_charge_time_hours,
    );
    let mut battery = vehicle.battery_percent;
    let mut current_index = 0;
    let mut departed = origin;
    let mut stop_points = vec![Waypoint::at(origin)];

    loop {
        let range = usable_range_above(
            battery,
            options.min_battery_threshold_percent,
            vehicle.full_range_km,
        );
        let walk = walk_route(points, current_index, range);
        if walk.reached_end {
            stop_points.push(Waypoint::at(destination));
            break;
        }

        let here = points[current_index];
        let window_end = (walk.last_index + 1 + options.lookahead_points).min(last);
        let window = reference.polyline.window(current_index, window_end);

        let Some(station) = search_bands(&window, &candidates, here, departed, range, walk.run_out, options)? else {
            let remaining_km = cumulative_distance(&reference.polyline.window(current_index, last));
            warn!(
                position = %here,
                remaining_km,
                usable_range_km = range,
                "no station in any search band, stranded"
            );
            return Err(Error::Stranded {
                position: here,
                charging_stops: stop_points.len() - 1,
                remaining_km,
                usable_range_km: range,
            });
        };

        current_index = segment_before(points, current_index, window_end, station.coordinate);
        remove_station(&mut candidates, &station.id);
        battery = 100.0;
        departed = station.coordinate;
        stop_points.push(Waypoint::charging(station));
    }

    // Each leg starts where the previous one ended, so fetch them in order.
    let mut legs: Vec<RouteLeg> = Vec::with_capacity(stop_points.len() - 1);
    for pair in stop_points.windows(2) {
        legs.push(router.route(pair[0].coordinate, pair[1].coordinate)?);
    }
    let leg_distances: Vec<f64> = legs
        .iter()
        .map(|leg| cumulative_distance(&leg.polyline))
        .collect();
    let polyline = Polyline::concat(legs.into_iter().map(|leg| leg.polyline));

    let plan = assemble(
        PlanningStrategy::Sequential,
        stop_points,
        &leg_distances,
        polyline,
        cumulative_distance(&reference.polyline),
        vehicle,
        options,
    )?;

    info!(
        stops = plan.charging_stop_count(),
        distance_km = plan.total_distance_km,
        direct_km = plan.direct_distance_km,
        charging_hours = plan.total_charging_hours,
        "sequential plan ready"
    );
    Ok(plan)
}

/// Walks forward from `from` while the accumulated distance stays in range.
fn walk_route(points: &[Coordinate], from: usize, range_km: f64) -> RangeWalk {
    let mut travelled = 0.0;
    let mut index = from;

    while index + 1 < points.len() {
        let segment = distance(points[index], points[index + 1]);
        if travelled + segment > range_km + WALK_TOLERANCE_KM {
            let t = if segment > 0.0 {
                ((range_km - travelled) / segment).clamp(0.0, 1.0)
            } else {
                0.0
            };
            return RangeWalk {
                last_index: index,
                reached_end: false,
                run_out: points[index].lerp(&points[index + 1], t),
            };
        }
        travelled += segment;
        index += 1;
    }

    RangeWalk {
        last_index: index,
        reached_end: true,
        run_out: points[index],
    }
}

/// Tries each lateral band in turn; the first band with a reachable station
/// decides.
///
/// A station must be in range both from the current reference vertex and
/// from the last stop, which can sit well off the reference route.
fn search_bands(
    window: &Polyline,
    candidates: &[Station],
    here: Coordinate,
    departed: Coordinate,
    range_km: f64,
    run_out: Coordinate,
    options: &PlanOptions,
) -> Result<Option<Station>> {
    for radius in options.search_radii() {
        let near = stations_near_route(window, candidates, radius)?;
        let reachable = stations_reachable_from(here, &near, range_km);
        let best = stations_reachable_from(departed, &reachable, range_km)
            .into_iter()
            .min_by(|a, b| distance(a.coordinate, run_out).total_cmp(&distance(b.coordinate, run_out)));

        match best {
            Some(station) => {
                debug!(
                    station = %station.id,
                    radius_km = radius,
                    to_run_out_km = distance(station.coordinate, run_out),
                    "sequential planner selected charging stop"
                );
                return Ok(Some(station));
            }
            None => debug!(radius_km = radius, "no reachable station in band"),
        }
    }
    Ok(None)
}

/// Start index of the reference segment in `from..=to` closest to `target`.
fn segment_before(points: &[Coordinate], from: usize, to: usize, target: Coordinate) -> usize {
    let mut best = from;
    let mut best_distance = f64::INFINITY;
    for j in from..to {
        let d = distance_to_segment(target, points[j], points[j + 1]);
        if d < best_distance {
            best = j;
            best_distance = d;
        }
    }
    best
}
