use tracing::{debug, info, warn};

use super::{remove_station, sort_by_distance, PlanOptions, PlanningStrategy};
use crate::energy::usable_range_above;
use crate::error::{Error, Result};
use crate::haversine::{cumulative_distance, distance};
use crate::plan::{assemble, RoutePlan, Waypoint};
use crate::polyline::Polyline;
use crate::proximity::{eligible_stations, stations_near_route, stations_reachable_from};
use crate::station::Station;
use crate::vehicle::VehicleState;

/// Inserts charging stops along a fixed, already computed route.
///
/// Candidates are the eligible stations within `lateral_search_max_km` of the
/// route. From the current position the planner drives straight to the
/// destination when in range; otherwise it stops at the nearest reachable
/// station that is closer to the destination than the current position, or
/// the nearest reachable station when none is. Each station is used at most
/// once, so the loop ends after at most one iteration per candidate.
///
/// The returned plan reuses `route` as its polyline.
pub fn plan_geometry(
    route: &Polyline,
    stations: &[Station],
    vehicle: &VehicleState,
    options: &PlanOptions,
) -> Result<RoutePlan> {
    vehicle.validate()?;
    options.validate()?;
    route.validate()?;

    let (start, end) = match (route.first(), route.last()) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(Error::invalid("route has no endpoints")),
    };

    let eligible = eligible_stations(
        stations,
        vehicle.battery_capacity_kwh,
        options.max_full_charge_time_hours,
    );
    let mut remaining = if route.len() >= 2 {
        stations_near_route(route, &eligible, options.lateral_search_max_km)?
    } else {
        eligible
    };

    let mut current = start;
    let mut battery = vehicle.battery_percent;
    let mut waypoints = vec![Waypoint::at(start)];
    let mut legs = Vec::new();

    loop {
        let to_destination = distance(current, end);
        let range = usable_range_above(
            battery,
            options.min_battery_threshold_percent,
            vehicle.full_range_km,
        );

        if range >= to_destination {
            legs.push(to_destination);
            waypoints.push(Waypoint::at(end));
            break;
        }

        let mut reachable = stations_reachable_from(current, &remaining, range);
        if reachable.is_empty() {
            warn!(
                position = %current,
                remaining_km = to_destination,
                usable_range_km = range,
                "no reachable station, stranded"
            );
            return Err(Error::Stranded {
                position: current,
                charging_stops: waypoints.len() - 1,
                remaining_km: to_destination,
                usable_range_km: range,
            });
        }

        sort_by_distance(current, &mut reachable);
        let chosen = reachable
            .iter()
            .position(|station| distance(station.coordinate, end) < to_destination)
            .unwrap_or(0);
        let station = reachable.swap_remove(chosen);
        let leg = distance(current, station.coordinate);

        debug!(
            station = %station.id,
            leg_km = leg,
            battery_before = battery,
            candidates = reachable.len() + 1,
            "geometry planner inserted charging stop"
        );

        remove_station(&mut remaining, &station.id);
        battery = 100.0;
        current = station.coordinate;
        legs.push(leg);
        waypoints.push(Waypoint::charging(station));
    }

    let plan = assemble(
        PlanningStrategy::Geometry,
        waypoints,
        &legs,
        route.clone(),
        cumulative_distance(route),
        vehicle,
        options,
    )?;

    info!(
        stops = plan.charging_stop_count(),
        distance_km = plan.total_distance_km,
        charging_hours = plan.total_charging_hours,
        "geometry plan ready"
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::KM_PER_DEGREE;
    use crate::polyline::Coordinate;
    use crate::station::OperationalStatus;

    fn north(km: f64) -> Coordinate {
        Coordinate::new(km / KM_PER_DEGREE, 0.0)
    }

    fn station(id: &str, at: Coordinate) -> Station {
        Station {
            id: id.to_string(),
            name: id.to_string(),
            coordinate: at,
            power_rating_kw: 50.0,
            available_slots: 2,
            total_slots: 2,
            operational_status: OperationalStatus::Operational,
            price_per_kwh: 0.3,
        }
    }

    fn route(km: f64) -> Polyline {
        Polyline::new((0..=10).map(|i| north(km * i as f64 / 10.0)).collect())
    }

    #[test]
    fn in_range_goes_straight_to_destination() {
        let vehicle = VehicleState::new(100.0, 50.0, 40.0);
        let stations = vec![station("s40", north(40.0))];

        let plan = plan_geometry(&route(30.0), &stations, &vehicle, &PlanOptions::default()).unwrap();

        assert_eq!(plan.stops.len(), 2);
        assert_eq!(plan.charging_stop_count(), 0);
        assert!((plan.destination_battery_percent().unwrap() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn prefers_station_that_makes_progress() {
        let vehicle = VehicleState::new(60.0, 100.0, 40.0);
        let stations = vec![station("behind", north(-10.0)), station("ahead", north(20.0))];

        let plan = plan_geometry(&route(100.0), &stations, &vehicle, &PlanOptions::default()).unwrap();

        let ids: Vec<&str> = plan
            .charging_stops()
            .filter_map(|stop| stop.station())
            .map(|station| station.id.as_str())
            .collect();
        assert_eq!(ids, vec!["ahead"]);
    }

    #[test]
    fn falls_back_to_nearest_then_strands() {
        let vehicle = VehicleState::new(60.0, 100.0, 40.0);
        let stations = vec![station("behind", north(-10.0))];

        let err = plan_geometry(&route(100.0), &stations, &vehicle, &PlanOptions::default()).unwrap_err();

        match err {
            Error::Stranded {
                charging_stops,
                position,
                ..
            } => {
                assert_eq!(charging_stops, 1);
                assert_eq!(position, north(-10.0));
            }
            other => panic!("expected stranded, got {:?}", other),
        }
    }

    #[test]
    fn corridor_excludes_far_stations() {
        let vehicle = VehicleState::new(60.0, 100.0, 40.0);
        let off_corridor = Coordinate::new(north(30.0).lat, 45.0 / KM_PER_DEGREE);
        let stations = vec![station("off", off_corridor)];

        let err = plan_geometry(&route(100.0), &stations, &vehicle, &PlanOptions::default()).unwrap_err();
        assert!(err.is_stranded());
    }

    #[test]
    fn rejects_invalid_vehicle() {
        let vehicle = VehicleState::new(60.0, 0.0, 40.0);
        let result = plan_geometry(&route(10.0), &[], &vehicle, &PlanOptions::default());
        assert!(matches!(result, Err(Error::InvalidInput { .. })));
    }
}
