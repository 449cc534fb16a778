//! Route plans and their assembly from planner waypoints.

use serde::{Deserialize, Serialize};

use crate::energy::{battery_after, charging_time, energy_for_distance, usable_range_above};
use crate::error::{Error, Result};
use crate::haversine::cumulative_distance;
use crate::planner::{PlanOptions, PlanningStrategy};
use crate::polyline::{Coordinate, Polyline};
use crate::station::Station;
use crate::vehicle::VehicleState;

/// One stop of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RouteStop {
    Start {
        coordinate: Coordinate,
        battery_percent: f64,
    },
    ChargingStop {
        coordinate: Coordinate,
        distance_from_start_km: f64,
        /// Battery on arrival, before charging.
        battery_before_percent: f64,
        station: Station,
        /// Minimum charging time to reach the next stop.
        charging_hours: f64,
    },
    Destination {
        coordinate: Coordinate,
        distance_from_start_km: f64,
        battery_after_percent: f64,
    },
}

impl RouteStop {
    pub fn coordinate(&self) -> Coordinate {
        match self {
            RouteStop::Start { coordinate, .. }
            | RouteStop::ChargingStop { coordinate, .. }
            | RouteStop::Destination { coordinate, .. } => *coordinate,
        }
    }

    pub fn distance_from_start_km(&self) -> f64 {
        match self {
            RouteStop::Start { .. } => 0.0,
            RouteStop::ChargingStop {
                distance_from_start_km,
                ..
            }
            | RouteStop::Destination {
                distance_from_start_km,
                ..
            } => *distance_from_start_km,
        }
    }

    pub fn station(&self) -> Option<&Station> {
        match self {
            RouteStop::ChargingStop { station, .. } => Some(station),
            _ => None,
        }
    }
}

/// Charging time estimate for one charging stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingEstimate {
    pub station_id: String,
    /// Distance to the next stop the charge has to cover.
    pub next_leg_km: f64,
    pub energy_kwh: f64,
    pub hours: f64,
}

/// Immutable result of one planning request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePlan {
    pub strategy: PlanningStrategy,
    pub stops: Vec<RouteStop>,
    pub polyline: Polyline,
    /// Length of the assembled ("smart") route.
    pub total_distance_km: f64,
    /// Length of the direct ("main") route without charging.
    pub direct_distance_km: f64,
    pub charging_estimates: Vec<ChargingEstimate>,
    pub total_charging_hours: f64,
}

impl RoutePlan {
    pub fn charging_stops(&self) -> impl Iterator<Item = &RouteStop> {
        self.stops
            .iter()
            .filter(|stop| matches!(stop, RouteStop::ChargingStop { .. }))
    }

    pub fn charging_stop_count(&self) -> usize {
        self.charging_stops().count()
    }

    /// Extra distance of the smart route over the main route.
    pub fn detour_km(&self) -> f64 {
        self.total_distance_km - self.direct_distance_km
    }

    pub fn destination_battery_percent(&self) -> Option<f64> {
        self.stops.iter().rev().find_map(|stop| match stop {
            RouteStop::Destination {
                battery_after_percent,
                ..
            } => Some(*battery_after_percent),
            _ => None,
        })
    }
}

/// Rounding slack when checking arrival battery against the threshold.
const ARRIVAL_TOLERANCE_PERCENT: f64 = 1e-6;

/// A point the vehicle passes through: origin, a station, or the destination.
#[derive(Debug, Clone)]
pub(crate) struct Waypoint {
    pub coordinate: Coordinate,
    pub station: Option<Station>,
}

impl Waypoint {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            station: None,
        }
    }

    pub fn charging(station: Station) -> Self {
        Self {
            coordinate: station.coordinate,
            station: Some(station),
        }
    }
}

/// Builds the final plan from the ordered waypoints and the distance of each
/// leg between them.
///
/// Battery is simulated leg by leg with a full charge at every stop. A leg
/// that would arrive below `min_battery_threshold_percent` strands the plan.
/// Each charging stop is annotated with the time needed for the following
/// leg; estimates below `min_charge_hours` are clamped to zero.
pub(crate) fn assemble(
    strategy: PlanningStrategy,
    waypoints: Vec<Waypoint>,
    leg_distances_km: &[f64],
    polyline: Polyline,
    direct_distance_km: f64,
    vehicle: &VehicleState,
    options: &PlanOptions,
) -> Result<RoutePlan> {
    if waypoints.len() < 2 || leg_distances_km.len() != waypoints.len() - 1 {
        return Err(Error::invalid(format!(
            "{} waypoints do not match {} legs",
            waypoints.len(),
            leg_distances_km.len()
        )));
    }

    let last = waypoints.len() - 1;
    let mut battery = vehicle.battery_percent;
    let mut travelled = 0.0;
    let mut stops = Vec::with_capacity(waypoints.len());
    let mut estimates = Vec::new();

    let mut waypoints = waypoints.into_iter();
    let mut departed = match waypoints.next() {
        Some(origin) => origin.coordinate,
        None => return Err(Error::invalid("plan has no origin")),
    };
    stops.push(RouteStop::Start {
        coordinate: departed,
        battery_percent: battery,
    });

    for (i, waypoint) in waypoints.enumerate().map(|(i, w)| (i + 1, w)) {
        let leg = leg_distances_km[i - 1];
        travelled += leg;
        let arriving = battery_after(battery, leg, vehicle.full_range_km);
        if arriving < options.min_battery_threshold_percent - ARRIVAL_TOLERANCE_PERCENT {
            return Err(Error::Stranded {
                position: departed,
                charging_stops: i - 1,
                remaining_km: leg_distances_km[i - 1..].iter().sum(),
                usable_range_km: usable_range_above(
                    battery,
                    options.min_battery_threshold_percent,
                    vehicle.full_range_km,
                ),
            });
        }
        departed = waypoint.coordinate;

        if i == last {
            stops.push(RouteStop::Destination {
                coordinate: waypoint.coordinate,
                distance_from_start_km: travelled,
                battery_after_percent: arriving,
            });
            break;
        }

        let station = waypoint
            .station
            .ok_or_else(|| Error::invalid("intermediate waypoint has no station"))?;
        let next_leg = leg_distances_km[i];
        let energy_kwh = energy_for_distance(next_leg, vehicle.full_range_km, vehicle.battery_capacity_kwh);
        let mut hours = charging_time(
            next_leg,
            vehicle.full_range_km,
            station.power_rating_kw,
            vehicle.battery_capacity_kwh,
        )?;
        if hours < options.min_charge_hours {
            hours = 0.0;
        }

        estimates.push(ChargingEstimate {
            station_id: station.id.clone(),
            next_leg_km: next_leg,
            energy_kwh,
            hours,
        });
        stops.push(RouteStop::ChargingStop {
            coordinate: waypoint.coordinate,
            distance_from_start_km: travelled,
            battery_before_percent: arriving,
            station,
            charging_hours: hours,
        });
        battery = 100.0;
    }

    let total_charging_hours = estimates.iter().map(|e| e.hours).sum();
    Ok(RoutePlan {
        strategy,
        stops,
        total_distance_km: cumulative_distance(&polyline),
        polyline,
        direct_distance_km,
        charging_estimates: estimates,
        total_charging_hours,
    })
}
