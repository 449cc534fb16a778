//! A straight corridor running north from (0, 0).
//!
//! Along a meridian, haversine distance is exactly proportional to latitude,
//! so "40 km north" is 40 km by the planner's own arithmetic.

use ev_route_planner::haversine::{HaversineRouter, KM_PER_DEGREE};
use ev_route_planner::traits::RoutingProvider;
use ev_route_planner::{Coordinate, OperationalStatus, Polyline, Station, VehicleState};

pub const ORIGIN: Coordinate = Coordinate::new(0.0, 0.0);

/// Point `km` north of the origin.
pub fn north(km: f64) -> Coordinate {
    Coordinate::new(km / KM_PER_DEGREE, 0.0)
}

/// Point `km_north` along the corridor, offset `km_east` sideways.
pub fn beside(km_north: f64, km_east: f64) -> Coordinate {
    let lat = km_north / KM_PER_DEGREE;
    Coordinate::new(lat, km_east / (KM_PER_DEGREE * lat.to_radians().cos()))
}

/// Corridor route from the origin to `km` north, a point every ~5 km.
pub fn corridor(km: f64) -> Polyline {
    HaversineRouter::new(5.0)
        .route(ORIGIN, north(km))
        .map(|leg| leg.polyline)
        .expect("corridor route")
}

pub fn vehicle(battery_percent: f64, full_range_km: f64, battery_capacity_kwh: f64) -> VehicleState {
    VehicleState::new(battery_percent, full_range_km, battery_capacity_kwh)
}

/// Builder for test stations with sensible defaults.
#[derive(Debug, Clone)]
pub struct StationBuilder {
    station: Station,
}

pub fn station(id: &str) -> StationBuilder {
    StationBuilder {
        station: Station {
            id: id.to_string(),
            name: format!("Charger {}", id),
            coordinate: ORIGIN,
            power_rating_kw: 50.0,
            available_slots: 2,
            total_slots: 4,
            operational_status: OperationalStatus::Operational,
            price_per_kwh: 0.35,
        },
    }
}

impl StationBuilder {
    pub fn at(mut self, coordinate: Coordinate) -> Self {
        self.station.coordinate = coordinate;
        self
    }

    pub fn north(self, km: f64) -> Self {
        self.at(north(km))
    }

    pub fn power(mut self, kw: f64) -> Self {
        self.station.power_rating_kw = kw;
        self
    }

    pub fn slots(mut self, available: u32, total: u32) -> Self {
        self.station.available_slots = available;
        self.station.total_slots = total;
        self
    }

    pub fn status(mut self, status: OperationalStatus) -> Self {
        self.station.operational_status = status;
        self
    }

    pub fn build(self) -> Station {
        self.station
    }
}

/// Ids of the charging stops of a plan, in order.
pub fn stop_ids(plan: &ev_route_planner::RoutePlan) -> Vec<String> {
    plan.charging_stops()
        .filter_map(|stop| stop.station())
        .map(|station| station.id.clone())
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}
