//! Charging-stop insertion over a road route.
//!
//! Two strategies share the distance kernel, the energy model and the
//! proximity filters:
//!
//! - [`plan_geometry`] walks an already fetched route and hops between
//!   reachable stations by straight-line distance, preferring the nearest
//!   station that makes progress toward the destination.
//! - [`plan_sequential`] walks the reference route until range runs out, then
//!   searches widening lateral bands for the reachable station closest to the
//!   run-out point, and finally fetches a road leg between every pair of stops.
//!
//! The two tie-break rules differ on purpose and produce different plans for
//! the same inputs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::haversine::distance;
use crate::plan::RoutePlan;
use crate::polyline::Coordinate;
use crate::station::Station;
use crate::traits::{RoutingProvider, StationDirectory};
use crate::vehicle::VehicleState;

mod geometry;
mod sequential;

pub use geometry::plan_geometry;
pub use sequential::plan_sequential;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanningStrategy {
    Geometry,
    Sequential,
}

impl fmt::Display for PlanningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningStrategy::Geometry => f.write_str("geometry"),
            PlanningStrategy::Sequential => f.write_str("sequential"),
        }
    }
}

impl FromStr for PlanningStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "geometry" => Ok(PlanningStrategy::Geometry),
            "sequential" => Ok(PlanningStrategy::Sequential),
            other => Err(Error::invalid(format!("unknown planning strategy {:?}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOptions {
    /// First lateral band searched around the route (sequential mode).
    pub lateral_search_start_km: f64,
    /// Band growth per widening step.
    pub lateral_search_step_km: f64,
    /// Widest band; also the corridor of candidate stations in geometry mode.
    pub lateral_search_max_km: f64,
    /// Skip stations that need longer than this to fill the pack from empty.
    pub max_full_charge_time_hours: Option<f64>,
    /// Battery level never planned below.
    pub min_battery_threshold_percent: f64,
    /// Reference points searched past the run-out vertex.
    pub lookahead_points: usize,
    /// Charging estimates below this are reported as zero.
    pub min_charge_hours: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            lateral_search_start_km: 10.0,
            lateral_search_step_km: 10.0,
            lateral_search_max_km: 40.0,
            max_full_charge_time_hours: Some(3.0),
            min_battery_threshold_percent: 0.0,
            lookahead_points: 3,
            min_charge_hours: 0.01,
        }
    }
}

impl PlanOptions {
    pub fn validate(&self) -> Result<()> {
        let positive = |value: f64, name: &str| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::invalid(format!("{} must be positive, got {}", name, value)))
            }
        };

        positive(self.lateral_search_start_km, "lateral_search_start_km")?;
        positive(self.lateral_search_step_km, "lateral_search_step_km")?;
        positive(self.lateral_search_max_km, "lateral_search_max_km")?;
        if self.lateral_search_max_km < self.lateral_search_start_km {
            return Err(Error::invalid(format!(
                "lateral_search_max_km {} is below lateral_search_start_km {}",
                self.lateral_search_max_km, self.lateral_search_start_km
            )));
        }
        if let Some(ceiling) = self.max_full_charge_time_hours {
            positive(ceiling, "max_full_charge_time_hours")?;
        }
        if !(0.0..100.0).contains(&self.min_battery_threshold_percent) {
            return Err(Error::invalid(format!(
                "min_battery_threshold_percent must be within 0-100, got {}",
                self.min_battery_threshold_percent
            )));
        }
        if !(self.min_charge_hours.is_finite() && self.min_charge_hours >= 0.0) {
            return Err(Error::invalid("min_charge_hours must be non-negative"));
        }
        Ok(())
    }

    /// Lateral bands tried in order: start, start + step, ... up to max.
    pub fn search_radii(&self) -> Vec<f64> {
        let mut radii = Vec::new();
        let mut radius = self.lateral_search_start_km;
        while radius <= self.lateral_search_max_km + 1e-9 {
            radii.push(radius);
            radius += self.lateral_search_step_km;
        }
        radii
    }
}

/// Planner bound to a routing provider.
#[derive(Debug, Clone)]
pub struct Planner<R> {
    router: R,
    options: PlanOptions,
}

impl<R: RoutingProvider> Planner<R> {
    pub fn new(router: R, options: PlanOptions) -> Self {
        Self { router, options }
    }

    pub fn options(&self) -> &PlanOptions {
        &self.options
    }

    /// Plans a journey with the chosen strategy.
    ///
    /// Geometry mode makes exactly one routing call for the whole journey;
    /// sequential mode makes one for the reference route and one per leg.
    pub fn plan(
        &self,
        strategy: PlanningStrategy,
        origin: Coordinate,
        destination: Coordinate,
        stations: &[Station],
        vehicle: &VehicleState,
    ) -> Result<RoutePlan> {
        match strategy {
            PlanningStrategy::Geometry => {
                origin.validate()?;
                destination.validate()?;
                let leg = self.router.route(origin, destination)?;
                plan_geometry(&leg.polyline, stations, vehicle, &self.options)
            }
            PlanningStrategy::Sequential => {
                plan_sequential(&self.router, origin, destination, stations, vehicle, &self.options)
            }
        }
    }

    /// Same as [`Planner::plan`], taking a fresh snapshot from `directory`.
    pub fn plan_with_directory<D: StationDirectory + ?Sized>(
        &self,
        strategy: PlanningStrategy,
        origin: Coordinate,
        destination: Coordinate,
        directory: &D,
        vehicle: &VehicleState,
    ) -> Result<RoutePlan> {
        let stations = directory.list_stations()?;
        self.plan(strategy, origin, destination, &stations, vehicle)
    }
}

/// Stable ascending sort by straight-line distance from `origin`.
fn sort_by_distance(origin: Coordinate, stations: &mut [Station]) {
    stations.sort_by(|a, b| distance(origin, a.coordinate).total_cmp(&distance(origin, b.coordinate)));
}

fn remove_station(stations: &mut Vec<Station>, id: &str) {
    stations.retain(|station| station.id != id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_radii_are_ten_to_forty() {
        assert_eq!(PlanOptions::default().search_radii(), vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn custom_radii_stop_at_max() {
        let options = PlanOptions {
            lateral_search_start_km: 5.0,
            lateral_search_step_km: 7.5,
            lateral_search_max_km: 20.0,
            ..PlanOptions::default()
        };
        assert_eq!(options.search_radii(), vec![5.0, 12.5, 20.0]);
    }

    #[test]
    fn validate_rejects_inverted_band() {
        let options = PlanOptions {
            lateral_search_start_km: 50.0,
            ..PlanOptions::default()
        };
        assert!(matches!(options.validate(), Err(Error::InvalidInput { .. })));
    }

    #[test]
    fn validate_rejects_bad_threshold_and_ceiling() {
        let threshold = PlanOptions {
            min_battery_threshold_percent: 100.0,
            ..PlanOptions::default()
        };
        assert!(threshold.validate().is_err());

        let ceiling = PlanOptions {
            max_full_charge_time_hours: Some(0.0),
            ..PlanOptions::default()
        };
        assert!(ceiling.validate().is_err());

        assert!(PlanOptions::default().validate().is_ok());
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Geometry".parse::<PlanningStrategy>().unwrap(), PlanningStrategy::Geometry);
        assert_eq!("sequential".parse::<PlanningStrategy>().unwrap(), PlanningStrategy::Sequential);
        assert!("fastest".parse::<PlanningStrategy>().is_err());
        assert_eq!(PlanningStrategy::Sequential.to_string(), "sequential");
    }
}
