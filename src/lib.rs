//! EV route planner
//!
//! Plans charging stops along a road route so an electric vehicle never runs
//! out of charge. Routing, geocoding and the station network are external
//! collaborators behind the traits in [`traits`].

pub mod config;
pub mod energy;
pub mod error;
pub mod geocode;
pub mod haversine;
pub mod osrm;
pub mod plan;
pub mod planner;
pub mod polyline;
pub mod proximity;
pub mod station;
pub mod traits;
pub mod vehicle;

pub use error::{Error, Result};
pub use plan::{ChargingEstimate, RoutePlan, RouteStop};
pub use planner::{plan_geometry, plan_sequential, PlanOptions, Planner, PlanningStrategy};
pub use polyline::{Coordinate, Polyline};
pub use station::{OperationalStatus, Station};
pub use vehicle::VehicleState;
