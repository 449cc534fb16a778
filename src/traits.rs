//! Contracts for the external collaborators of the planner.
//!
//! The planner only needs drivable geometry, place lookups and a station
//! snapshot. Concrete adapters (OSRM, Nominatim, a JSON file) implement these
//! traits; tests implement them with in-memory fakes.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::polyline::{Coordinate, Polyline};
use crate::station::Station;

/// One road segment between two consecutive points of a journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub polyline: Polyline,
    /// Real-world distance as reported by the provider.
    pub distance_km: f64,
}

/// Provides drivable geometry between two coordinates.
///
/// Fails with `NoRouteFound` or `ProviderUnavailable`.
pub trait RoutingProvider {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteLeg>;
}

/// Resolves a place name to coordinates.
///
/// Fails with `PlaceNotFound` when nothing matches.
pub trait GeocodingProvider {
    fn geocode(&self, place_name: &str, region_hint: Option<&str>) -> Result<Coordinate>;
}

/// Full snapshot of the charging network.
pub trait StationDirectory {
    fn list_stations(&self) -> Result<Vec<Station>>;
}

impl<T: RoutingProvider + ?Sized> RoutingProvider for &T {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteLeg> {
        (**self).route(origin, destination)
    }
}

impl<T: GeocodingProvider + ?Sized> GeocodingProvider for &T {
    fn geocode(&self, place_name: &str, region_hint: Option<&str>) -> Result<Coordinate> {
        (**self).geocode(place_name, region_hint)
    }
}

impl StationDirectory for Vec<Station> {
    fn list_stations(&self) -> Result<Vec<Station>> {
        Ok(self.clone())
    }
}
