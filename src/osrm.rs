//! OSRM HTTP adapter for road routes.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::polyline::{Coordinate, Polyline};
use crate::traits::{RouteLeg, RoutingProvider};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(Error::unavailable)?;

        Ok(Self { config, client })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.lng,
            origin.lat,
            destination.lng,
            destination.lat
        )
    }
}

impl RoutingProvider for OsrmClient {
    fn route(&self, origin: Coordinate, destination: Coordinate) -> Result<RouteLeg> {
        let url = self.route_url(origin, destination);
        debug!(%url, "requesting OSRM route");

        let body = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmRouteResponse>())
            .map_err(|err| {
                warn!(%err, "OSRM request failed");
                Error::unavailable(err)
            })?;

        into_leg(body, origin, destination)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: [lng, lat].
    coordinates: Vec<[f64; 2]>,
}

fn into_leg(body: OsrmRouteResponse, origin: Coordinate, destination: Coordinate) -> Result<RouteLeg> {
    if body.code != "Ok" {
        return Err(Error::NoRouteFound { origin, destination });
    }

    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or(Error::NoRouteFound { origin, destination })?;

    let points: Vec<Coordinate> = route
        .geometry
        .coordinates
        .into_iter()
        .map(|[lng, lat]| Coordinate::new(lat, lng))
        .collect();
    if points.is_empty() {
        return Err(Error::NoRouteFound { origin, destination });
    }

    Ok(RouteLeg {
        polyline: Polyline::new(points),
        distance_km: route.distance / 1000.0,
    })
}
