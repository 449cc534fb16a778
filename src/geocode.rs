//! Nominatim HTTP adapter for place-name lookups.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::polyline::Coordinate;
use crate::traits::GeocodingProvider;

#[derive(Debug, Clone)]
pub struct NominatimConfig {
    pub base_url: String,
    /// Nominatim's usage policy requires an identifying agent.
    pub user_agent: String,
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: concat!("ev-route-planner/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NominatimClient {
    config: NominatimConfig,
    client: reqwest::blocking::Client,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(Error::unavailable)?;

        Ok(Self { config, client })
    }
}

impl GeocodingProvider for NominatimClient {
    fn geocode(&self, place_name: &str, region_hint: Option<&str>) -> Result<Coordinate> {
        let query = search_query(place_name, region_hint);
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        debug!(%query, "geocoding place");

        let places = self
            .client
            .get(&url)
            .query(&[("q", query.as_str()), ("format", "json"), ("limit", "1")])
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<Vec<NominatimPlace>>())
            .map_err(|err| {
                warn!(%err, "geocoding request failed");
                Error::unavailable(err)
            })?;

        first_match(places, &query)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    /// Nominatim returns coordinates as strings.
    lat: String,
    lon: String,
}

fn search_query(place_name: &str, region_hint: Option<&str>) -> String {
    match region_hint.map(str::trim).filter(|hint| !hint.is_empty()) {
        Some(hint) => format!("{}, {}", place_name.trim(), hint),
        None => place_name.trim().to_string(),
    }
}

fn first_match(places: Vec<NominatimPlace>, query: &str) -> Result<Coordinate> {
    let place = places.into_iter().next().ok_or_else(|| Error::PlaceNotFound {
        query: query.to_string(),
    })?;

    let parse = |value: &str| {
        value
            .parse::<f64>()
            .map_err(|_| Error::unavailable(format!("geocoder returned malformed coordinate {:?}", value)))
    };
    let coordinate = Coordinate::new(parse(&place.lat)?, parse(&place.lon)?);
    coordinate.validate()?;
    Ok(coordinate)
}
