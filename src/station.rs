//! Charging stations and the file-backed station directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::polyline::Coordinate;
use crate::traits::StationDirectory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationalStatus {
    Operational,
    UnderMaintenance,
    Closed,
}

/// Immutable snapshot of one charging station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub coordinate: Coordinate,
    pub power_rating_kw: f64,
    pub available_slots: u32,
    pub total_slots: u32,
    pub operational_status: OperationalStatus,
    #[serde(default)]
    pub price_per_kwh: f64,
}

impl Station {
    /// Operational with at least one free slot.
    pub fn is_bookable(&self) -> bool {
        self.available_slots > 0 && self.operational_status == OperationalStatus::Operational
    }

    /// Hours to charge `battery_capacity_kwh` from empty at this station.
    pub fn full_charge_hours(&self, battery_capacity_kwh: f64) -> Result<f64> {
        crate::energy::full_charge_time(battery_capacity_kwh, self.power_rating_kw)
    }

    pub fn validate(&self) -> Result<()> {
        self.coordinate.validate()?;
        if !(self.power_rating_kw.is_finite() && self.power_rating_kw > 0.0) {
            return Err(Error::invalid(format!(
                "station {} has non-positive power rating {}",
                self.id, self.power_rating_kw
            )));
        }
        if self.available_slots > self.total_slots {
            return Err(Error::invalid(format!(
                "station {} has {} available of {} total slots",
                self.id, self.available_slots, self.total_slots
            )));
        }
        Ok(())
    }
}

/// Station directory backed by a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonStationDirectory {
    path: PathBuf,
}

impl JsonStationDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StationDirectory for JsonStationDirectory {
    fn list_stations(&self) -> Result<Vec<Station>> {
        let raw = fs::read_to_string(&self.path)?;
        let stations: Vec<Station> = serde_json::from_str(&raw)?;
        for station in &stations {
            station.validate()?;
        }
        debug!(path = %self.path.display(), count = stations.len(), "loaded station directory");
        Ok(stations)
    }
}
