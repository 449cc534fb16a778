//! Vehicle state at the start of a journey.

use serde::{Deserialize, Serialize};

use crate::energy;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    /// State of charge, 0-100.
    pub battery_percent: f64,
    /// Range on a full battery.
    pub full_range_km: f64,
    pub battery_capacity_kwh: f64,
}

impl VehicleState {
    pub fn new(battery_percent: f64, full_range_km: f64, battery_capacity_kwh: f64) -> Self {
        Self {
            battery_percent,
            full_range_km,
            battery_capacity_kwh,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.battery_percent.is_finite() && (0.0..=100.0).contains(&self.battery_percent)) {
            return Err(Error::invalid(format!(
                "battery percent must be within 0-100, got {}",
                self.battery_percent
            )));
        }
        if !(self.full_range_km.is_finite() && self.full_range_km > 0.0) {
            return Err(Error::invalid(format!(
                "full range must be positive, got {}",
                self.full_range_km
            )));
        }
        if !(self.battery_capacity_kwh.is_finite() && self.battery_capacity_kwh > 0.0) {
            return Err(Error::invalid(format!(
                "battery capacity must be positive, got {}",
                self.battery_capacity_kwh
            )));
        }
        Ok(())
    }

    pub fn usable_range_km(&self) -> f64 {
        energy::usable_range(self.battery_percent, self.full_range_km)
    }
}
