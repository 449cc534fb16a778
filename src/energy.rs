//! Linear range and energy model.
//!
//! All functions are pure: the same inputs always give the same output.

use crate::error::{Error, Result};

/// Distance travelable at `battery_percent` with a linear model.
pub fn usable_range(battery_percent: f64, full_range_km: f64) -> f64 {
    usable_range_above(battery_percent, 0.0, full_range_km)
}

/// Distance travelable before the battery drops to `min_threshold_percent`.
///
/// Never negative.
pub fn usable_range_above(battery_percent: f64, min_threshold_percent: f64, full_range_km: f64) -> f64 {
    if battery_percent >= 100.0 && min_threshold_percent <= 0.0 {
        return full_range_km;
    }
    ((battery_percent - min_threshold_percent).max(0.0) / 100.0) * full_range_km
}

/// Battery percentage left after driving `distance_km` from `battery_percent`.
pub fn battery_after(battery_percent: f64, distance_km: f64, full_range_km: f64) -> f64 {
    battery_percent - distance_km / full_range_km * 100.0
}

/// Energy in kWh to drive `distance_km`.
pub fn energy_for_distance(distance_km: f64, full_range_km: f64, battery_capacity_kwh: f64) -> f64 {
    battery_capacity_kwh / full_range_km * distance_km
}

/// Hours at `power_kw` to put back the energy for `distance_km`.
pub fn charging_time(
    distance_km: f64,
    full_range_km: f64,
    power_kw: f64,
    battery_capacity_kwh: f64,
) -> Result<f64> {
    if power_kw.is_nan() || power_kw <= 0.0 {
        return Err(Error::ZeroChargingPower);
    }
    Ok(energy_for_distance(distance_km, full_range_km, battery_capacity_kwh) / power_kw)
}

/// Hours to charge the whole pack from empty at `power_kw`.
pub fn full_charge_time(battery_capacity_kwh: f64, power_kw: f64) -> Result<f64> {
    if power_kw.is_nan() || power_kw <= 0.0 {
        return Err(Error::ZeroChargingPower);
    }
    Ok(battery_capacity_kwh / power_kw)
}
