//! Planner configuration from environment.

use std::env;
use std::str::FromStr;

use crate::geocode::NominatimConfig;
use crate::osrm::OsrmConfig;
use crate::planner::PlanOptions;

#[derive(Debug, Clone, Default)]
pub struct PlannerConfig {
    pub osrm: OsrmConfig,
    pub nominatim: NominatimConfig,
    pub options: PlanOptions,
}

impl PlannerConfig {
    /// Reads `EV_*` variables; missing or unparsable values keep defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|value| parse::<f64>(&value));
        let defaults = PlannerConfig::default();
        let timeout_secs = lookup("EV_HTTP_TIMEOUT_SECS").and_then(|value| parse::<u64>(&value));

        Self {
            osrm: OsrmConfig {
                base_url: lookup("EV_OSRM_URL").unwrap_or(defaults.osrm.base_url),
                profile: lookup("EV_OSRM_PROFILE").unwrap_or(defaults.osrm.profile),
                timeout_secs: timeout_secs.unwrap_or(defaults.osrm.timeout_secs),
            },
            nominatim: NominatimConfig {
                base_url: lookup("EV_NOMINATIM_URL").unwrap_or(defaults.nominatim.base_url),
                timeout_secs: timeout_secs.unwrap_or(defaults.nominatim.timeout_secs),
                ..defaults.nominatim
            },
            options: PlanOptions {
                lateral_search_start_km: parsed("EV_LATERAL_START_KM")
                    .unwrap_or(defaults.options.lateral_search_start_km),
                lateral_search_step_km: parsed("EV_LATERAL_STEP_KM")
                    .unwrap_or(defaults.options.lateral_search_step_km),
                lateral_search_max_km: parsed("EV_LATERAL_MAX_KM")
                    .unwrap_or(defaults.options.lateral_search_max_km),
                max_full_charge_time_hours: parsed("EV_MAX_FULL_CHARGE_HOURS")
                    .or(defaults.options.max_full_charge_time_hours),
                min_battery_threshold_percent: parsed("EV_MIN_BATTERY_PERCENT")
                    .unwrap_or(defaults.options.min_battery_threshold_percent),
                ..defaults.options
            },
        }
    }
}

fn parse<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}
