//! Error types shared by the planner, its providers and the CLI.

use thiserror::Error;

use crate::polyline::Coordinate;

/// Convenient result alias for the planner crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed coordinates, non-positive range/capacity, bad options.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The routing provider answered but has no drivable path.
    #[error("no route found from {origin} to {destination}")]
    NoRouteFound {
        origin: Coordinate,
        destination: Coordinate,
    },

    /// Transport or status failure talking to an external provider.
    #[error("provider unavailable: {message}")]
    ProviderUnavailable { message: String },

    /// The geocoder returned no match.
    #[error("no place found for {query:?}")]
    PlaceNotFound { query: String },

    /// No sequence of reachable stations connects origin to destination.
    ///
    /// This is a legitimate planning outcome, not a bug. Callers may relax
    /// constraints (wider search band, lower threshold) and retry.
    #[error(
        "stranded at {position} after {charging_stops} charging stop(s): \
         {remaining_km:.1} km to go, {usable_range_km:.1} km usable range"
    )]
    Stranded {
        position: Coordinate,
        charging_stops: usize,
        remaining_km: f64,
        usable_range_km: f64,
    },

    /// A zero (or negative) charging power reached the energy model.
    #[error("charging power must be positive")]
    ZeroChargingPower,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn unavailable(message: impl std::fmt::Display) -> Self {
        Error::ProviderUnavailable {
            message: message.to_string(),
        }
    }

    /// True when planning finished without a feasible plan.
    pub fn is_stranded(&self) -> bool {
        matches!(self, Error::Stranded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stranded_is_distinguishable() {
        let err = Error::Stranded {
            position: Coordinate::new(1.0, 2.0),
            charging_stops: 0,
            remaining_km: 120.0,
            usable_range_km: 80.0,
        };
        assert!(err.is_stranded());
        assert!(!Error::ZeroChargingPower.is_stranded());
    }

    #[test]
    fn stranded_message_mentions_distances() {
        let err = Error::Stranded {
            position: Coordinate::new(1.0, 2.0),
            charging_stops: 2,
            remaining_km: 120.04,
            usable_range_km: 80.0,
        };
        let message = err.to_string();
        assert!(message.contains("2 charging stop(s)"));
        assert!(message.contains("120.0 km"));
        assert!(message.contains("80.0 km"));
    }
}
