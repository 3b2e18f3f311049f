//! Error types.

use crate::math::GeoPoint;
use thiserror::Error;

/// Errors raised while configuring the monitor or building route requests.
///
/// The horizon monitor itself never fails: missing inputs are skipped.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A coordinate is out of range or not finite.
    #[error("invalid coordinate: {0:?}")]
    InvalidCoordinate(GeoPoint),

    /// A route needs at least an origin and a destination.
    #[error("a route needs at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),

    /// The directions service limits the number of excluded points.
    #[error("too many excluded points: {count} exceeds the limit of {max}")]
    TooManyExclusions {
        /// The number of excluded points requested.
        count: usize,
        /// The maximum supported.
        max: usize,
    },

    /// Failed to read a configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration file.
    #[error("failed to parse configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }
}

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = Error::invalid_config("death distance must be positive");
        assert!(err.to_string().contains("invalid configuration"));

        let err = Error::TooManyExclusions { count: 51, max: 50 };
        assert!(err.to_string().contains("51"));
        assert!(err.to_string().contains("50"));

        let err = Error::TooFewWaypoints(1);
        assert!(err.to_string().contains("got 1"));
    }

    #[test]
    fn from_json() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
