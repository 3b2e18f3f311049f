//! Configuration of the monitor, horizon and demo route.

use crate::error::{Error, Result};
use crate::math::GeoPoint;
use crate::obstacle::{presets, ObstacleSet, VehicleProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happens to the alert state when an update finds no obstacle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// Return to [AlertLevel::None](crate::AlertLevel::None).
    #[default]
    ResetWhenClear,
    /// Keep the last alert until another one replaces it.
    Hold,
}

/// Which outlet is chosen when several share the highest probability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The first outlet in horizon order.
    #[default]
    FirstSeen,
    /// The last outlet in horizon order.
    LastSeen,
}

/// Calibration of the horizon monitor. Distances are in m.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Obstacles on the path closer than this raise a danger alert.
    pub alert_distance: f64,
    /// Obstacles on the path closer than this end the guidance session.
    pub death_distance: f64,
    /// The maximum distance between an obstacle and a road's shape
    /// for the obstacle to be considered on the road.
    pub road_width_tolerance: f64,
    pub reset_policy: ResetPolicy,
    pub tie_break: TieBreak,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            alert_distance: 200.0,
            death_distance: 15.0,
            road_width_tolerance: 20.0,
            reset_policy: ResetPolicy::default(),
            tie_break: TieBreak::default(),
        }
    }
}

impl MonitorConfig {
    /// Checks that the thresholds are positive and correctly ordered.
    pub fn validate(&self) -> Result<()> {
        if !(self.death_distance > 0.0) {
            return Err(Error::invalid_config("death_distance must be positive"));
        }
        if !(self.alert_distance > self.death_distance) {
            return Err(Error::invalid_config(
                "alert_distance must be greater than death_distance",
            ));
        }
        if !(self.road_width_tolerance > 0.0) {
            return Err(Error::invalid_config("road_width_tolerance must be positive"));
        }
        Ok(())
    }
}

/// How far ahead the road graph horizon extends. Lengths are in m.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizonOptions {
    /// The length of the most probable path beyond the current edge.
    pub length: f64,
    /// The number of branch levels expanded off the most probable path.
    pub expansion_level: u8,
    /// The length of each expanded branch.
    pub branch_length: f64,
}

impl Default for HorizonOptions {
    fn default() -> Self {
        Self {
            length: 500.0,
            expansion_level: 1,
            branch_length: 50.0,
        }
    }
}

impl HorizonOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.length > 0.0) || !(self.branch_length > 0.0) {
            return Err(Error::invalid_config("horizon lengths must be positive"));
        }
        Ok(())
    }
}

/// The complete configuration of a hazard-aware guidance session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    /// Whether routes are requested with the obstacles excluded.
    pub obstacle_avoidance: bool,
    pub obstacles: ObstacleSet,
    pub vehicle: VehicleProfile,
    pub monitor: MonitorConfig,
    pub horizon: HorizonOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: presets::ORIGIN,
            destination: presets::DESTINATION,
            obstacle_avoidance: true,
            obstacles: presets::navigator().clone(),
            vehicle: VehicleProfile::default(),
            monitor: MonitorConfig::default(),
            horizon: HorizonOptions::default(),
        }
    }
}

impl Config {
    /// Parses and validates a JSON configuration. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks the whole configuration for consistency.
    pub fn validate(&self) -> Result<()> {
        for point in [self.origin, self.destination] {
            if !point.is_valid() {
                return Err(Error::InvalidCoordinate(point));
            }
        }
        if let Some(obstacle) = self.obstacles.iter().find(|o| !o.position.is_valid()) {
            return Err(Error::InvalidCoordinate(obstacle.position));
        }
        self.monitor.validate()?;
        self.horizon.validate()
    }

    /// The obstacles which restrict the configured vehicle.
    pub fn active_obstacles(&self) -> ObstacleSet {
        self.obstacles.applicable_to(&self.vehicle)
    }
}
