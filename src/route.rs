//! Route requests for an external directions service.

use crate::error::{Error, Result};
use crate::math::GeoPoint;
use crate::obstacle::ObstacleSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// The most points the directions service will exclude from a route.
pub const MAX_EXCLUDED_POINTS: usize = 50;

/// The mode of travel to route for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Driving,
    DrivingTraffic,
}

impl Profile {
    /// The profile identifier understood by the directions service.
    pub fn identifier(&self) -> &'static str {
        match self {
            Profile::Driving => "mapbox/driving",
            Profile::DrivingTraffic => "mapbox/driving-traffic",
        }
    }
}

/// A request for a route between waypoints, optionally avoiding obstacles.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteRequest {
    /// The waypoints, starting at the origin and ending at the destination.
    pub waypoints: Vec<GeoPoint>,
    pub profile: Profile,
    /// Obstacles the route should not pass.
    pub avoid: ObstacleSet,
    /// Whether the obstacles are sent to the service. When disabled the
    /// route may lead through obstacles, which is useful to demonstrate alerts.
    pub obstacle_avoidance: bool,
}

impl RouteRequest {
    /// Creates a request from `origin` to `destination`.
    pub fn new(origin: GeoPoint, destination: GeoPoint) -> Self {
        Self {
            waypoints: vec![origin, destination],
            profile: Profile::default(),
            avoid: ObstacleSet::default(),
            obstacle_avoidance: true,
        }
    }

    /// Sets the obstacles to avoid.
    pub fn avoiding(self, avoid: ObstacleSet) -> Self {
        Self { avoid, ..self }
    }

    /// Replaces the destination, as when the user picks a new one on the map.
    pub fn set_destination(&mut self, destination: GeoPoint) {
        if self.waypoints.len() >= 2 {
            self.waypoints.pop();
        }
        self.waypoints.push(destination);
    }

    /// Builds the query items for the request.
    ///
    /// The `excludes` item is only present if avoidance is enabled and there are obstacles.
    pub fn query_items(&self) -> Result<Vec<(&'static str, String)>> {
        if self.waypoints.len() < 2 {
            return Err(Error::TooFewWaypoints(self.waypoints.len()));
        }
        if let Some(point) = self.waypoints.iter().find(|p| !p.is_valid()) {
            return Err(Error::InvalidCoordinate(*point));
        }

        let mut items = vec![
            ("profile", self.profile.identifier().to_string()),
            (
                "coordinates",
                self.waypoints
                    .iter()
                    .map(|p| format!("{},{}", p.lon, p.lat))
                    .join(";"),
            ),
        ];
        if let Some(excludes) = self.excludes()? {
            items.push(("excludes", excludes));
        }
        Ok(items)
    }

    /// Formats the obstacles as the value of the `excludes` query item,
    /// e.g. `point(144.97 -37.76),point(144.96 -37.77)`.
    pub fn excludes(&self) -> Result<Option<String>> {
        if !self.obstacle_avoidance || self.avoid.is_empty() {
            return Ok(None);
        }
        if self.avoid.len() > MAX_EXCLUDED_POINTS {
            return Err(Error::TooManyExclusions {
                count: self.avoid.len(),
                max: MAX_EXCLUDED_POINTS,
            });
        }
        if let Some(obstacle) = self.avoid.iter().find(|o| !o.position.is_valid()) {
            return Err(Error::InvalidCoordinate(obstacle.position));
        }
        let value = self
            .avoid
            .iter()
            .map(|o| format!("point({} {})", o.position.lon, o.position.lat))
            .join(",");
        Ok(Some(value))
    }
}
