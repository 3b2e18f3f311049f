use crate::math::GeoPoint;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A fixed hazard, such as a low bridge, which a vehicle may need to avoid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// The location of the obstacle.
    #[serde(flatten)]
    pub position: GeoPoint,
    /// The limits a vehicle must be within to pass the obstacle.
    #[serde(flatten)]
    pub limits: Restriction,
}

/// Physical limits imposed by an obstacle. A missing limit is unrestricted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    /// Maximum vehicle height in m.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    /// Maximum vehicle width in m.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    /// Maximum vehicle mass in t.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,
}

/// The dimensions of a vehicle. Unknown dimensions are assumed to violate any limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleProfile {
    /// Height in m.
    pub height: Option<f64>,
    /// Width in m.
    pub width: Option<f64>,
    /// Mass in t.
    pub weight: Option<f64>,
}

impl Obstacle {
    /// Creates an obstacle which restricts all vehicles.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self {
            position: GeoPoint::new(lat, lon),
            limits: Restriction {
                max_height: None,
                max_width: None,
                max_weight: None,
            },
        }
    }

    /// Sets the limits of the obstacle.
    pub fn with_limits(self, limits: Restriction) -> Self {
        Self { limits, ..self }
    }

    /// Determines whether the obstacle is a hazard to the given vehicle.
    pub fn restricts(&self, vehicle: &VehicleProfile) -> bool {
        let exceeds = |limit: Option<f64>, value: Option<f64>| match (limit, value) {
            (Some(limit), Some(value)) => value > limit,
            (Some(_), None) => true,
            (None, _) => false,
        };
        let limits = &self.limits;
        let unrestricted =
            limits.max_height.is_none() && limits.max_width.is_none() && limits.max_weight.is_none();
        unrestricted
            || exceeds(limits.max_height, vehicle.height)
            || exceeds(limits.max_width, vehicle.width)
            || exceeds(limits.max_weight, vehicle.weight)
    }
}

/// An ordered set of obstacles. The order determines which obstacle is reported first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObstacleSet(Vec<Obstacle>);

impl ObstacleSet {
    /// Creates an obstacle set.
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        Self(obstacles)
    }

    /// Returns an iterator over the obstacles in order.
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.0.iter()
    }

    /// The number of obstacles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Gets the obstacles as a slice.
    pub fn as_slice(&self) -> &[Obstacle] {
        &self.0
    }

    /// Returns the subset of obstacles which restrict the given vehicle, preserving order.
    pub fn applicable_to(&self, vehicle: &VehicleProfile) -> ObstacleSet {
        Self(self.0.iter().filter(|o| o.restricts(vehicle)).copied().collect())
    }
}

impl FromIterator<Obstacle> for ObstacleSet {
    fn from_iter<I: IntoIterator<Item = Obstacle>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Built-in obstacle sets and waypoints around Carlton North, Melbourne.
pub mod presets {
    use super::*;

    /// The default start of the demo route.
    pub const ORIGIN: GeoPoint = GeoPoint::new(-37.762789807397574, 144.9732180075918);

    /// The default end of the demo route.
    pub const DESTINATION: GeoPoint = GeoPoint::new(-37.7779878, 144.9710791);

    static NAVIGATOR: Lazy<ObstacleSet> = Lazy::new(|| {
        ObstacleSet::new(vec![
            Obstacle::new(-37.76921612135003, 144.97224769222004),
            Obstacle::new(-37.77214126409389, 144.9668805295816),
            Obstacle::new(-37.76735145190283, 144.9802780675356),
        ])
    });

    static HAZARD_ALERT: Lazy<ObstacleSet> = Lazy::new(|| {
        ObstacleSet::new(vec![
            Obstacle::new(-37.764596444366376, 144.97331472557335),
            Obstacle::new(-37.76921612135003, 144.97224769222004),
            Obstacle::new(-37.77214126409389, 144.9668805295816),
            Obstacle::new(-37.76735145190283, 144.9802780675356),
        ])
    });

    /// The obstacles avoided when planning a route.
    pub fn navigator() -> &'static ObstacleSet {
        &NAVIGATOR
    }

    /// The navigator obstacles plus one placed on the direct route, used to demonstrate alerts.
    pub fn hazard_alert() -> &'static ObstacleSet {
        &HAZARD_ALERT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrestricted_obstacle_applies_to_all() {
        let obstacle = Obstacle::new(0.0, 0.0);
        assert!(obstacle.restricts(&VehicleProfile::default()));
    }

    #[test]
    fn height_limit() {
        let bridge = Obstacle::new(0.0, 0.0).with_limits(Restriction {
            max_height: Some(4.0),
            ..Default::default()
        });
        let van = VehicleProfile { height: Some(2.5), ..Default::default() };
        let truck = VehicleProfile { height: Some(4.3), ..Default::default() };
        assert!(!bridge.restricts(&van));
        assert!(bridge.restricts(&truck));
        assert!(bridge.restricts(&VehicleProfile::default()));
    }

    #[test]
    fn filtering_preserves_order() {
        let low = Obstacle::new(1.0, 1.0).with_limits(Restriction {
            max_height: Some(3.0),
            ..Default::default()
        });
        let high = Obstacle::new(2.0, 2.0).with_limits(Restriction {
            max_height: Some(5.0),
            ..Default::default()
        });
        let any = Obstacle::new(3.0, 3.0);
        let set = ObstacleSet::new(vec![any, high, low]);
        let truck = VehicleProfile { height: Some(4.0), ..Default::default() };
        assert_eq!(set.applicable_to(&truck).as_slice(), &[any, low]);
    }

    #[test]
    fn deserialize_flattened() {
        let set: ObstacleSet =
            serde_json::from_str(r#"[{"lat": -37.5, "lon": 144.9, "max_height": 4.2}, {"lat": 1, "lon": 2}]"#)
                .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].limits.max_height, Some(4.2));
        assert_eq!(set.as_slice()[1].limits, Restriction::default());
    }

    #[test]
    fn presets() {
        assert_eq!(presets::navigator().len(), 3);
        assert_eq!(presets::hazard_alert().len(), 4);
        assert_eq!(&presets::hazard_alert().as_slice()[1..], presets::navigator().as_slice());
    }
}
