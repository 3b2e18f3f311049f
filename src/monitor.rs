use crate::alert::{AlertLevel, AlertSink, AlertState, NavigationControl};
use crate::config::{MonitorConfig, ResetPolicy};
use crate::debug::{debug_circle, debug_polyline};
#[cfg(feature = "debug")]
use crate::debug::take_debug_frame;
use crate::horizon::{HorizonEdge, MostProbablePath};
use crate::math::{distance_to_polyline, GeoPoint};
use crate::obstacle::ObstacleSet;
use crate::road_graph::{DrivingSide, LocationSource, RoadGraph};
use log::{debug, info, warn};

/// Watches the road graph horizon for obstacles on the vehicle's predicted path.
///
/// The monitor is driven by whoever owns the positioning loop, which calls
/// [on_horizon_update](Self::on_horizon_update) each time the horizon changes.
/// Alerts are reported to the `sink`; on reaching an obstacle, guidance is
/// stopped through `navigation`.
pub struct HorizonMonitor<S, N> {
    config: MonitorConfig,
    /// The obstacles to watch for, in reporting order.
    obstacles: ObstacleSet,
    /// The latest alert.
    state: AlertState,
    /// Whether guidance has been stopped because the vehicle reached an obstacle.
    stopped: bool,
    sink: S,
    navigation: N,
    /// Debugging information from the previous update.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl<S: AlertSink, N: NavigationControl> HorizonMonitor<S, N> {
    /// Creates a monitor with no active alert.
    pub fn new(config: MonitorConfig, obstacles: ObstacleSet, sink: S, navigation: N) -> Self {
        Self {
            config,
            obstacles,
            state: AlertState::default(),
            stopped: false,
            sink,
            navigation,
            #[cfg(feature = "debug")]
            debug: serde_json::Value::Null,
        }
    }

    /// Gets the latest alert.
    pub fn state(&self) -> &AlertState {
        &self.state
    }

    /// Whether the vehicle has reached an obstacle and guidance was stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Gets the monitor's configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Gets the obstacles being watched.
    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Gets a reference to the alert sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Gets a reference to the navigation control.
    pub fn navigation(&self) -> &N {
        &self.navigation
    }

    /// Clears the alert and re-arms the monitor after guidance was stopped,
    /// e.g. when a new guidance session starts.
    pub fn reset(&mut self) {
        self.stopped = false;
        if self.state.level != AlertLevel::None {
            raise(&mut self.state, &mut self.sink, AlertLevel::None, String::new());
        }
    }

    /// Gets the debugging information for the previous update as a JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Evaluates a new horizon.
    ///
    /// # Parameters
    /// * `root` - The horizon tree, rooted at the edge the vehicle is on
    /// * `graph` - Provides the shape and metadata of the horizon's edges
    /// * `location` - Provides the vehicle's position
    ///
    /// # Returns
    /// The alert after the update, or `None` if the horizon was not evaluated
    /// because the vehicle's position is unknown or guidance has been stopped.
    pub fn on_horizon_update(
        &mut self,
        root: &HorizonEdge,
        graph: &impl RoadGraph,
        location: &impl LocationSource,
    ) -> Option<AlertState> {
        if self.stopped {
            debug!("guidance stopped, ignoring horizon update");
            return None;
        }
        let Some(vehicle) = location.current_location() else {
            debug!("no vehicle location, ignoring horizon update");
            return None;
        };

        self.evaluate(root, graph, vehicle);

        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }

        Some(self.state.clone())
    }

    fn evaluate(&mut self, root: &HorizonEdge, graph: &impl RoadGraph, vehicle: GeoPoint) {
        let on_branch = self.check_branches(root, graph);
        let on_path = match self.check_path(root, graph, vehicle) {
            PathCheck::Clear => false,
            PathCheck::Ahead => true,
            PathCheck::Halted => return,
        };

        let clear = !on_branch && !on_path && self.state.level != AlertLevel::None;
        if clear && self.config.reset_policy == ResetPolicy::ResetWhenClear {
            raise(&mut self.state, &mut self.sink, AlertLevel::None, String::new());
        }
    }

    /// Warns about obstacles on the edges leaving the current one which the
    /// vehicle is not expected to take. Returns whether a warning was raised.
    fn check_branches(&mut self, root: &HorizonEdge, graph: &impl RoadGraph) -> bool {
        let Self {
            config,
            obstacles,
            state,
            sink,
            ..
        } = self;
        let mut raised = false;

        for branch in root.branches(config.tie_break) {
            let Some(shape) = graph.edge_shape(branch.id) else {
                debug!("no shape for branch {:?}, skipping", branch.id);
                continue;
            };
            for obstacle in obstacles.iter() {
                if !is_on_road(&shape, obstacle.position, config.road_width_tolerance) {
                    continue;
                }
                let side = graph
                    .edge_metadata(branch.id)
                    .map(|meta| meta.driving_side)
                    .unwrap_or_default();
                let message = match side {
                    DrivingSide::Left => "Obstacle on your left",
                    DrivingSide::Right => "Obstacle on your right",
                    DrivingSide::Unknown => {
                        debug!("obstacle on branch {:?} with unknown driving side", branch.id);
                        continue;
                    }
                };
                raise(state, sink, AlertLevel::Warning, message.to_string());
                raised = true;
            }
        }

        raised
    }

    /// Classifies the obstacles on the most probable path by their distance from the vehicle.
    /// The first obstacle close enough for a danger alert ends the check.
    fn check_path(&mut self, root: &HorizonEdge, graph: &impl RoadGraph, vehicle: GeoPoint) -> PathCheck {
        let Self {
            config,
            obstacles,
            state,
            stopped,
            sink,
            navigation,
            ..
        } = self;
        let tolerance = config.road_width_tolerance;
        let path = MostProbablePath::build(root, graph, config.tie_break);
        debug_polyline("most_probable_path", &path.shape);

        let mut result = PathCheck::Clear;
        for obstacle in obstacles.iter() {
            if !is_on_road(&path.shape, obstacle.position, tolerance) {
                continue;
            }
            debug_circle("obstacle_on_path", obstacle.position, tolerance);

            let distance = obstacle.position.distance_to(vehicle);
            if distance < config.death_distance {
                warn!("vehicle reached obstacle at {:?}, stopping guidance", obstacle.position);
                raise(state, sink, AlertLevel::Death, "You are now dead".to_string());
                *stopped = true;
                navigation.stop();
                return PathCheck::Halted;
            }

            let message = format!("Obstacle ahead in {:.0} meters", distance);
            if distance < config.alert_distance {
                raise(state, sink, AlertLevel::Danger, message);
                return PathCheck::Halted;
            }
            raise(state, sink, AlertLevel::Warning, message);
            result = PathCheck::Ahead;
        }

        result
    }
}

/// Updates the alert and forwards it to the sink.
fn raise(state: &mut AlertState, sink: &mut impl AlertSink, level: AlertLevel, message: String) {
    if level != state.level {
        info!("alert {} -> {}: {}", state.level, level, message);
    }
    sink.notify(level, &message);
    *state = AlertState { level, message };
}

/// The outcome of checking the most probable path.
enum PathCheck {
    /// No obstacle is on the path.
    Clear,
    /// Obstacles are on the path, but none are close.
    Ahead,
    /// An obstacle is close; evaluation stops here.
    Halted,
}

/// Whether a point is within `tolerance` m of a road's shape.
fn is_on_road(shape: &[GeoPoint], point: GeoPoint, tolerance: f64) -> bool {
    distance_to_polyline(shape, point).map_or(false, |d| d < tolerance)
}

#[cfg(all(test, feature = "debug"))]
mod tests {
    use super::*;
    use crate::alert::StopFlag;
    use crate::network::{EdgeAttributes, RoadNetwork};
    use crate::obstacle::Obstacle;
    use crate::HorizonOptions;

    #[test]
    fn debug_frame_records_path_and_obstacle() {
        let origin = GeoPoint::new(-37.7628, 144.9732);
        let mut net = RoadNetwork::new();
        let edge = net.add_edge(&EdgeAttributes {
            shape: &[origin, origin.offset(-300.0, 0.0)],
            driving_side: DrivingSide::Left,
            street_names: &[],
        });
        let horizon = net.horizon(edge, &HorizonOptions::default()).unwrap();
        let hazard = origin.offset(-250.0, 0.0);
        let obstacles = ObstacleSet::new(vec![Obstacle::new(hazard.lat, hazard.lon)]);
        let mut monitor = HorizonMonitor::new(
            MonitorConfig::default(),
            obstacles,
            Vec::<AlertState>::new(),
            StopFlag::new(),
        );

        monitor.on_horizon_update(&horizon, &net, &origin);
        let frame = monitor.debug();
        let items = frame.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["type"], "polyline");
        assert_eq!(items[0]["name"], "most_probable_path");
        assert_eq!(items[0]["points"].as_array().unwrap().len(), 2);
        assert_eq!(items[1]["type"], "circle");
        assert_eq!(items[1]["name"], "obstacle_on_path");
        assert_eq!(items[1]["radius"], 20.0);

        // The frame only covers the latest update
        monitor.on_horizon_update(&horizon, &net, &origin);
        assert_eq!(monitor.debug().as_array().unwrap().len(), 2);
    }
}
