//! Tests of a vehicle driving along a planned route.

use hazard_horizon::math::GeoPoint;
use hazard_horizon::voice::{PROMPT_HAZARD_AHEAD, PROMPT_HAZARD_DEAD, PROMPT_HAZARD_ON_ROUTE};
use hazard_horizon::{
    AlertLevel, AlertSink, AlertState, DrivingSide, EdgeAttributes, EdgeId, HorizonMonitor,
    HorizonOptions, MonitorConfig, Obstacle, ObstacleSet, RoadNetwork, SharedAlertState,
    SpokenPrompt, StopFlag, VoicePrompter,
};
use std::sync::mpsc;

fn origin() -> GeoPoint {
    GeoPoint::new(-37.762789807397574, 144.9732180075918)
}

/// A road of ten 100 m edges heading south, with a parallel road 150 m to the
/// east joined after the first edge and before the last.
struct Grid {
    net: RoadNetwork,
    main: Vec<EdgeId>,
}

fn grid() -> Grid {
    let mut net = RoadNetwork::new();
    let node = |i: usize, east: f64| origin().offset(-100.0 * i as f64, east);
    let mut road = |a: GeoPoint, b: GeoPoint| {
        net.add_edge(&EdgeAttributes {
            shape: &[a, b],
            driving_side: DrivingSide::Left,
            street_names: &[],
        })
    };
    let main = (0..10).map(|i| road(node(i, 0.0), node(i + 1, 0.0))).collect::<Vec<_>>();
    let side = (1..9).map(|i| road(node(i, 150.0), node(i + 1, 150.0))).collect::<Vec<_>>();
    let out = road(node(1, 0.0), node(1, 150.0));
    let back = road(node(9, 150.0), node(9, 0.0));

    for pair in main.windows(2) {
        net.add_edge_connection(pair[0], pair[1], 0.7);
    }
    for pair in side.windows(2) {
        net.add_edge_connection(pair[0], pair[1], 1.0);
    }
    net.add_edge_connection(main[0], out, 0.3);
    net.add_edge_connection(out, side[0], 1.0);
    net.add_edge_connection(side[7], back, 1.0);
    net.add_edge_connection(back, main[9], 1.0);
    Grid { net, main }
}

/// Forwards alerts to several sinks.
struct Fanout<A, B>(A, B);

impl<A: AlertSink, B: AlertSink> AlertSink for Fanout<A, B> {
    fn notify(&mut self, level: AlertLevel, message: &str) {
        self.0.notify(level, message);
        self.1.notify(level, message);
    }
}

/// Drives along `route`, updating the monitor at each edge's start and middle.
fn drive<S: AlertSink>(
    grid: &Grid,
    route: &[EdgeId],
    monitor: &mut HorizonMonitor<S, StopFlag>,
) -> Vec<Option<AlertState>> {
    let mut updates = vec![];
    for id in route {
        let shape = grid.net.get_edge(*id).unwrap().shape();
        let (a, b) = (shape[0], shape[shape.len() - 1]);
        let mid = GeoPoint::new(0.5 * (a.lat + b.lat), 0.5 * (a.lon + b.lon));
        let horizon = grid.net.horizon(*id, &HorizonOptions::default()).unwrap();
        for location in [a, mid] {
            updates.push(monitor.on_horizon_update(&horizon, &grid.net, &location));
        }
    }
    updates
}

#[test]
fn drive_into_obstacle() {
    let grid = grid();
    let hazard = origin().offset(-650.0, 0.0);
    let obstacles = ObstacleSet::new(vec![Obstacle::new(hazard.lat, hazard.lon)]);

    let shared = SharedAlertState::new();
    let (tx, rx) = mpsc::channel();
    let sink = Fanout(shared.clone(), Fanout(tx, VoicePrompter::new(Vec::<SpokenPrompt>::new())));
    let stop = StopFlag::new();
    let mut monitor = HorizonMonitor::new(MonitorConfig::default(), obstacles, sink, stop.clone());

    let updates = drive(&grid, &grid.main, &mut monitor);
    assert!(stop.is_stopped());
    assert_eq!(stop.stop_count(), 1);
    assert_eq!(shared.level(), AlertLevel::Death);

    // Every update after reaching the obstacle is ignored
    let reached = updates.iter().position(|u| u.as_ref().map(|s| s.level) == Some(AlertLevel::Death)).unwrap();
    assert!(updates[reached + 1..].iter().all(Option::is_none));

    // Levels only rise on the way to the obstacle
    let levels = rx.try_iter().map(|s| s.level).collect::<Vec<_>>();
    assert!(levels.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(levels.first(), Some(&AlertLevel::Warning));
    assert_eq!(levels.last(), Some(&AlertLevel::Death));

    let prompts = monitor.sink().1 .1.speaker();
    assert_eq!(
        prompts.as_slice(),
        &[PROMPT_HAZARD_ON_ROUTE, PROMPT_HAZARD_AHEAD, PROMPT_HAZARD_DEAD]
    );
}

#[test]
fn planned_route_avoids_obstacle() {
    let grid = grid();
    let hazard = origin().offset(-650.0, 0.0);
    let obstacles = ObstacleSet::new(vec![Obstacle::new(hazard.lat, hazard.lon)]);
    let config = MonitorConfig::default();

    let route = grid
        .net
        .route(grid.main[0], grid.main[9], &obstacles, config.road_width_tolerance)
        .unwrap();
    assert!(!route.edges.contains(&grid.main[6]));
    assert_eq!(route.edges.first(), Some(&grid.main[0]));
    assert_eq!(route.edges.last(), Some(&grid.main[9]));

    let stop = StopFlag::new();
    let mut monitor = HorizonMonitor::new(config, obstacles, Vec::<AlertState>::new(), stop.clone());
    let updates = drive(&grid, &route.edges, &mut monitor);

    assert!(updates.iter().all(Option::is_some));
    assert_eq!(stop.stop_count(), 0);
    // The obstacle is never on the predicted path
    assert!(monitor.sink().is_empty());
    assert_eq!(monitor.state().level, AlertLevel::None);
}
