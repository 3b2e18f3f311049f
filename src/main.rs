use anyhow::Context;
use clap::Parser;
use hazard_horizon::math::{distance_to_polyline, GeoPoint};
use hazard_horizon::{
    presets, AlertLevel, AlertSink, Config, DrivingSide, EdgeAttributes, EdgeId, HorizonMonitor,
    ObstacleSet, RoadNetwork, RouteRequest, SharedAlertState, Speaker, SpokenPrompt, StopFlag,
    VoicePrompter,
};
use log::{info, warn};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use std::path::PathBuf;

/// The length of each demo road edge in m.
const BLOCK: f64 = 100.0;

/// The number of edges along the main road.
const BLOCKS: usize = 16;

/// The distance between the main road and the parallel detour in m.
const DETOUR_OFFSET: f64 = 150.0;

/// The vehicle's speed in m/s.
const SPEED: f64 = 12.0;

#[derive(Parser)]
#[command(name = "hazard-demo")]
#[command(about = "Simulates a drive past obstacles with hazard alerts", long_about = None)]
struct Args {
    /// JSON configuration file; without one the route leads through an obstacle
    config: Option<PathBuf>,

    /// Plan the route through obstacles, even if the configuration avoids them
    #[arg(long)]
    no_avoidance: bool,

    /// Standard deviation of the simulated GPS error in m
    #[arg(long, default_value_t = 3.0)]
    gps_error: f64,

    /// Probability of an update without a GPS fix
    #[arg(long, default_value_t = 0.05)]
    gps_dropout: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config {
            obstacles: presets::hazard_alert().clone(),
            obstacle_avoidance: false,
            ..Default::default()
        },
    };
    if args.no_avoidance {
        config.obstacle_avoidance = false;
    }
    anyhow::ensure!(
        (0.0..=1.0).contains(&args.gps_dropout),
        "gps dropout must be a probability, got {}",
        args.gps_dropout
    );
    let obstacles = config.active_obstacles();

    let request = RouteRequest {
        obstacle_avoidance: config.obstacle_avoidance,
        ..RouteRequest::new(config.origin, config.destination).avoiding(obstacles.clone())
    };
    for (key, value) in request.query_items()? {
        info!("directions request {key}={value}");
    }

    let (network, start, end) = build_network(config.origin);
    let avoid = if config.obstacle_avoidance {
        obstacles.clone()
    } else {
        ObstacleSet::default()
    };
    let route = network
        .route(start, end, &avoid, config.monitor.road_width_tolerance)
        .context("no route avoids the obstacles")?;
    info!("route of {:.0} m over {} edges", route.length, route.edges.len());

    let alert = SharedAlertState::new();
    let sink = DemoSink {
        shared: alert.clone(),
        voice: VoicePrompter::new(LogSpeaker),
    };
    let stop = StopFlag::new();
    let mut monitor = HorizonMonitor::new(config.monitor, obstacles, sink, stop.clone());

    let mut rng = rand::thread_rng();
    let noise = Normal::new(0.0, args.gps_error)?;
    let mut travelled = 0.0;

    while travelled < route.length && !stop.is_stopped() {
        let actual = point_along(&route.shape, travelled);
        let location = (!rng.gen_bool(args.gps_dropout))
            .then(|| actual.offset(noise.sample(&mut rng), noise.sample(&mut rng)));

        // Match the vehicle to the route edge it is nearest to
        let current = route
            .edges
            .iter()
            .filter_map(|id| {
                let shape = network.get_edge(*id)?.shape();
                Some((*id, distance_to_polyline(shape, actual)?))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
            .unwrap_or(start);

        if let Some(horizon) = network.horizon(current, &config.horizon) {
            monitor.on_horizon_update(&horizon, &network, &location);
            #[cfg(feature = "debug")]
            log::debug!("debug frame {}", monitor.debug());
        }
        travelled += SPEED;
    }

    let state = alert.snapshot();
    match state.level {
        AlertLevel::Death => warn!("drive ended at an obstacle: {}", state.message),
        level => info!("arrived with alert level {level}"),
    }
    Ok(())
}

/// Builds a main road heading south from `origin`, with a parallel road to
/// the west joined at both ends, so that obstacles on the main road can be avoided.
///
/// Returns the network with its first and last edges.
fn build_network(origin: GeoPoint) -> (RoadNetwork, EdgeId, EdgeId) {
    let mut net = RoadNetwork::new();
    let node = |i: usize, east: f64| origin.offset(-BLOCK * i as f64, east);
    let road = |net: &mut RoadNetwork, a: GeoPoint, b: GeoPoint, name: &str| {
        net.add_edge(&EdgeAttributes {
            shape: &[a, b],
            driving_side: DrivingSide::Left,
            street_names: &[name],
        })
    };

    let main = (0..BLOCKS)
        .map(|i| road(&mut net, node(i, 0.0), node(i + 1, 0.0), "Nicholson Street"))
        .collect::<Vec<_>>();
    let detour = (1..BLOCKS - 1)
        .map(|i| road(&mut net, node(i, -DETOUR_OFFSET), node(i + 1, -DETOUR_OFFSET), "Canning Street"))
        .collect::<Vec<_>>();
    let west = road(&mut net, node(1, 0.0), node(1, -DETOUR_OFFSET), "Richardson Street");
    let east = road(&mut net, node(BLOCKS - 1, -DETOUR_OFFSET), node(BLOCKS - 1, 0.0), "Park Street");

    for pair in main.windows(2) {
        net.add_edge_connection(pair[0], pair[1], 0.8);
    }
    for pair in detour.windows(2) {
        net.add_edge_connection(pair[0], pair[1], 1.0);
    }
    net.add_edge_connection(main[0], west, 0.2);
    net.add_edge_connection(west, detour[0], 1.0);
    net.add_edge_connection(detour[detour.len() - 1], east, 1.0);
    net.add_edge_connection(east, main[BLOCKS - 1], 1.0);

    (net, main[0], main[BLOCKS - 1])
}

/// Gets the point `dist` m along a polyline, clamped to its ends.
fn point_along(shape: &[GeoPoint], mut dist: f64) -> GeoPoint {
    for pair in shape.windows(2) {
        let len = pair[0].distance_to(pair[1]);
        if dist <= len && len > 0.0 {
            let t = dist / len;
            return GeoPoint::new(
                pair[0].lat + t * (pair[1].lat - pair[0].lat),
                pair[0].lon + t * (pair[1].lon - pair[0].lon),
            );
        }
        dist -= len;
    }
    shape.last().copied().unwrap_or_default()
}

/// Publishes alerts to the shared state and announces them.
struct DemoSink {
    shared: SharedAlertState,
    voice: VoicePrompter<LogSpeaker>,
}

impl AlertSink for DemoSink {
    fn notify(&mut self, level: AlertLevel, message: &str) {
        self.shared.notify(level, message);
        self.voice.notify(level, message);
    }
}

struct LogSpeaker;

impl Speaker for LogSpeaker {
    fn speak(&mut self, prompt: &SpokenPrompt) {
        info!("speaking \"{}\"", prompt.text);
    }
}
