//! Hazard warnings for heavy vehicles.
//!
//! A [HorizonMonitor] watches the road graph horizon ahead of the vehicle,
//! follows its most probable path and raises an alert when a restricted
//! obstacle, such as a low bridge, lies on that path.

pub use alert::{AlertLevel, AlertSink, AlertState, NavigationControl, SharedAlertState, StopFlag};
pub use cgmath;
pub use config::{Config, HorizonOptions, MonitorConfig, ResetPolicy, TieBreak};
pub use error::{Error, Result};
pub use horizon::{HorizonEdge, MostProbablePath};
pub use monitor::HorizonMonitor;
pub use network::{Edge, EdgeAttributes, RoadNetwork, Route};
pub use obstacle::{presets, Obstacle, ObstacleSet, Restriction, VehicleProfile};
pub use road_graph::{DrivingSide, EdgeMetadata, LocationSource, RoadGraph};
pub use route::{Profile, RouteRequest};
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use voice::{Speaker, SpokenPrompt, VoicePrompter};

mod alert;
mod config;
mod debug;
mod error;
mod horizon;
pub mod math;
mod monitor;
mod network;
mod obstacle;
mod road_graph;
mod route;
pub mod voice;

new_key_type! {
    /// Unique ID of a road graph [Edge].
    pub struct EdgeId;
}

type EdgeSet = SlotMap<EdgeId, Edge>;
