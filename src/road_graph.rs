//! Contracts with the road graph, positioning and guidance subsystems.

use crate::math::GeoPoint;
use crate::EdgeId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The side of the road on which vehicles drive along an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrivingSide {
    Left,
    Right,
    #[default]
    Unknown,
}

/// Descriptive information about a road edge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeMetadata {
    /// The length of the edge in m.
    pub length: f64,
    /// The side of the road vehicles drive on.
    pub driving_side: DrivingSide,
    /// The names of the street the edge belongs to.
    pub street_names: Vec<String>,
}

/// Read-only access to the geometry and attributes of a road graph.
pub trait RoadGraph {
    /// Gets the shape of an edge as an ordered sequence of points, if known.
    fn edge_shape(&self, id: EdgeId) -> Option<Cow<'_, [GeoPoint]>>;

    /// Gets the metadata of an edge, if known.
    fn edge_metadata(&self, id: EdgeId) -> Option<EdgeMetadata>;
}

impl<T: RoadGraph + ?Sized> RoadGraph for &T {
    fn edge_shape(&self, id: EdgeId) -> Option<Cow<'_, [GeoPoint]>> {
        (**self).edge_shape(id)
    }

    fn edge_metadata(&self, id: EdgeId) -> Option<EdgeMetadata> {
        (**self).edge_metadata(id)
    }
}

/// Provides the vehicle's current position.
pub trait LocationSource {
    /// The current location, or `None` if no fix is available.
    fn current_location(&self) -> Option<GeoPoint>;
}

impl LocationSource for GeoPoint {
    fn current_location(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

impl LocationSource for Option<GeoPoint> {
    fn current_location(&self) -> Option<GeoPoint> {
        *self
    }
}
