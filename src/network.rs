use crate::config::HorizonOptions;
use crate::horizon::HorizonEdge;
use crate::math::{closest_point_on_polyline, polyline_length, ClosestPoint, GeoPoint};
use crate::road_graph::{DrivingSide, EdgeMetadata, RoadGraph};
use crate::{EdgeId, EdgeSet};
use smallvec::SmallVec;
use std::borrow::Cow;

pub use routing::Route;

mod routing;

/// Horizons are not expanded past this many edges, so that cycles of
/// zero-length edges terminate.
const MAX_HORIZON_DEPTH: usize = 64;

/// A directed road segment.
#[derive(Clone, Debug)]
pub struct Edge {
    /// The edge ID.
    id: EdgeId,
    /// The centre line of the edge.
    shape: Vec<GeoPoint>,
    /// The length of the shape in m.
    length: f64,
    /// The side of the road vehicles drive on.
    driving_side: DrivingSide,
    /// The names of the street.
    street_names: Vec<String>,
    /// The edges that succeed this one, with their relative weights.
    links_out: Vec<(EdgeId, f64)>,
}

/// The attributes of an edge.
pub struct EdgeAttributes<'a> {
    /// The points defining the centre line of the edge, in the direction of travel.
    pub shape: &'a [GeoPoint],
    /// The side of the road vehicles drive on.
    pub driving_side: DrivingSide,
    /// The names of the street.
    pub street_names: &'a [&'a str],
}

impl Edge {
    fn new(id: EdgeId, attribs: &EdgeAttributes) -> Self {
        Self {
            id,
            shape: attribs.shape.to_vec(),
            length: polyline_length(attribs.shape),
            driving_side: attribs.driving_side,
            street_names: attribs.street_names.iter().map(|s| s.to_string()).collect(),
            links_out: vec![],
        }
    }

    /// Gets the edge ID.
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// Gets the centre line of the edge.
    pub fn shape(&self) -> &[GeoPoint] {
        &self.shape
    }

    /// Gets the length of the edge in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns an iterator over the succeeding edges and the probability of taking each.
    ///
    /// Probabilities are the connection weights normalised to sum to one,
    /// or uniform if no weight is positive.
    pub fn outlets(&self) -> impl Iterator<Item = (EdgeId, f64)> + '_ {
        let total: f64 = self.links_out.iter().map(|(_, w)| w.max(0.0)).sum();
        let count = self.links_out.len() as f64;
        self.links_out.iter().map(move |(id, weight)| {
            let p = if total > 0.0 {
                weight.max(0.0) / total
            } else {
                1.0 / count
            };
            (*id, p)
        })
    }

    /// Gets the metadata describing the edge.
    pub fn metadata(&self) -> EdgeMetadata {
        EdgeMetadata {
            length: self.length,
            driving_side: self.driving_side,
            street_names: self.street_names.clone(),
        }
    }
}

/// An in-memory road graph.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    /// The edges in the network.
    edges: EdgeSet,
}

impl RoadNetwork {
    /// Creates an empty road network.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds an edge to the network.
    pub fn add_edge(&mut self, attributes: &EdgeAttributes) -> EdgeId {
        self.edges.insert_with_key(|id| Edge::new(id, attributes))
    }

    /// Specifies that the end of the `from` edge connects to the start of the `to` edge.
    /// The `weight` is the relative likelihood of a vehicle taking this connection.
    pub fn add_edge_connection(&mut self, from: EdgeId, to: EdgeId, weight: f64) {
        self.edges[from].links_out.push((to, weight));
    }

    /// Gets a reference to the edge with the given ID.
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// Returns an iterator over all the edges in the network.
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Finds the edge whose shape passes closest to `point`.
    pub fn nearest_edge(&self, point: GeoPoint) -> Option<(EdgeId, ClosestPoint)> {
        self.edges
            .values()
            .filter_map(|edge| Some((edge.id, closest_point_on_polyline(&edge.shape, point)?)))
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance))
    }

    /// Builds the horizon ahead of a vehicle on the `root` edge.
    ///
    /// The most probable path is followed for `options.length` m beyond the root.
    /// Branches leaving it are expanded for `options.branch_length` m,
    /// up to `options.expansion_level` levels deep.
    pub fn horizon(&self, root: EdgeId, options: &HorizonOptions) -> Option<HorizonEdge> {
        self.edges.get(root)?;
        Some(self.expand_horizon(root, 1.0, 0, options.length, options, 0))
    }

    fn expand_horizon(
        &self,
        id: EdgeId,
        probability: f64,
        level: u8,
        remaining: f64,
        options: &HorizonOptions,
        depth: usize,
    ) -> HorizonEdge {
        let mut edge = HorizonEdge {
            id,
            level,
            probability,
            outlets: vec![],
        };
        if remaining <= 0.0 || depth >= MAX_HORIZON_DEPTH {
            return edge;
        }

        let outlets = self.edges[id].outlets().collect::<SmallVec<[_; 4]>>();
        let mpp = first_max_index(outlets.iter().map(|(_, p)| *p));

        for (idx, (out_id, p)) in outlets.into_iter().enumerate() {
            let length = self.edges[out_id].length;
            if Some(idx) == mpp {
                let outlet = self.expand_horizon(out_id, p, level, remaining - length, options, depth + 1);
                edge.outlets.push(outlet);
            } else if level < options.expansion_level {
                let budget = match level {
                    0 => options.branch_length,
                    _ => remaining.min(options.branch_length),
                };
                let outlet = self.expand_horizon(out_id, p, level + 1, budget - length, options, depth + 1);
                edge.outlets.push(outlet);
            }
        }

        edge
    }
}

impl RoadGraph for RoadNetwork {
    fn edge_shape(&self, id: EdgeId) -> Option<Cow<'_, [GeoPoint]>> {
        self.edges.get(id).map(|e| Cow::Borrowed(e.shape()))
    }

    fn edge_metadata(&self, id: EdgeId) -> Option<EdgeMetadata> {
        self.edges.get(id).map(|e| e.metadata())
    }
}

/// Gets the index of the first maximal value.
fn first_max_index(values: impl Iterator<Item = f64>) -> Option<usize> {
    values
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (idx, v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((idx, v)),
        })
        .map(|(idx, _)| idx)
}
