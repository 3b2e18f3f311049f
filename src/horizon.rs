//! The road graph horizon and its most probable path.

use crate::config::TieBreak;
use crate::math::{extend_polyline, polyline_length, GeoPoint};
use crate::road_graph::RoadGraph;
use crate::EdgeId;
use log::debug;
use smallvec::SmallVec;

/// A node in the horizon tree: an edge the vehicle may travel along,
/// and the edges it may continue onto.
#[derive(Clone, Debug, PartialEq)]
pub struct HorizonEdge {
    /// The edge ID.
    pub id: EdgeId,
    /// The branching level; 0 for the most probable path of the horizon.
    pub level: u8,
    /// The probability of taking this edge from its parent, in [0, 1].
    pub probability: f64,
    /// The edges which succeed this one.
    pub outlets: Vec<HorizonEdge>,
}

impl HorizonEdge {
    /// Creates an edge with no outlets.
    pub fn new(id: EdgeId, probability: f64) -> Self {
        Self {
            id,
            level: 0,
            probability,
            outlets: vec![],
        }
    }

    /// Adds an outlet edge.
    pub fn with_outlet(mut self, outlet: HorizonEdge) -> Self {
        self.outlets.push(outlet);
        self
    }

    /// Gets the index of the outlet with the highest probability.
    pub fn most_probable_outlet_index(&self, tie_break: TieBreak) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, outlet) in self.outlets.iter().enumerate() {
            let better = match best {
                None => true,
                Some((_, p)) => match tie_break {
                    TieBreak::FirstSeen => outlet.probability > p,
                    TieBreak::LastSeen => outlet.probability >= p,
                },
            };
            if better {
                best = Some((idx, outlet.probability));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Gets the outlet with the highest probability.
    pub fn most_probable_outlet(&self, tie_break: TieBreak) -> Option<&HorizonEdge> {
        self.most_probable_outlet_index(tie_break)
            .map(|idx| &self.outlets[idx])
    }

    /// Returns an iterator over the outlets which are not the most probable one.
    pub fn branches(&self, tie_break: TieBreak) -> impl Iterator<Item = &HorizonEdge> {
        let mpp = self.most_probable_outlet_index(tie_break);
        self.outlets
            .iter()
            .enumerate()
            .filter(move |(idx, _)| Some(*idx) != mpp)
            .map(|(_, edge)| edge)
    }

    /// Returns an iterator over this edge and its most probable successors.
    pub fn most_probable_chain(&self, tie_break: TieBreak) -> impl Iterator<Item = &HorizonEdge> {
        std::iter::successors(Some(self), move |edge| edge.most_probable_outlet(tie_break))
    }
}

/// The single chain of edges obtained by always taking the most probable outlet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MostProbablePath {
    /// The edges along the path, starting at the root.
    pub edges: SmallVec<[EdgeId; 8]>,
    /// The concatenated shape of the edges.
    pub shape: Vec<GeoPoint>,
    /// The total length of the edges with known metadata, in m.
    pub length: f64,
}

impl MostProbablePath {
    /// Builds the most probable path through a horizon.
    ///
    /// Shapes are concatenated without repeating the shared vertex at each join.
    /// Edges without a shape or metadata contribute nothing to the respective field.
    pub fn build(root: &HorizonEdge, graph: &impl RoadGraph, tie_break: TieBreak) -> Self {
        let mut path = Self::default();

        for edge in root.most_probable_chain(tie_break) {
            path.edges.push(edge.id);

            match graph.edge_shape(edge.id) {
                Some(shape) => extend_polyline(&mut path.shape, &shape),
                None => debug!("no shape for edge {:?}, skipping", edge.id),
            }

            match graph.edge_metadata(edge.id) {
                Some(meta) => path.length += meta.length,
                None => debug!("no metadata for edge {:?}, skipping", edge.id),
            }
        }

        path
    }

    /// The length of the concatenated shape in m.
    pub fn shape_length(&self) -> f64 {
        polyline_length(&self.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn id(n: u64) -> EdgeId {
        EdgeId::from(KeyData::from_ffi(n))
    }

    #[test]
    fn strict_max_keeps_first() {
        let root = HorizonEdge::new(id(1), 1.0)
            .with_outlet(HorizonEdge::new(id(2), 0.4))
            .with_outlet(HorizonEdge::new(id(3), 0.4))
            .with_outlet(HorizonEdge::new(id(4), 0.2));
        assert_eq!(root.most_probable_outlet(TieBreak::FirstSeen).unwrap().id, id(2));
        assert_eq!(root.most_probable_outlet(TieBreak::LastSeen).unwrap().id, id(3));
        let branches = root
            .branches(TieBreak::FirstSeen)
            .map(|e| e.id)
            .collect::<Vec<_>>();
        assert_eq!(branches, vec![id(3), id(4)]);
    }

    #[test]
    fn no_outlets() {
        let root = HorizonEdge::new(id(1), 1.0);
        assert!(root.most_probable_outlet(TieBreak::FirstSeen).is_none());
        assert_eq!(root.branches(TieBreak::FirstSeen).count(), 0);
        assert_eq!(root.most_probable_chain(TieBreak::FirstSeen).count(), 1);
    }

    #[test]
    fn chain_follows_highest_probability() {
        let root = HorizonEdge::new(id(1), 1.0)
            .with_outlet(HorizonEdge::new(id(2), 0.3))
            .with_outlet(
                HorizonEdge::new(id(3), 0.7)
                    .with_outlet(HorizonEdge::new(id(4), 0.1))
                    .with_outlet(HorizonEdge::new(id(5), 0.9)),
            );
        let chain = root
            .most_probable_chain(TieBreak::FirstSeen)
            .map(|e| e.id)
            .collect::<Vec<_>>();
        assert_eq!(chain, vec![id(1), id(3), id(5)]);
    }
}
