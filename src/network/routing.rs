use super::RoadNetwork;
use crate::math::{distance_to_polyline, extend_polyline, GeoPoint};
use crate::obstacle::ObstacleSet;
use crate::EdgeId;
use log::debug;
use slotmap::SparseSecondaryMap;

/// A route through the road network.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// The edges along the route, including the first and last.
    pub edges: Vec<EdgeId>,
    /// The concatenated shape of the edges.
    pub shape: Vec<GeoPoint>,
    /// The length of the route in m.
    pub length: f64,
}

impl RoadNetwork {
    /// Finds the shortest route from the `from` edge to the `to` edge
    /// which does not pass within `tolerance` m of any of the `avoid` obstacles.
    pub fn route(
        &self,
        from: EdgeId,
        to: EdgeId,
        avoid: &ObstacleSet,
        tolerance: f64,
    ) -> Option<Route> {
        let blocked = self.blocked_edges(avoid, tolerance);
        if blocked.contains_key(from) || blocked.contains_key(to) {
            debug!("route endpoints {:?} -> {:?} are blocked by an obstacle", from, to);
            return None;
        }
        self.edges.get(from)?;
        self.edges.get(to)?;

        let (edges, _) = pathfinding::directed::dijkstra::dijkstra(
            &from,
            |id| {
                self.edges[*id]
                    .links_out
                    .iter()
                    .map(|(id, _)| *id)
                    .filter(|id| !blocked.contains_key(*id))
                    .map(|id| (id, cost(self.edges[id].length)))
                    .collect::<Vec<_>>()
            },
            |id| *id == to,
        )?;

        let mut shape = vec![];
        let mut length = 0.0;
        for id in &edges {
            let edge = &self.edges[*id];
            extend_polyline(&mut shape, &edge.shape);
            length += edge.length;
        }

        Some(Route { edges, shape, length })
    }

    /// Finds the edges whose shape passes within `tolerance` m of an obstacle.
    fn blocked_edges(&self, avoid: &ObstacleSet, tolerance: f64) -> SparseSecondaryMap<EdgeId, ()> {
        self.edges
            .values()
            .filter(|edge| {
                avoid.iter().any(|obstacle| {
                    distance_to_polyline(&edge.shape, obstacle.position)
                        .map_or(false, |d| d < tolerance)
                })
            })
            .map(|edge| (edge.id, ()))
            .collect()
    }
}

/// Converts a length in m to an integer path cost in mm.
fn cost(length: f64) -> u64 {
    (1000.0 * length).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::EdgeAttributes;
    use crate::obstacle::Obstacle;
    use crate::road_graph::DrivingSide;
    use assert_approx_eq::assert_approx_eq;

    fn origin() -> GeoPoint {
        GeoPoint::new(-37.7628, 144.9732)
    }

    fn edge(net: &mut RoadNetwork, a: GeoPoint, b: GeoPoint) -> EdgeId {
        net.add_edge(&EdgeAttributes {
            shape: &[a, b],
            driving_side: DrivingSide::Left,
            street_names: &[],
        })
    }

    /// A square block: a short route south-east and a longer one round the other side.
    fn block() -> (RoadNetwork, [EdgeId; 6], [GeoPoint; 4]) {
        let nw = origin();
        let ne = origin().offset(0.0, 200.0);
        let sw = origin().offset(-200.0, 0.0);
        let se = origin().offset(-200.0, 200.0);
        let mut net = RoadNetwork::new();
        let start = edge(&mut net, nw.offset(50.0, 0.0), nw);
        let west = edge(&mut net, nw, sw);
        let south = edge(&mut net, sw, se);
        let north = edge(&mut net, nw, ne);
        let east = edge(&mut net, ne, se.offset(-10.0, 0.0));
        let end = edge(&mut net, se, se.offset(-50.0, 0.0));
        net.add_edge_connection(start, west, 1.0);
        net.add_edge_connection(start, north, 1.0);
        net.add_edge_connection(west, south, 1.0);
        net.add_edge_connection(south, end, 1.0);
        net.add_edge_connection(north, east, 1.0);
        net.add_edge_connection(east, end, 1.0);
        (net, [start, west, south, north, east, end], [nw, ne, sw, se])
    }

    #[test]
    fn shortest_route() {
        let (net, [start, west, south, _, _, end], _) = block();
        let route = net.route(start, end, &ObstacleSet::default(), 20.0).unwrap();
        assert_eq!(route.edges, vec![start, west, south, end]);
        assert_approx_eq!(route.length, 500.0, 0.1);
        assert_eq!(route.shape.len(), 5);
    }

    #[test]
    fn avoids_obstacles() {
        let (net, [start, _, _, north, east, end], [_, _, sw, _]) = block();
        let bridge = ObstacleSet::new(vec![Obstacle::new(sw.lat, sw.lon)]);
        let route = net.route(start, end, &bridge, 20.0).unwrap();
        assert_eq!(route.edges, vec![start, north, east, end]);
    }

    #[test]
    fn no_route_when_all_blocked() {
        let (net, [start, _, _, _, _, end], [_, ne, sw, _]) = block();
        let obstacles = ObstacleSet::new(vec![
            Obstacle::new(sw.lat, sw.lon),
            Obstacle::new(ne.lat, ne.lon),
        ]);
        assert!(net.route(start, end, &obstacles, 20.0).is_none());
    }

    #[test]
    fn blocked_endpoint() {
        let (net, [start, _, _, _, _, end], [nw, ..]) = block();
        let obstacles = ObstacleSet::new(vec![Obstacle::new(nw.lat, nw.lon)]);
        assert!(net.route(start, end, &obstacles, 20.0).is_none());
    }
}
