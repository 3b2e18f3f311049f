use super::{closest_point_on_segment, GeoPoint, LocalFrame};
use cgmath::prelude::*;
use itertools::Itertools;

/// The point on a polyline closest to some query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestPoint {
    /// The closest point on the polyline.
    pub point: GeoPoint,
    /// The distance between the query point and `point`, in m.
    pub distance: f64,
    /// The index of the segment containing `point`.
    pub segment: usize,
}

/// Finds the point on a polyline which is closest to `point`,
/// considering the whole of each segment rather than just its vertices.
///
/// Distances are measured in a local plane centred on `point`.
/// Returns `None` if the polyline is empty.
pub fn closest_point_on_polyline(line: &[GeoPoint], point: GeoPoint) -> Option<ClosestPoint> {
    let frame = LocalFrame::new(point);
    let origin = frame.project(point);

    if let [vertex] = line {
        let distance = frame.project(*vertex).distance(origin);
        return Some(ClosestPoint {
            point: *vertex,
            distance,
            segment: 0,
        });
    }

    line.iter()
        .map(|p| frame.project(*p))
        .tuple_windows()
        .enumerate()
        .map(|(segment, (a, b))| {
            let (closest, _) = closest_point_on_segment(origin, a, b);
            (segment, closest, closest.distance(origin))
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(segment, closest, distance)| ClosestPoint {
            point: frame.unproject(closest),
            distance,
            segment,
        })
}

/// Computes the distance in m between a point and a polyline,
/// or `None` if the polyline is empty.
pub fn distance_to_polyline(line: &[GeoPoint], point: GeoPoint) -> Option<f64> {
    closest_point_on_polyline(line, point).map(|c| c.distance)
}

/// Appends `shape` to a polyline, dropping its first point if the polyline
/// is not empty, as consecutive road edges share their joining vertex.
pub fn extend_polyline(line: &mut Vec<GeoPoint>, shape: &[GeoPoint]) {
    let skip = usize::from(!line.is_empty());
    line.extend(shape.iter().skip(skip));
}

/// Computes the length of a polyline in m.
pub fn polyline_length(line: &[GeoPoint]) -> f64 {
    line.iter()
        .tuple_windows()
        .map(|(a, b)| a.distance_to(*b))
        .sum()
}
