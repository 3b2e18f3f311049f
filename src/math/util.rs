use super::Point2d;
use cgmath::prelude::*;

/// Below this squared length (in m²) a segment is treated as a single point.
const DEGENERATE_SEGMENT: f64 = 1e-12;

/// Finds the point on the line segment `a`-`b` which is closest to `point`.
///
/// # Returns
/// A tuple containing the closest point and its parameter along the segment,
/// where 0 is `a` and 1 is `b`.
pub fn closest_point_on_segment(point: Point2d, a: Point2d, b: Point2d) -> (Point2d, f64) {
    let ab = b - a;
    let len2 = ab.magnitude2();
    if len2 < DEGENERATE_SEGMENT {
        return (a, 0.0);
    }
    let t = ((point - a).dot(ab) / len2).clamp(0.0, 1.0);
    (a + ab * t, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn projects_onto_interior() {
        let (p, t) = closest_point_on_segment(
            Point2d::new(5.0, 3.0),
            Point2d::new(0.0, 0.0),
            Point2d::new(10.0, 0.0),
        );
        assert_approx_eq!(p.x, 5.0);
        assert_approx_eq!(p.y, 0.0);
        assert_approx_eq!(t, 0.5);
    }

    #[test]
    fn clamps_to_ends() {
        let a = Point2d::new(0.0, 0.0);
        let b = Point2d::new(10.0, 0.0);
        assert_eq!(closest_point_on_segment(Point2d::new(-4.0, 1.0), a, b).0, a);
        assert_eq!(closest_point_on_segment(Point2d::new(14.0, 1.0), a, b).0, b);
    }

    #[test]
    fn zero_length_segment() {
        let a = Point2d::new(2.0, 2.0);
        let (p, t) = closest_point_on_segment(Point2d::new(5.0, 6.0), a, a);
        assert_eq!(p, a);
        assert_eq!(t, 0.0);
    }
}
