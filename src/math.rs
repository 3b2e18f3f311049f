//! Mathematical structs and functions.

use cgmath::Point2;
pub use geo::{GeoPoint, LocalFrame, EARTH_RADIUS};
pub use polyline::{
    closest_point_on_polyline, distance_to_polyline, extend_polyline, polyline_length, ClosestPoint,
};
pub use util::*;

mod geo;
mod polyline;
mod util;

/// A 2D point
pub type Point2d = Point2<f64>;
