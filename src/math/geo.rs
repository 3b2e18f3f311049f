use super::Point2d;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The mean radius of the Earth in m.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// A WGS84 coordinate in degrees.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a new coordinate.
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether the coordinate is finite and within the valid latitude and longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Computes the great-circle distance to another coordinate in m, using the haversine formula.
    pub fn distance_to(&self, other: GeoPoint) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlon = (other.lon - self.lon).to_radians();

        let h = (0.5 * dlat).sin().powi(2) + lat1.cos() * lat2.cos() * (0.5 * dlon).sin().powi(2);
        2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin()
    }

    /// Returns the coordinate displaced by the given distances in m.
    /// Only accurate over short distances.
    pub fn offset(&self, north: f64, east: f64) -> GeoPoint {
        LocalFrame::new(*self).unproject(Point2d::new(east, north))
    }
}

impl fmt::Debug for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.lat, self.lon)
    }
}

/// An equirectangular projection around an origin, mapping coordinates
/// to a local plane in m with x pointing east and y pointing north.
#[derive(Clone, Copy, Debug)]
pub struct LocalFrame {
    origin: GeoPoint,
    cos_lat: f64,
}

impl LocalFrame {
    /// Creates a local frame centred on `origin`.
    pub fn new(origin: GeoPoint) -> Self {
        Self {
            origin,
            cos_lat: origin.lat.to_radians().cos(),
        }
    }

    /// Gets the origin of the frame.
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    /// Projects a coordinate onto the local plane.
    pub fn project(&self, point: GeoPoint) -> Point2d {
        let x = wrap_longitude(point.lon - self.origin.lon).to_radians() * self.cos_lat * EARTH_RADIUS;
        let y = (point.lat - self.origin.lat).to_radians() * EARTH_RADIUS;
        Point2d::new(x, y)
    }

    /// Maps a point on the local plane back to a coordinate.
    pub fn unproject(&self, point: Point2d) -> GeoPoint {
        let lat = self.origin.lat + (point.y / EARTH_RADIUS).to_degrees();
        let lon = self.origin.lon + (point.x / (EARTH_RADIUS * self.cos_lat)).to_degrees();
        GeoPoint {
            lat,
            lon: wrap_longitude(lon),
        }
    }
}

/// Normalises a longitude or longitude difference in degrees into (-180, 180].
fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 {
        180.0
    } else {
        wrapped
    }
}
