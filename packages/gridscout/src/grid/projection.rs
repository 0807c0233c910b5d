//! Planar projection and great-circle distance.

use geo::{BoundingRect, Coord, MapCoords, MultiPolygon};

use crate::error::{PipelineError, Result};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Local equirectangular projection about a fixed origin.
///
/// Maps geographic degrees to planar meters with `x = R * dlon * cos(lat0)`
/// and `y = R * dlat`. Both axes are monotonic in their input, so
/// point-in-polygon decisions in the projected plane agree with the
/// geographic plane, while distances near the origin are metric - which is
/// what grid spacing needs across a single administrative region.
#[derive(Debug, Clone, Copy)]
pub struct LocalProjection {
    origin_lat: f64,
    origin_lon: f64,
    cos_lat0: f64,
}

impl LocalProjection {
    /// Projection about an explicit origin, in degrees.
    pub fn new(origin_lat: f64, origin_lon: f64) -> Self {
        Self {
            origin_lat,
            origin_lon,
            cos_lat0: origin_lat.to_radians().cos(),
        }
    }

    /// Projection about a boundary's bounding-box center.
    pub fn centered_on(geometry: &MultiPolygon<f64>) -> Result<Self> {
        let rect = geometry.bounding_rect().ok_or(PipelineError::EmptyBoundary)?;
        let center = rect.center();
        Ok(Self::new(center.y, center.x))
    }

    /// Geographic (latitude, longitude) degrees to planar (x, y) meters.
    pub fn forward(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let x = EARTH_RADIUS_M * (longitude - self.origin_lon).to_radians() * self.cos_lat0;
        let y = EARTH_RADIUS_M * (latitude - self.origin_lat).to_radians();
        (x, y)
    }

    /// Planar (x, y) meters back to geographic (latitude, longitude)
    /// degrees.
    pub fn inverse(&self, x: f64, y: f64) -> (f64, f64) {
        let latitude = self.origin_lat + (y / EARTH_RADIUS_M).to_degrees();
        let longitude = self.origin_lon + (x / (EARTH_RADIUS_M * self.cos_lat0)).to_degrees();
        (latitude, longitude)
    }

    /// Project a whole boundary into the planar frame.
    ///
    /// Geographic coordinates are (x = longitude, y = latitude); the
    /// output is planar meters.
    pub fn project(&self, geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
        geometry.map_coords(|coord| {
            let (x, y) = self.forward(coord.y, coord.x);
            Coord { x, y }
        })
    }
}

/// Distance in meters between two (latitude, longitude) points.
pub fn haversine_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_inverse_are_consistent() {
        let projection = LocalProjection::new(-25.3, -57.6);
        let (x, y) = projection.forward(-25.28, -57.58);
        let (lat, lon) = projection.inverse(x, y);
        assert!((lat - -25.28).abs() < 1e-9);
        assert!((lon - -57.58).abs() < 1e-9);
    }

    #[test]
    fn origin_maps_to_planar_zero() {
        let projection = LocalProjection::new(-25.3, -57.6);
        let (x, y) = projection.forward(-25.3, -57.6);
        assert_eq!(x, 0.0);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn projected_distances_approximate_haversine() {
        let projection = LocalProjection::new(-25.3, -57.6);
        let (x, y) = projection.forward(-25.29, -57.59);
        let planar = (x * x + y * y).sqrt();
        let great_circle = haversine_distance_m(-25.3, -57.6, -25.29, -57.59);
        // Within a fraction of a percent at ~1.5 km from the origin.
        assert!((planar - great_circle).abs() / great_circle < 0.005);
    }

    #[test]
    fn haversine_matches_a_known_distance() {
        // One degree of latitude is about 111.2 km.
        let d = haversine_distance_m(0.0, 0.0, 1.0, 0.0);
        assert!((d - 111_195.0).abs() < 100.0);
    }

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert_eq!(haversine_distance_m(-25.3, -57.6, -25.3, -57.6), 0.0);
    }
}
