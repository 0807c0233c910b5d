//! Grid sample points.

use serde::{Deserialize, Serialize};

/// A sampled geographic coordinate used as a query center.
///
/// Both coordinates are rounded to 5 decimal places (about a meter) at
/// construction so grids are reproducible run to run; a point never
/// changes after that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GridPoint {
    /// Create a point, rounding both coordinates to 5 decimal places.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: round5(latitude),
            longitude: round5(longitude),
        }
    }
}

pub(crate) fn round5(value: f64) -> f64 {
    (value * 1e5).round() / 1e5
}
