//! Boundary projection and search-grid construction.

pub mod builder;
pub mod projection;

pub use builder::build_grid;
pub use projection::{haversine_distance_m, LocalProjection, EARTH_RADIUS_M};
