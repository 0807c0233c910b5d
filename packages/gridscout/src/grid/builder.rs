//! Search-grid construction over a region boundary.

use geo::{BoundingRect, Intersects, MultiPolygon, Point};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::grid::projection::LocalProjection;
use crate::types::grid::GridPoint;

/// Convert a region boundary into query-grid coordinates spaced
/// `spacing_m` meters apart in both axes.
///
/// The boundary is projected into a planar frame, a lattice is laid over
/// its bounding box inclusive of the far edge, and candidates touching the
/// boundary polygons are kept - a point exactly on the edge is included.
/// Retained points are projected back to geographic coordinates and
/// rounded to 5 decimals. Output order is x-major over the lattice, so the
/// same boundary and spacing always produce the same sequence.
///
/// A boundary smaller than one lattice cell yields whatever points fall
/// inside it - possibly none, which is not an error.
pub fn build_grid(geometry: &MultiPolygon<f64>, spacing_m: f64) -> Result<Vec<GridPoint>> {
    if !spacing_m.is_finite() || spacing_m <= 0.0 {
        return Err(PipelineError::InvalidParameter {
            name: "spacing_m",
            reason: format!("must be a positive number of meters, got {spacing_m}"),
        });
    }

    let projection = LocalProjection::centered_on(geometry)?;
    let planar = projection.project(geometry);
    let bounds = planar.bounding_rect().ok_or(PipelineError::EmptyBoundary)?;
    let (min, max) = (bounds.min(), bounds.max());

    let mut points = Vec::new();
    let mut x = min.x;
    while x < max.x + spacing_m {
        let mut y = min.y;
        while y < max.y + spacing_m {
            if planar.intersects(&Point::new(x, y)) {
                let (latitude, longitude) = projection.inverse(x, y);
                points.push(GridPoint::new(latitude, longitude));
            }
            y += spacing_m;
        }
        x += spacing_m;
    }

    info!(
        "retained {} grid points at {spacing_m}m spacing",
        points.len()
    );
    Ok(points)
}
