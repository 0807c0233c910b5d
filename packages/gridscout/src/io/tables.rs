//! Tabular artifacts: grid, job, result, processed, and amenity files.
//!
//! All files are CSV with a header row. Readers validate the required
//! columns up front so a malformed file fails the step instead of quietly
//! producing an empty dataset. Grid and job files are reusable as inputs
//! on a later run, in place of regeneration.

use std::fs::File;
use std::path::Path;

use csv::{Reader, Writer};
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::pipeline::postprocess::{AmenityRow, ProcessedRecord};
use crate::types::grid::GridPoint;
use crate::types::job::Job;
use crate::types::record::PlaceRecord;

const GRID_COLUMNS: [&str; 2] = ["latitude", "longitude"];
const JOB_COLUMNS: [&str; 3] = ["latitude", "longitude", "keyword"];
const RECORD_COLUMNS: [&str; 10] = [
    "latitude",
    "longitude",
    "keyword",
    "name",
    "link",
    "rating",
    "price",
    "category",
    "address",
    "amenities",
];

/// Export grid points as a two-column CSV.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn write_grid(path: impl AsRef<Path>, points: &[GridPoint], force: bool) -> Result<()> {
    let path = path.as_ref();
    if path.exists() && !force {
        return Err(PipelineError::OutputExists {
            path: path.to_path_buf(),
        });
    }

    let mut writer = Writer::from_path(path)?;
    if points.is_empty() {
        writer.write_record(GRID_COLUMNS)?;
    }
    for point in points {
        writer.serialize(point)?;
    }
    writer.flush()?;
    info!("exported {} grid points to {}", points.len(), path.display());
    Ok(())
}

/// Load grid points from a previously exported file.
///
/// The file must carry the `latitude`/`longitude` columns and at least one
/// row; coordinates are re-rounded on the way in so the grid invariant
/// holds regardless of who wrote the file.
pub fn read_grid(path: impl AsRef<Path>) -> Result<Vec<GridPoint>> {
    let path = path.as_ref();
    let mut reader = Reader::from_path(path)?;
    require_columns(&mut reader, path, &GRID_COLUMNS)?;

    let mut points = Vec::new();
    for row in reader.deserialize() {
        let point: GridPoint = row?;
        points.push(GridPoint::new(point.latitude, point.longitude));
    }
    if points.is_empty() {
        return Err(PipelineError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    info!("loaded {} grid points from {}", points.len(), path.display());
    Ok(points)
}

/// Export the job list.
pub fn write_jobs(path: impl AsRef<Path>, jobs: &[Job]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = Writer::from_path(path)?;
    if jobs.is_empty() {
        writer.write_record(JOB_COLUMNS)?;
    }
    for job in jobs {
        writer.serialize(job)?;
    }
    writer.flush()?;
    info!("exported {} jobs to {}", jobs.len(), path.display());
    Ok(())
}

/// Load a previously exported job list, e.g. to skip regeneration.
pub fn read_jobs(path: impl AsRef<Path>) -> Result<Vec<Job>> {
    let path = path.as_ref();
    let mut reader = Reader::from_path(path)?;
    require_columns(&mut reader, path, &JOB_COLUMNS)?;

    let mut jobs = Vec::new();
    for row in reader.deserialize() {
        jobs.push(row?);
    }

    info!("loaded {} jobs from {}", jobs.len(), path.display());
    Ok(jobs)
}

/// Write the aggregate result table.
pub fn write_records(path: impl AsRef<Path>, records: &[PlaceRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(RECORD_COLUMNS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("wrote {} result rows to {}", records.len(), path.display());
    Ok(())
}

/// Load a result table back, e.g. for reprocessing.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<PlaceRecord>> {
    let path = path.as_ref();
    let mut reader = Reader::from_path(path)?;
    require_columns(&mut reader, path, &RECORD_COLUMNS)?;

    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }

    info!("loaded {} result rows from {}", records.len(), path.display());
    Ok(records)
}

/// Write the post-processed table in its final column order.
pub fn write_processed(path: impl AsRef<Path>, records: &[ProcessedRecord]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    info!("wrote {} processed rows to {}", records.len(), path.display());
    Ok(())
}

/// Write the exploded amenity side-table.
pub fn write_amenities(path: impl AsRef<Path>, rows: &[AmenityRow]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("wrote {} amenity rows to {}", rows.len(), path.display());
    Ok(())
}

pub(crate) fn require_columns(
    reader: &mut Reader<File>,
    path: &Path,
    required: &[&str],
) -> Result<()> {
    let headers = reader.headers()?.clone();
    let missing: Vec<String> = required
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| (*column).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        })
    }
}
