//! Failure-set persistence.
//!
//! The file's presence is itself meaningful: it exists exactly when a
//! region has work remaining for a retry pass. A run that ends clean
//! removes any failure file left over from an earlier run.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use csv::{Reader, Writer};
use tracing::info;

use crate::error::Result;
use crate::io::tables::require_columns;
use crate::normalize::normalize_key;
use crate::types::job::FailedJob;
use crate::types::region::Region;

const FAILURE_COLUMNS: [&str; 3] = ["latitude", "longitude", "keyword"];

/// Persists per-region failed-job sets under one directory.
pub struct FailureTracker {
    dir: PathBuf,
}

impl FailureTracker {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The failure file for a region.
    pub fn path_for(&self, region: &Region) -> PathBuf {
        let key = normalize_key(region.display_name()).replace(' ', "_");
        self.dir.join(format!("jobs_failed_{key}.csv"))
    }

    /// Load a region's failure set.
    ///
    /// An absent file is an empty set, not an error; a present but
    /// malformed file is.
    pub fn load(&self, region: &Region) -> Result<Vec<FailedJob>> {
        let path = self.path_for(region);
        if !path.exists() {
            info!("no failures to retry for {}", region.display_name());
            return Ok(Vec::new());
        }

        let mut reader = Reader::from_path(&path)?;
        require_columns(&mut reader, &path, &FAILURE_COLUMNS)?;

        let mut failures = Vec::new();
        for row in reader.deserialize() {
            failures.push(row?);
        }

        info!(
            "loaded {} failed jobs for {} from {}",
            failures.len(),
            region.display_name(),
            path.display()
        );
        Ok(failures)
    }

    /// Write a region's failure set in full, replacing prior content - or
    /// remove the file when the set is empty, so stale failure state never
    /// survives a clean run.
    pub fn save(&self, region: &Region, failures: &[FailedJob]) -> Result<()> {
        let path = self.path_for(region);

        if failures.is_empty() {
            match fs::remove_file(&path) {
                Ok(()) => info!("no failures left, removed {}", path.display()),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
            return Ok(());
        }

        let mut writer = Writer::from_path(&path)?;
        for failure in failures {
            writer.serialize(failure)?;
        }
        writer.flush()?;
        info!("wrote {} failed jobs to {}", failures.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::job::Job;
    use geo::MultiPolygon;

    fn region(name: &str) -> Region {
        Region {
            name: name.to_string(),
            cleaned_name: None,
            code: "PY-1".to_string(),
            geometry: MultiPolygon(vec![]),
        }
    }

    fn failed(lat: f64, lon: f64, keyword: &str) -> FailedJob {
        FailedJob::from(Job {
            latitude: lat,
            longitude: lon,
            keyword: keyword.to_string(),
        })
    }

    #[test]
    fn absent_file_loads_as_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = FailureTracker::new(dir.path());

        assert!(tracker.load(&region("ASUNCIÓN")).unwrap().is_empty());
    }

    #[test]
    fn failure_set_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = FailureTracker::new(dir.path());
        let asuncion = region("ASUNCIÓN");
        let failures = vec![
            failed(-25.3, -57.6, "Hotel"),
            failed(-25.29, -57.59, "Centro Comercial"),
        ];

        tracker.save(&asuncion, &failures).unwrap();
        assert_eq!(tracker.load(&asuncion).unwrap(), failures);
    }

    #[test]
    fn empty_save_removes_a_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = FailureTracker::new(dir.path());
        let asuncion = region("ASUNCIÓN");

        tracker
            .save(&asuncion, &[failed(-25.3, -57.6, "Hotel")])
            .unwrap();
        assert!(tracker.path_for(&asuncion).exists());

        tracker.save(&asuncion, &[]).unwrap();
        assert!(!tracker.path_for(&asuncion).exists());
    }

    #[test]
    fn empty_save_with_no_prior_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = FailureTracker::new(dir.path());

        tracker.save(&region("CENTRAL"), &[]).unwrap();
    }

    #[test]
    fn files_are_keyed_by_normalized_region_name() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = FailureTracker::new(dir.path());

        let mut with_accent = region("ALTO PARANÁ");
        with_accent.cleaned_name = Some("ALTO PARANÁ".to_string());

        let path = tracker.path_for(&with_accent);
        assert!(path.ends_with("jobs_failed_alto_parana.csv"));
    }

    #[test]
    fn save_replaces_prior_content_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = FailureTracker::new(dir.path());
        let asuncion = region("ASUNCIÓN");

        tracker
            .save(&asuncion, &[failed(-25.3, -57.6, "Hotel"), failed(-25.2, -57.5, "Tienda")])
            .unwrap();
        let second = vec![failed(-25.1, -57.4, "Farmacia")];
        tracker.save(&asuncion, &second).unwrap();

        assert_eq!(tracker.load(&asuncion).unwrap(), second);
    }
}
