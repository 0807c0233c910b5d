//! Query jobs and their failure wrapper.

use serde::{Deserialize, Serialize};

use crate::types::grid::GridPoint;

/// One (coordinate, keyword) query unit.
///
/// Identity is the triple itself - retry bookkeeping compares jobs by
/// value, there is no separate job id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub latitude: f64,
    pub longitude: f64,
    pub keyword: String,
}

impl Job {
    /// A job centered on a grid point.
    pub fn new(point: GridPoint, keyword: impl Into<String>) -> Self {
        Self {
            latitude: point.latitude,
            longitude: point.longitude,
            keyword: keyword.into(),
        }
    }
}

/// A job that yielded no accepted candidates or errored during execution.
///
/// Created during a scrape pass, persisted through
/// [`FailureTracker`](crate::io::failures::FailureTracker), and consumed
/// (or re-created) by a retry pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedJob {
    pub latitude: f64,
    pub longitude: f64,
    pub keyword: String,
}

impl FailedJob {
    /// The job to re-execute.
    pub fn job(&self) -> Job {
        Job {
            latitude: self.latitude,
            longitude: self.longitude,
            keyword: self.keyword.clone(),
        }
    }
}

impl From<Job> for FailedJob {
    fn from(job: Job) -> Self {
        Self {
            latitude: job.latitude,
            longitude: job.longitude,
            keyword: job.keyword,
        }
    }
}

impl From<FailedJob> for Job {
    fn from(failed: FailedJob) -> Self {
        Self {
            latitude: failed.latitude,
            longitude: failed.longitude,
            keyword: failed.keyword,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_round_trips_through_failure() {
        let job = Job::new(GridPoint::new(-25.3, -57.6), "Farmacia");
        let failed = FailedJob::from(job.clone());
        assert_eq!(failed.job(), job);
        assert_eq!(Job::from(failed), job);
    }
}
