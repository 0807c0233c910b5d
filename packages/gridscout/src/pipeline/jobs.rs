//! Job generation and partitioning.

use tracing::info;

use crate::error::{PipelineError, Result};
use crate::types::{grid::GridPoint, job::Job};

/// Expand grid coordinates x keywords into the full job list.
///
/// Coordinate-major: every keyword for point 0, then point 1, and so on.
/// Order matters only for log readability downstream, but it is stable.
pub fn generate_jobs(points: &[GridPoint], keywords: &[String]) -> Vec<Job> {
    let mut jobs = Vec::with_capacity(points.len() * keywords.len());
    for (i, point) in points.iter().enumerate() {
        for keyword in keywords {
            jobs.push(Job::new(*point, keyword.clone()));
        }
        if i % 50 == 0 {
            info!("expanded {i}/{} coordinates into jobs", points.len());
        }
    }
    info!("generated {} search jobs", jobs.len());
    jobs
}

/// Split jobs into `worker_count` contiguous, near-equal chunks.
///
/// The first `len % worker_count` chunks carry one extra job.
/// Concatenating the chunks in order reproduces the input exactly; with
/// fewer jobs than workers the tail chunks are empty.
pub fn partition_jobs(jobs: &[Job], worker_count: usize) -> Result<Vec<Vec<Job>>> {
    if worker_count == 0 {
        return Err(PipelineError::InvalidParameter {
            name: "worker_count",
            reason: "must be at least 1".to_string(),
        });
    }

    let base = jobs.len() / worker_count;
    let extra = jobs.len() % worker_count;

    let mut chunks = Vec::with_capacity(worker_count);
    let mut start = 0;
    for i in 0..worker_count {
        let len = base + usize::from(i < extra);
        chunks.push(jobs[start..start + len].to_vec());
        start += len;
    }
    Ok(chunks)
}
