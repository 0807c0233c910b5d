//! The scrape pass: isolated workers over statically-partitioned chunks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::grid::projection::haversine_distance_m;
use crate::pipeline::jobs::partition_jobs;
use crate::pipeline::merge::merge_outcomes;
use crate::traits::provider::{SearchProvider, SearchSession};
use crate::types::config::{PassLimits, ScrapeConfig};
use crate::types::job::{FailedJob, Job};
use crate::types::record::{PlaceRecord, ScrapeOutcome};

/// Summary of one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeReport {
    /// Jobs submitted to the run.
    pub total_jobs: usize,
    /// Worker chunks the jobs were split into.
    pub chunk_count: usize,
    /// Accepted records before deduplication.
    pub records_scraped: usize,
    /// Duplicate rows dropped by the link dedup.
    pub duplicates_dropped: usize,
    /// The merged, deduplicated, sorted aggregate.
    pub records: Vec<PlaceRecord>,
    /// Jobs that produced no usable candidates or errored.
    pub failed: Vec<FailedJob>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScrapeReport {
    /// True when every job produced at least one accepted record.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Execute one worker's chunk through a single session.
///
/// The session lives for the whole chunk and is released when it drops,
/// whatever path exits the loop. One failing job never aborts the rest of
/// the chunk, and a session that cannot be opened fails every job in the
/// chunk instead of killing the run.
///
/// Candidates farther than `radius_m` from the job's query point are
/// discarded before the job is judged: a job whose candidates all fall
/// outside the radius has produced nothing usable and is recorded failed.
pub async fn run_chunk<P: SearchProvider>(
    provider: &P,
    jobs: &[Job],
    radius_m: f64,
    limits: &PassLimits,
) -> ScrapeOutcome {
    let mut outcome = ScrapeOutcome::new();
    let total = jobs.len();

    let mut session = match provider.open_session().await {
        Ok(session) => session,
        Err(err) => {
            error!("could not open a session, marking all {total} jobs failed: {err}");
            outcome.failed = jobs.iter().cloned().map(FailedJob::from).collect();
            return outcome;
        }
    };

    for (idx, job) in jobs.iter().enumerate() {
        info!(
            "job {}/{total}: '{}' at ({:.5}, {:.5})",
            idx + 1,
            job.keyword,
            job.latitude,
            job.longitude
        );

        let candidates = match session.search(job, limits).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!("job {} failed: {err}", idx + 1);
                outcome.failed.push(job.clone().into());
                continue;
            }
        };

        let found = candidates.len();
        let mut accepted = 0usize;
        let mut outside_radius = 0usize;
        for candidate in candidates {
            let distance = haversine_distance_m(
                job.latitude,
                job.longitude,
                candidate.latitude,
                candidate.longitude,
            );
            if distance > radius_m {
                outside_radius += 1;
                continue;
            }
            outcome.records.push(candidate);
            accepted += 1;
        }

        if outside_radius > 0 {
            info!("filtered {outside_radius} of {found} candidates outside the {radius_m}m radius");
        }
        if accepted == 0 {
            info!("job {} yielded no usable candidates", idx + 1);
            outcome.failed.push(job.clone().into());
        } else {
            info!("job {} appended {accepted} records", idx + 1);
        }
    }

    outcome
}

/// Orchestrates a full scrape pass: partition, fan out, join, merge.
///
/// Workers share nothing - each owns its chunk and its session and returns
/// its outcome by value; the merge runs single-threaded afterwards. Chunk
/// results are collected in chunk order, so the merge is deterministic
/// regardless of completion order.
pub struct ScrapeRunner<P> {
    provider: Arc<P>,
    config: ScrapeConfig,
}

impl<P> ScrapeRunner<P>
where
    P: SearchProvider + 'static,
{
    pub fn new(provider: Arc<P>, config: ScrapeConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Run every job through `worker_count` isolated workers and merge the
    /// partial results.
    ///
    /// A panicked worker surfaces as its whole chunk failing, not as a
    /// dead run; the aggregate that did get scraped is still returned.
    pub async fn run(&self, jobs: Vec<Job>) -> Result<ScrapeReport> {
        self.config.validate()?;
        let started_at = Utc::now();
        let total_jobs = jobs.len();

        let chunks = partition_jobs(&jobs, self.config.worker_count)?;
        let chunk_count = chunks.len();
        info!("scraping {total_jobs} jobs across {chunk_count} workers");

        let handles: Vec<_> = chunks
            .iter()
            .cloned()
            .map(|chunk| {
                let provider = Arc::clone(&self.provider);
                let radius_m = self.config.radius_m;
                let limits = self.config.initial_limits.clone();
                tokio::spawn(
                    async move { run_chunk(provider.as_ref(), &chunk, radius_m, &limits).await },
                )
            })
            .collect();

        let mut outcomes = Vec::with_capacity(chunk_count);
        for (index, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    error!("worker {index} panicked, marking its chunk failed: {err}");
                    outcomes.push(ScrapeOutcome {
                        records: Vec::new(),
                        failed: chunks[index].iter().cloned().map(FailedJob::from).collect(),
                    });
                }
            }
        }

        let records_scraped: usize = outcomes.iter().map(|o| o.records.len()).sum();
        let (records, failed) = merge_outcomes(outcomes);
        let duplicates_dropped = records_scraped - records.len();

        info!(
            "scrape pass complete: {} records, {} failed jobs",
            records.len(),
            failed.len()
        );

        Ok(ScrapeReport {
            total_jobs,
            chunk_count,
            records_scraped,
            duplicates_dropped,
            records,
            failed,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
