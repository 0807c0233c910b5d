//! The retry pass: re-run failed jobs with relaxed limits and fold any
//! recovered records into the aggregate.

use tracing::info;

use crate::pipeline::merge::{dedupe_by_link, sort_records};
use crate::pipeline::scrape::run_chunk;
use crate::traits::provider::SearchProvider;
use crate::types::config::PassLimits;
use crate::types::job::{FailedJob, Job};
use crate::types::record::PlaceRecord;

/// Re-execute previously failed jobs once and merge recovered records into
/// the aggregate, idempotently.
///
/// An empty failure set short-circuits: the aggregate comes back unmoved
/// and the provider is never touched. Otherwise the jobs run sequentially
/// through one session under the relaxed `limits`; a recovered record
/// whose link is already present is dropped, so invoking this twice adds
/// nothing the first invocation didn't.
///
/// Jobs still failing are returned for the caller to re-persist - there is
/// no internal retry loop.
pub async fn retry_and_merge<P: SearchProvider>(
    aggregate: Vec<PlaceRecord>,
    failed: &[FailedJob],
    provider: &P,
    radius_m: f64,
    limits: &PassLimits,
) -> (Vec<PlaceRecord>, Vec<FailedJob>) {
    if failed.is_empty() {
        return (aggregate, Vec::new());
    }

    let jobs: Vec<Job> = failed.iter().map(FailedJob::job).collect();
    info!("retrying {} failed jobs with relaxed limits", jobs.len());

    let outcome = run_chunk(provider, &jobs, radius_m, limits).await;
    let recovered = outcome.records.len();

    let before = aggregate.len();
    let mut combined = aggregate;
    combined.extend(outcome.records);
    let mut merged = dedupe_by_link(combined);
    sort_records(&mut merged);

    info!(
        "retry recovered {recovered} records ({} new); {} jobs still failing",
        merged.len().saturating_sub(before),
        outcome.failed.len()
    );
    (merged, outcome.failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockProvider;
    use crate::types::grid::GridPoint;

    fn failed_job(lat: f64, lon: f64, keyword: &str) -> FailedJob {
        FailedJob::from(Job::new(GridPoint::new(lat, lon), keyword))
    }

    fn record(lat: f64, lon: f64, link: &str) -> PlaceRecord {
        PlaceRecord::new(lat, lon, "Hotel", link, link)
    }

    #[tokio::test]
    async fn empty_failure_set_returns_the_aggregate_unmoved() {
        let aggregate = vec![record(-25.3, -57.6, "a"), record(-25.2, -57.5, "b")];
        let buffer = aggregate.as_ptr();
        let provider = MockProvider::new();

        let (merged, still_failed) =
            retry_and_merge(aggregate, &[], &provider, 1000.0, &PassLimits::retry()).await;

        // Same allocation, not just equal contents - and no executor work.
        assert_eq!(merged.as_ptr(), buffer);
        assert!(still_failed.is_empty());
        assert_eq!(provider.sessions_opened(), 0);
        assert_eq!(provider.search_count(), 0);
    }

    #[tokio::test]
    async fn recovered_records_merge_without_duplicates() {
        let failed = failed_job(-25.3, -57.6, "Hotel");
        let job = failed.job();
        let provider = MockProvider::new().with_records(
            &job,
            vec![
                record(-25.3, -57.6, "existing-link"),
                record(-25.3, -57.6, "new-link"),
            ],
        );

        let aggregate = vec![record(-25.3, -57.6, "existing-link")];
        let (merged, still_failed) = retry_and_merge(
            aggregate,
            std::slice::from_ref(&failed),
            &provider,
            1000.0,
            &PassLimits::retry(),
        )
        .await;

        assert_eq!(merged.len(), 2);
        assert!(still_failed.is_empty());
        let links: Vec<&str> = merged.iter().map(|r| r.link.as_str()).collect();
        assert!(links.contains(&"existing-link"));
        assert!(links.contains(&"new-link"));
    }

    #[tokio::test]
    async fn retry_is_idempotent_across_invocations() {
        let failed = failed_job(-25.3, -57.6, "Hotel");
        let job = failed.job();
        let provider =
            MockProvider::new().with_records(&job, vec![record(-25.3, -57.6, "recovered")]);

        let (once, _) = retry_and_merge(
            vec![],
            std::slice::from_ref(&failed),
            &provider,
            1000.0,
            &PassLimits::retry(),
        )
        .await;
        let (twice, _) = retry_and_merge(
            once.clone(),
            std::slice::from_ref(&failed),
            &provider,
            1000.0,
            &PassLimits::retry(),
        )
        .await;

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn still_failing_jobs_come_back_for_persistence() {
        let failed = failed_job(-25.3, -57.6, "Hotel");
        // No script: the mock returns no candidates, so the job fails again.
        let provider = MockProvider::new();

        let (merged, still_failed) = retry_and_merge(
            vec![],
            std::slice::from_ref(&failed),
            &provider,
            1000.0,
            &PassLimits::retry(),
        )
        .await;

        assert!(merged.is_empty());
        assert_eq!(still_failed, vec![failed]);
    }
}
