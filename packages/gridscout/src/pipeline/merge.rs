//! Merging, deduplication, and ordering of chunk outcomes.

use indexmap::IndexMap;
use tracing::info;

use crate::types::job::FailedJob;
use crate::types::record::{PlaceRecord, ScrapeOutcome};

/// Merge per-chunk outcomes into one aggregate table.
///
/// Records are concatenated in chunk order (then job order within each
/// chunk), deduplicated by `link` keeping the first occurrence, and sorted
/// by (longitude, latitude) - so the final ordering never depends on which
/// worker finished first. Feeding the output back through produces the
/// identical table.
pub fn merge_outcomes(outcomes: Vec<ScrapeOutcome>) -> (Vec<PlaceRecord>, Vec<FailedJob>) {
    let mut records = Vec::new();
    let mut failed = Vec::new();
    for outcome in outcomes {
        records.extend(outcome.records);
        failed.extend(outcome.failed);
    }

    let before = records.len();
    let mut deduped = dedupe_by_link(records);
    info!(
        "dropped {} duplicate rows (from {before} to {})",
        before - deduped.len(),
        deduped.len()
    );

    sort_records(&mut deduped);
    (deduped, failed)
}

/// Keep the first record seen for each distinct link.
pub fn dedupe_by_link(records: Vec<PlaceRecord>) -> Vec<PlaceRecord> {
    let mut by_link: IndexMap<String, PlaceRecord> = IndexMap::with_capacity(records.len());
    for record in records {
        by_link.entry(record.link.clone()).or_insert(record);
    }
    by_link.into_values().collect()
}

/// Stable output order: longitude then latitude, ascending.
pub fn sort_records(records: &mut [PlaceRecord]) {
    records.sort_by(|a, b| {
        a.longitude
            .total_cmp(&b.longitude)
            .then_with(|| a.latitude.total_cmp(&b.latitude))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::job::Job;

    fn record(lat: f64, lon: f64, link: &str, name: &str) -> PlaceRecord {
        PlaceRecord::new(lat, lon, "Hotel", name, link)
    }

    fn outcome(records: Vec<PlaceRecord>, failed: Vec<FailedJob>) -> ScrapeOutcome {
        ScrapeOutcome { records, failed }
    }

    fn to_csv(records: &[PlaceRecord]) -> Vec<u8> {
        let mut writer = csv::Writer::from_writer(vec![]);
        for record in records {
            writer.serialize(record).unwrap();
        }
        writer.into_inner().unwrap()
    }

    #[test]
    fn dedup_keeps_the_first_occurrence_in_chunk_order() {
        let outcomes = vec![
            outcome(vec![record(-25.3, -57.6, "link-a", "first")], vec![]),
            outcome(vec![record(-25.2, -57.5, "link-a", "second")], vec![]),
        ];

        let (records, _) = merge_outcomes(outcomes);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "first");
    }

    #[test]
    fn output_is_sorted_by_longitude_then_latitude() {
        let outcomes = vec![outcome(
            vec![
                record(-25.1, -57.5, "a", "a"),
                record(-25.3, -57.6, "b", "b"),
                record(-25.2, -57.6, "c", "c"),
            ],
            vec![],
        )];

        let (records, _) = merge_outcomes(outcomes);

        let order: Vec<&str> = records.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn failures_accumulate_across_chunks() {
        let failed_a = FailedJob::from(Job {
            latitude: -25.3,
            longitude: -57.6,
            keyword: "Hotel".to_string(),
        });
        let failed_b = FailedJob::from(Job {
            latitude: -25.2,
            longitude: -57.5,
            keyword: "Farmacia".to_string(),
        });

        let (_, failed) = merge_outcomes(vec![
            outcome(vec![], vec![failed_a.clone()]),
            outcome(vec![], vec![failed_b.clone()]),
        ]);

        assert_eq!(failed, vec![failed_a, failed_b]);
    }

    #[test]
    fn merge_is_idempotent_byte_for_byte() {
        let outcomes = vec![
            outcome(
                vec![
                    record(-25.3, -57.6, "x", "x"),
                    record(-25.1, -57.4, "y", "y"),
                    record(-25.3, -57.6, "x", "x-dup"),
                ],
                vec![],
            ),
            outcome(vec![record(-25.2, -57.5, "z", "z")], vec![]),
        ];

        let (once, _) = merge_outcomes(outcomes);
        let (twice, _) = merge_outcomes(vec![ScrapeOutcome {
            records: once.clone(),
            failed: vec![],
        }]);

        assert_eq!(to_csv(&once), to_csv(&twice));
    }

    #[test]
    fn empty_input_merges_to_empty_output() {
        let (records, failed) = merge_outcomes(vec![]);
        assert!(records.is_empty());
        assert!(failed.is_empty());
    }
}
