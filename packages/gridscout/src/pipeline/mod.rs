//! The discovery pipeline - jobs, workers, merging, retry, post-processing.
//!
//! The pipeline orchestrates:
//! - Job generation (grid x keywords) and static partitioning
//! - Isolated parallel workers over a pluggable search provider
//! - Merge, link-based dedup, and stable ordering of partial results
//! - Failure tracking and the relaxed-limits retry pass
//! - Post-processing into the final column set

pub mod jobs;
pub mod merge;
pub mod postprocess;
pub mod retry;
pub mod scrape;

pub use jobs::{generate_jobs, partition_jobs};
pub use merge::{dedupe_by_link, merge_outcomes, sort_records};
pub use postprocess::{extract_prop_id, process_records, split_rating, AmenityRow, ProcessedRecord};
pub use retry::retry_and_merge;
pub use scrape::{run_chunk, ScrapeReport, ScrapeRunner};
