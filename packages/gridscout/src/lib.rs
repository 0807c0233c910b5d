//! Grid-based points-of-interest discovery over administrative regions.
//!
//! Tiles a region's boundary polygon into a radius-covering search grid,
//! fans the grid x keyword workload out across isolated workers, and
//! merges the partial results into one deduplicated, stably-ordered
//! dataset - with failed queries tracked, persisted, and retried under
//! relaxed limits.
//!
//! # Design
//!
//! - The hard parts live here: grid construction over a polygon, static
//!   job partitioning, and the merge/dedup/retry state machine.
//! - The replaceable parts live behind traits: the query transport
//!   ([`SearchProvider`]/[`SearchSession`]) and the field-extraction
//!   strategy ([`ItemExtractor`]).
//! - Workers share nothing. Each owns its chunk and its session, results
//!   come back by value, and the merge runs single-threaded - so output
//!   order never depends on scheduling.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gridscout::{
//!     build_grid, generate_jobs, load_regions, BoundaryFields, RegionSelector,
//!     ScrapeConfig, ScrapeRunner,
//! };
//!
//! let fields = BoundaryFields::default();
//! let set = load_regions("departments.geojson", &fields)?;
//! let region = set.resolve(&RegionSelector::Name("Asuncion".into()))?;
//!
//! let config = ScrapeConfig::new(1000.0).with_keywords(["Hotel", "Farmacia"]);
//! let grid = build_grid(&region.geometry, config.spacing_m())?;
//! let jobs = generate_jobs(&grid, &config.keywords);
//!
//! let runner = ScrapeRunner::new(Arc::new(provider), config);
//! let report = runner.run(jobs).await?;
//! ```
//!
//! # Modules
//!
//! - [`grid`] - boundary projection and lattice construction
//! - [`pipeline`] - jobs, workers, merging, retry, post-processing
//! - [`traits`] - the pluggable transport and extraction seams
//! - [`io`] - boundary files, tabular artifacts, failure sets
//! - [`testing`] - mock provider for tests

pub mod error;
pub mod grid;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{ExecutionError, ExtractError, PipelineError, Result};

pub use grid::{build_grid, haversine_distance_m, LocalProjection};

pub use normalize::{apply_corrections, clean_text, normalize_key};

pub use pipeline::{
    dedupe_by_link, extract_prop_id, generate_jobs, merge_outcomes, partition_jobs,
    process_records, retry_and_merge, run_chunk, sort_records, split_rating, AmenityRow,
    ProcessedRecord, ScrapeReport, ScrapeRunner,
};

pub use traits::{
    coords_from_link, ExtractingSession, ItemExtractor, PanelTransport, SearchProvider,
    SearchSession,
};

pub use types::{
    config::{BoundaryFields, PassLimits, ScrapeConfig},
    grid::GridPoint,
    job::{FailedJob, Job},
    record::{PlaceRecord, ScrapeOutcome},
    region::{Region, RegionSelector, RegionSet},
};

pub use io::{
    boundary::{clean_boundary_names, load_regions, save_regions},
    failures::FailureTracker,
};
