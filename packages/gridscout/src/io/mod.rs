//! Persisted artifacts: boundary files, tabular exports, failure sets.

pub mod boundary;
pub mod failures;
pub mod tables;

pub use boundary::{clean_boundary_names, load_regions, save_regions, CLEANED_NAME_FIELD};
pub use failures::FailureTracker;
pub use tables::{
    read_grid, read_jobs, read_records, write_amenities, write_grid, write_jobs, write_processed,
    write_records,
};
