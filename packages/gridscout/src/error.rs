//! Typed errors for the gridscout library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling. Three taxonomies, matching
//! how far a failure is allowed to travel:
//!
//! - [`PipelineError`] - fatal to the step that raised it
//! - [`ExecutionError`] - one job's query attempt; recorded as a failed job,
//!   never propagated past the per-job boundary
//! - [`ExtractError`] - one candidate's field extraction; the candidate is
//!   dropped, the job's other candidates are unaffected

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the pipeline step that raised them.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A caller-supplied parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Boundary data contained no usable geometry.
    #[error("boundary data is empty")]
    EmptyBoundary,

    /// A boundary feature carried geometry other than polygons.
    #[error("unsupported boundary geometry: {kind}")]
    UnsupportedGeometry { kind: &'static str },

    /// A tabular input is missing required columns.
    #[error("{path:?} is missing required columns: {columns:?}")]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    /// A tabular input parsed but contained no rows.
    #[error("{path:?} contains no rows")]
    EmptyTable { path: PathBuf },

    /// A region name/code query resolved against nothing.
    #[error("no region matching '{query}'")]
    NoMatch { query: String },

    /// Refusing to overwrite an existing output without `force`.
    #[error("output already exists: {path:?}")]
    OutputExists { path: PathBuf },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tabular read/write failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Boundary file parse failure
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from one job's query attempt.
///
/// Recovered at the per-job boundary: the job is recorded as failed and the
/// worker moves on to the next one.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The results panel never appeared within the wait timeout.
    #[error("timed out after {waited_secs}s waiting for results")]
    Timeout { waited_secs: u64 },

    /// Underlying transport failed (navigation, connection, session death).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An expected page element was missing.
    #[error("missing expected element: {selector}")]
    MissingElement { selector: String },

    /// The session was closed or could not be opened.
    #[error("session unavailable: {reason}")]
    Session { reason: String },
}

impl ExecutionError {
    /// Wrap an arbitrary error as a transport failure.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }
}

/// Errors from one candidate's field extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A required field was absent from the candidate's markup.
    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    /// The candidate's markup did not have the expected shape.
    #[error("malformed candidate: {reason}")]
    Malformed { reason: String },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for per-job execution.
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Result type alias for per-candidate extraction.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
