//! The query-executor seam.

use async_trait::async_trait;

use crate::error::ExecutionResult;
use crate::types::{config::PassLimits, job::Job, record::PlaceRecord};

/// Factory for query sessions.
///
/// Each worker opens exactly one session and keeps it for its whole chunk;
/// dropping the session releases its execution context, whatever path the
/// worker exits through. Implementations typically wrap a browser context
/// or an HTTP client pool.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    type Session: SearchSession;

    /// Open a fresh execution context.
    async fn open_session(&self) -> ExecutionResult<Self::Session>;
}

/// One worker's query-execution context.
///
/// `search` runs a single geographically-scoped, keyword-scoped query.
/// `Ok(vec![])` means the query ran and found nothing - distinct from
/// `Err`, which is a transport failure. The core records both as the job
/// failing, but only `Err` is logged as an execution error.
///
/// Candidates are returned unfiltered; the radius filter is the core's
/// responsibility, not the session's.
#[async_trait]
pub trait SearchSession: Send {
    async fn search(&mut self, job: &Job, limits: &PassLimits) -> ExecutionResult<Vec<PlaceRecord>>;
}
