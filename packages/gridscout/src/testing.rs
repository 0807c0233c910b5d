//! Mock search providers for exercising the pipeline without a browser.
//!
//! Useful for testing applications built on this crate as well as the
//! crate's own pipeline: responses are scripted per job, failures can be
//! injected at the search and session-open levels, and every call is
//! logged for assertions.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{ExecutionError, ExecutionResult};
use crate::traits::provider::{SearchProvider, SearchSession};
use crate::types::config::PassLimits;
use crate::types::job::Job;
use crate::types::record::PlaceRecord;

/// Canned response for one job.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Return these candidates.
    Records(Vec<PlaceRecord>),
    /// Fail with a transport error carrying this message.
    Fail(String),
}

/// Key jobs by their identity triple for canned lookups.
fn job_key(job: &Job) -> String {
    format!("{:.5},{:.5},{}", job.latitude, job.longitude, job.keyword)
}

/// A mock [`SearchProvider`] returning scripted responses.
///
/// Jobs without a script return no candidates (the "no results" outcome).
/// Sessions share the provider's script and call log, so assertions can be
/// made on the provider after a run.
#[derive(Default)]
pub struct MockProvider {
    responses: Arc<RwLock<HashMap<String, ScriptedResponse>>>,
    searches: Arc<RwLock<Vec<Job>>>,
    sessions_opened: Arc<RwLock<usize>>,
    fail_open: Arc<RwLock<bool>>,
}

impl MockProvider {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script candidates for a job (builder pattern).
    pub fn with_records(self, job: &Job, records: Vec<PlaceRecord>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(job_key(job), ScriptedResponse::Records(records));
        self
    }

    /// Script a transport failure for a job.
    pub fn with_failure(self, job: &Job, message: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(job_key(job), ScriptedResponse::Fail(message.into()));
        self
    }

    /// Make every `open_session` call fail.
    pub fn with_failing_sessions(self) -> Self {
        *self.fail_open.write().unwrap() = true;
        self
    }

    /// Replace the script for a job after construction.
    pub fn script(&self, job: &Job, response: ScriptedResponse) {
        self.responses.write().unwrap().insert(job_key(job), response);
    }

    /// Jobs searched so far, in call order.
    pub fn searches(&self) -> Vec<Job> {
        self.searches.read().unwrap().clone()
    }

    /// Number of searches run so far.
    pub fn search_count(&self) -> usize {
        self.searches.read().unwrap().len()
    }

    /// Number of sessions opened so far.
    pub fn sessions_opened(&self) -> usize {
        *self.sessions_opened.read().unwrap()
    }
}

/// A session handed out by [`MockProvider`].
pub struct MockSession {
    responses: Arc<RwLock<HashMap<String, ScriptedResponse>>>,
    searches: Arc<RwLock<Vec<Job>>>,
}

#[async_trait]
impl SearchProvider for MockProvider {
    type Session = MockSession;

    async fn open_session(&self) -> ExecutionResult<MockSession> {
        if *self.fail_open.read().unwrap() {
            return Err(ExecutionError::Session {
                reason: "scripted open failure".to_string(),
            });
        }
        *self.sessions_opened.write().unwrap() += 1;
        Ok(MockSession {
            responses: Arc::clone(&self.responses),
            searches: Arc::clone(&self.searches),
        })
    }
}

#[async_trait]
impl SearchSession for MockSession {
    async fn search(
        &mut self,
        job: &Job,
        _limits: &PassLimits,
    ) -> ExecutionResult<Vec<PlaceRecord>> {
        self.searches.write().unwrap().push(job.clone());

        let scripted = self.responses.read().unwrap().get(&job_key(job)).cloned();
        match scripted {
            Some(ScriptedResponse::Records(records)) => Ok(records),
            Some(ScriptedResponse::Fail(message)) => Err(ExecutionError::Transport(message.into())),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::grid::GridPoint;

    fn job(keyword: &str) -> Job {
        Job::new(GridPoint::new(-25.3, -57.6), keyword)
    }

    #[tokio::test]
    async fn unscripted_jobs_return_no_candidates() {
        let provider = MockProvider::new();
        let mut session = provider.open_session().await.unwrap();

        let records = session.search(&job("Hotel"), &PassLimits::initial()).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(provider.search_count(), 1);
        assert_eq!(provider.sessions_opened(), 1);
    }

    #[tokio::test]
    async fn scripted_failures_surface_as_transport_errors() {
        let target = job("Hotel");
        let provider = MockProvider::new().with_failure(&target, "boom");
        let mut session = provider.open_session().await.unwrap();

        let err = session.search(&target, &PassLimits::initial()).await.unwrap_err();
        assert!(matches!(err, ExecutionError::Transport(_)));
    }

    #[tokio::test]
    async fn scripts_can_change_between_passes() {
        let target = job("Hotel");
        let provider = MockProvider::new().with_failure(&target, "flaky");
        let record = PlaceRecord::new(-25.3, -57.6, "Hotel", "Gran Hotel", "link");

        provider.script(&target, ScriptedResponse::Records(vec![record.clone()]));

        let mut session = provider.open_session().await.unwrap();
        let records = session.search(&target, &PassLimits::initial()).await.unwrap();
        assert_eq!(records, vec![record]);
    }
}
