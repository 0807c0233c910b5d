//! Pluggable field extraction over raw result panels.
//!
//! Site markup changes; the extraction strategy is versioned and swappable
//! so the rest of the pipeline never has to.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::warn;

use crate::error::{ExecutionResult, ExtractResult};
use crate::traits::provider::SearchSession;
use crate::types::{config::PassLimits, job::Job, record::PlaceRecord};

/// A versioned extraction strategy: raw panel markup in, candidates out.
///
/// One candidate failing field extraction must not fail the whole panel -
/// implementations drop the bad candidate and keep going, returning `Err`
/// only when the panel as a whole is unusable.
pub trait ItemExtractor: Send + Sync {
    /// Strategy identifier, e.g. `"loc1"`.
    fn version(&self) -> &str;

    /// Extract every candidate from one result panel.
    fn extract(&self, panel_html: &str, job: &Job) -> ExtractResult<Vec<PlaceRecord>>;
}

/// Raw transport for result panels: navigate, scroll to exhaustion within
/// the pass limits, hand back the panel markup.
#[async_trait]
pub trait PanelTransport: Send {
    async fn fetch_panel(&mut self, job: &Job, limits: &PassLimits) -> ExecutionResult<String>;
}

/// Compose a panel transport with an extraction strategy into a
/// [`SearchSession`].
///
/// Transport errors propagate (the job will be recorded as failed); an
/// unusable panel is logged and treated as "no candidates", leaving the
/// no-usable-candidates determination to the core.
pub struct ExtractingSession<T, E> {
    transport: T,
    extractor: Arc<E>,
}

impl<T, E> ExtractingSession<T, E> {
    pub fn new(transport: T, extractor: Arc<E>) -> Self {
        Self {
            transport,
            extractor,
        }
    }
}

#[async_trait]
impl<T, E> SearchSession for ExtractingSession<T, E>
where
    T: PanelTransport,
    E: ItemExtractor,
{
    async fn search(&mut self, job: &Job, limits: &PassLimits) -> ExecutionResult<Vec<PlaceRecord>> {
        let panel = self.transport.fetch_panel(job, limits).await?;
        match self.extractor.extract(&panel, job) {
            Ok(candidates) => Ok(candidates),
            Err(err) => {
                warn!(
                    "extractor {} got an unusable panel for '{}': {err}",
                    self.extractor.version(),
                    job.keyword
                );
                Ok(Vec::new())
            }
        }
    }
}

/// Pull the `!3d<lat>!4d<lon>` coordinate pair out of a result link.
pub fn coords_from_link(url: &str) -> Option<(f64, f64)> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"!3d([-\d.]+)!4d([-\d.]+)").expect("coordinate pattern is valid")
    });

    let caps = pattern.captures(url)?;
    let latitude = caps.get(1)?.as_str().parse().ok()?;
    let longitude = caps.get(2)?.as_str().parse().ok()?;
    Some((latitude, longitude))
}
