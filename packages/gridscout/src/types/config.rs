//! Configuration for scrape runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Per-pass executor limits: how hard one query attempt tries before
/// giving up.
///
/// The retry-pass defaults are deliberately more generous than the initial
/// pass: transient failures need more patience, not more breadth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassLimits {
    /// Maximum scroll steps through one result panel.
    pub scroll_max: u32,
    /// How long to wait for the results panel to appear.
    pub wait_timeout: Duration,
    /// Pause between scroll steps.
    pub scroll_interval: Duration,
    /// Give up scrolling after this long with no new cards.
    pub scroll_timeout: Duration,
}

impl PassLimits {
    /// Defaults for the initial scrape pass.
    pub fn initial() -> Self {
        Self {
            scroll_max: 50,
            wait_timeout: Duration::from_secs(20),
            scroll_interval: Duration::from_millis(800),
            scroll_timeout: Duration::from_secs(4),
        }
    }

    /// Relaxed defaults for the retry pass.
    pub fn retry() -> Self {
        Self {
            scroll_max: 120,
            wait_timeout: Duration::from_secs(35),
            scroll_interval: Duration::from_millis(1500),
            scroll_timeout: Duration::from_secs(8),
        }
    }

    /// Set the maximum scroll steps.
    pub fn with_scroll_max(mut self, scroll_max: u32) -> Self {
        self.scroll_max = scroll_max;
        self
    }

    /// Set the results-panel wait timeout.
    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    /// Set the pause between scroll steps.
    pub fn with_scroll_interval(mut self, scroll_interval: Duration) -> Self {
        self.scroll_interval = scroll_interval;
        self
    }

    /// Set the no-new-cards stall timeout.
    pub fn with_scroll_timeout(mut self, scroll_timeout: Duration) -> Self {
        self.scroll_timeout = scroll_timeout;
        self
    }
}

impl Default for PassLimits {
    fn default() -> Self {
        Self::initial()
    }
}

/// Property names carrying the display name and region code in a boundary
/// file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryFields {
    pub name: String,
    pub code: String,
}

impl BoundaryFields {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

impl Default for BoundaryFields {
    fn default() -> Self {
        Self::new("ADM1_ES", "ADM1_PCODE")
    }
}

/// Configuration for a full scrape run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Search radius in meters; candidates farther than this from their
    /// query point are discarded before a job is judged.
    pub radius_m: f64,
    /// Grid spacing as a fraction of the radius.
    pub spacing_ratio: f64,
    /// Search keywords; jobs are the grid x keyword cross-product.
    pub keywords: Vec<String>,
    /// Number of parallel worker chunks.
    pub worker_count: usize,
    /// Limits for the initial pass.
    pub initial_limits: PassLimits,
    /// Limits for the retry pass.
    pub retry_limits: PassLimits,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            radius_m: 1000.0,
            spacing_ratio: 0.8,
            keywords: Vec::new(),
            worker_count: 3,
            initial_limits: PassLimits::initial(),
            retry_limits: PassLimits::retry(),
        }
    }
}

impl ScrapeConfig {
    /// Create a config with the given search radius and default tuning.
    pub fn new(radius_m: f64) -> Self {
        Self {
            radius_m,
            ..Default::default()
        }
    }

    /// Set the keyword list.
    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(|k| k.into()).collect();
        self
    }

    /// Set the worker count.
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Set the spacing ratio.
    pub fn with_spacing_ratio(mut self, spacing_ratio: f64) -> Self {
        self.spacing_ratio = spacing_ratio;
        self
    }

    /// Set the initial-pass limits.
    pub fn with_initial_limits(mut self, limits: PassLimits) -> Self {
        self.initial_limits = limits;
        self
    }

    /// Set the retry-pass limits.
    pub fn with_retry_limits(mut self, limits: PassLimits) -> Self {
        self.retry_limits = limits;
        self
    }

    /// Grid spacing in meters, derived from the radius.
    pub fn spacing_m(&self) -> f64 {
        self.radius_m * self.spacing_ratio
    }

    /// Validate the configuration before a run.
    pub fn validate(&self) -> Result<()> {
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(PipelineError::InvalidParameter {
                name: "radius_m",
                reason: format!("must be a positive number of meters, got {}", self.radius_m),
            });
        }
        if !self.spacing_ratio.is_finite() || self.spacing_ratio <= 0.0 {
            return Err(PipelineError::InvalidParameter {
                name: "spacing_ratio",
                reason: format!("must be positive, got {}", self.spacing_ratio),
            });
        }
        if self.worker_count == 0 {
            return Err(PipelineError::InvalidParameter {
                name: "worker_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.keywords.is_empty() {
            return Err(PipelineError::InvalidParameter {
                name: "keywords",
                reason: "at least one keyword is required".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_tuned_constants() {
        let config = ScrapeConfig::default();
        assert_eq!(config.spacing_ratio, 0.8);
        assert_eq!(config.worker_count, 3);
        assert_eq!(config.initial_limits.scroll_max, 50);
        assert_eq!(config.retry_limits.scroll_max, 120);
        assert_eq!(config.spacing_m(), 800.0);
    }

    #[test]
    fn retry_limits_are_more_generous() {
        let initial = PassLimits::initial();
        let retry = PassLimits::retry();
        assert!(retry.scroll_max > initial.scroll_max);
        assert!(retry.wait_timeout > initial.wait_timeout);
        assert!(retry.scroll_timeout > initial.scroll_timeout);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        let valid = ScrapeConfig::new(1000.0).with_keywords(["Hotel"]);
        assert!(valid.validate().is_ok());

        assert!(ScrapeConfig::new(0.0).with_keywords(["Hotel"]).validate().is_err());
        assert!(ScrapeConfig::new(-5.0).with_keywords(["Hotel"]).validate().is_err());
        assert!(valid.clone().with_spacing_ratio(0.0).validate().is_err());
        assert!(valid.clone().with_worker_count(0).validate().is_err());
        assert!(ScrapeConfig::new(1000.0).validate().is_err());
    }
}
