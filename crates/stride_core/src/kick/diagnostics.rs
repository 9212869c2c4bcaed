//! Kick-evaluation diagnostics.
//!
//! Records one row per exhaustive evaluation through `tracing`. The
//! header with the check names is emitted once per collector instance.
//! The collector is injected wherever it is needed; no global state.

use super::evaluator::KickEstimator;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct CheckTrace {
    header_logged: bool,
}

impl CheckTrace {
    pub fn new() -> Self {
        CheckTrace::default()
    }

    /// Log the pass/fail vector of the estimator's last evaluation.
    pub fn record(&mut self, kick_name: &str, estimator: &KickEstimator, score: f32) {
        if !self.header_logged {
            self.header_logged = true;
            debug!(checks = ?estimator.check_names(), "kick check columns");
        }

        let results = estimator.last_results();
        let passed = results.iter().filter(|r| **r).count();
        debug!(
            kick = kick_name,
            score,
            passed,
            total = results.len(),
            results = ?results,
            "kick evaluation"
        );
    }
}
