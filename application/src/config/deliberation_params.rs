//! Deliberation parameters for the use case.
//!
//! [`DeliberationParams`] groups the static parameters that control one
//! run of the [`DeliberateUseCase`](crate::use_cases::deliberate::DeliberateUseCase):
//! timeouts, input limits, cross-examination policy and audit retries.
//! Per-specialist weights live on the registry, not here.

use council_domain::{
    DEFAULT_LOW_CONFIDENCE_THRESHOLD, DEFAULT_MAX_CONTENT_LENGTH, ExaminationPolicy,
    TieBreakOrder,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-specialist timeout
pub const DEFAULT_SPECIALIST_TIMEOUT: Duration = Duration::from_millis(5000);

/// Default number of audit emission attempts
pub const DEFAULT_AUDIT_RETRY_BUDGET: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationParams {
    /// Upper bound for each specialist's primary evaluation.
    pub specialist_timeout: Duration,
    /// Optional bound on the whole dispatch phase.
    pub deliberation_timeout: Option<Duration>,
    /// Opinions below this confidence are flagged during cross-examination.
    pub low_confidence_threshold: f64,
    /// Maximum content length, in characters.
    pub max_content_length: usize,
    /// Preference order for tied votes.
    pub tie_break: TieBreakOrder,
    /// Attempts made to deliver an audit record.
    pub audit_retry_budget: u32,
    /// Base delay between audit attempts; attempt `n` waits `n * backoff`.
    pub audit_retry_backoff: Duration,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            specialist_timeout: DEFAULT_SPECIALIST_TIMEOUT,
            deliberation_timeout: None,
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            tie_break: TieBreakOrder::default(),
            audit_retry_budget: DEFAULT_AUDIT_RETRY_BUDGET,
            audit_retry_backoff: Duration::from_millis(200),
        }
    }
}

impl DeliberationParams {
    /// Cross-examination policy derived from these parameters
    pub fn examination_policy(&self) -> ExaminationPolicy {
        ExaminationPolicy::default()
            .with_low_confidence_threshold(self.low_confidence_threshold)
            .with_tie_break(self.tie_break.clone())
    }

    // ==================== Builder Methods ====================

    pub fn with_specialist_timeout(mut self, timeout: Duration) -> Self {
        self.specialist_timeout = timeout;
        self
    }

    pub fn with_deliberation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.deliberation_timeout = timeout;
        self
    }

    pub fn with_low_confidence_threshold(mut self, threshold: f64) -> Self {
        self.low_confidence_threshold = threshold;
        self
    }

    pub fn with_max_content_length(mut self, max: usize) -> Self {
        self.max_content_length = max;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreakOrder) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_audit_retry(mut self, budget: u32, backoff: Duration) -> Self {
        self.audit_retry_budget = budget;
        self.audit_retry_backoff = backoff;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::Decision;

    #[test]
    fn test_default() {
        let params = DeliberationParams::default();
        assert_eq!(params.specialist_timeout, Duration::from_secs(5));
        assert_eq!(params.deliberation_timeout, None);
        assert_eq!(params.low_confidence_threshold, 0.5);
        assert_eq!(params.max_content_length, 10_000);
        assert_eq!(params.audit_retry_budget, 3);
    }

    #[test]
    fn test_builder() {
        let order =
            TieBreakOrder::new(vec![Decision::Allow, Decision::FlagForReview, Decision::Remove])
                .unwrap();
        let params = DeliberationParams::default()
            .with_specialist_timeout(Duration::from_millis(250))
            .with_deliberation_timeout(Some(Duration::from_secs(1)))
            .with_low_confidence_threshold(0.7)
            .with_tie_break(order.clone());

        assert_eq!(params.specialist_timeout, Duration::from_millis(250));
        assert_eq!(params.deliberation_timeout, Some(Duration::from_secs(1)));

        let policy = params.examination_policy();
        assert_eq!(policy.low_confidence_threshold, 0.7);
        assert_eq!(policy.tie_break, order);
    }
}
