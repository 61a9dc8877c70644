//! Per-specialist invocation state machine.
//!
//! ```text
//! PENDING ──ok──────────▶ SUCCEEDED
//!    │
//!    ├──deadline────────▶ TIMED_OUT
//!    │
//!    └──error──▶ FAILED ──fallback ok──▶ FELL_BACK
//!                  │
//!                  └──fallback error──▶ FAILED (terminal)
//! ```
//!
//! The dispatcher drives one of these per specialist instead of nesting
//! error handling, so every specialist ends in exactly one terminal state.

use super::opinion::{Opinion, OpinionStatus};
use crate::core::id::SpecialistId;

#[derive(Debug, Clone, PartialEq)]
pub enum InvocationState {
    Pending,
    Succeeded(Opinion),
    TimedOut(Opinion),
    /// Primary call failed; the fallback has not run yet
    PrimaryFailed { reason: String },
    FellBack(Opinion),
    Failed(Opinion),
}

/// Drives a single specialist invocation to a terminal opinion.
#[derive(Debug, Clone)]
pub struct Invocation {
    specialist_id: SpecialistId,
    framework: String,
    state: InvocationState,
}

impl Invocation {
    pub fn new(specialist_id: SpecialistId, framework: impl Into<String>) -> Self {
        Self {
            specialist_id,
            framework: framework.into(),
            state: InvocationState::Pending,
        }
    }

    pub fn specialist_id(&self) -> &SpecialistId {
        &self.specialist_id
    }

    pub fn state(&self) -> &InvocationState {
        &self.state
    }

    /// Whether the fallback should run next
    pub fn needs_fallback(&self) -> bool {
        matches!(self.state, InvocationState::PrimaryFailed { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            InvocationState::Succeeded(_)
                | InvocationState::TimedOut(_)
                | InvocationState::FellBack(_)
                | InvocationState::Failed(_)
        )
    }

    /// PENDING → SUCCEEDED, or → PRIMARY_FAILED if the opinion carries no decision.
    pub fn primary_returned(&mut self, opinion: Opinion) {
        if !matches!(self.state, InvocationState::Pending) {
            return;
        }
        if opinion.decision.is_none() {
            self.state = InvocationState::PrimaryFailed {
                reason: format!("returned no decision ({})", opinion.status),
            };
            return;
        }
        let opinion = self.stamp(opinion, OpinionStatus::Succeeded);
        self.state = InvocationState::Succeeded(opinion);
    }

    /// PENDING → PRIMARY_FAILED
    pub fn primary_failed(&mut self, reason: impl Into<String>) {
        if matches!(self.state, InvocationState::Pending) {
            self.state = InvocationState::PrimaryFailed {
                reason: reason.into(),
            };
        }
    }

    /// PENDING → TIMED_OUT
    pub fn timed_out(&mut self, reason: impl Into<String>) {
        if matches!(self.state, InvocationState::Pending) {
            let opinion = Opinion::timed_out(self.specialist_id.clone(), reason)
                .with_framework(self.framework.clone());
            self.state = InvocationState::TimedOut(opinion);
        }
    }

    /// PRIMARY_FAILED → FELL_BACK, or → FAILED if the fallback gave no decision
    pub fn fallback_returned(&mut self, opinion: Opinion) {
        let InvocationState::PrimaryFailed { reason } = &self.state else {
            return;
        };
        if opinion.decision.is_none() {
            let reason = format!("{}; fallback returned no decision", reason);
            self.fail(reason);
            return;
        }
        let opinion = self.stamp(opinion, OpinionStatus::FellBack);
        self.state = InvocationState::FellBack(opinion);
    }

    /// PRIMARY_FAILED → FAILED
    pub fn fallback_failed(&mut self, fallback_reason: impl Into<String>) {
        let InvocationState::PrimaryFailed { reason } = &self.state else {
            return;
        };
        let reason = format!("{}; fallback failed: {}", reason, fallback_reason.into());
        self.fail(reason);
    }

    /// Any state → FAILED, used when the invocation task itself died
    pub fn abort(&mut self, reason: impl Into<String>) {
        if !self.is_terminal() {
            self.fail(reason.into());
        }
    }

    /// The terminal opinion. A non-terminal invocation yields FAILED.
    pub fn into_opinion(self) -> Opinion {
        match self.state {
            InvocationState::Succeeded(op)
            | InvocationState::TimedOut(op)
            | InvocationState::FellBack(op)
            | InvocationState::Failed(op) => op,
            InvocationState::PrimaryFailed { reason } => {
                Opinion::failed(self.specialist_id, reason).with_framework(self.framework)
            }
            InvocationState::Pending => {
                Opinion::failed(self.specialist_id, "invocation never completed")
                    .with_framework(self.framework)
            }
        }
    }

    fn fail(&mut self, reason: String) {
        let opinion =
            Opinion::failed(self.specialist_id.clone(), reason).with_framework(self.framework.clone());
        self.state = InvocationState::Failed(opinion);
    }

    fn stamp(&self, opinion: Opinion, status: OpinionStatus) -> Opinion {
        let mut opinion = opinion.relabel(self.specialist_id.clone(), status);
        if opinion.framework.is_empty() {
            opinion.framework = self.framework.clone();
        }
        opinion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decision::Decision;

    fn invocation() -> Invocation {
        Invocation::new(SpecialistId::from("utilitarian"), "Utilitarianism")
    }

    #[test]
    fn test_success_path_relabels_id() {
        let mut inv = invocation();
        inv.primary_returned(Opinion::succeeded("someone-else", Decision::Allow, 0.8, "fine"));
        assert!(inv.is_terminal());

        let op = inv.into_opinion();
        assert_eq!(op.specialist_id.as_str(), "utilitarian");
        assert_eq!(op.status, OpinionStatus::Succeeded);
        assert_eq!(op.framework, "Utilitarianism");
    }

    #[test]
    fn test_failure_then_fallback() {
        let mut inv = invocation();
        inv.primary_failed("connection refused");
        assert!(inv.needs_fallback());

        inv.fallback_returned(Opinion::succeeded("x", Decision::FlagForReview, 0.4, "keywords"));
        let op = inv.into_opinion();
        assert_eq!(op.status, OpinionStatus::FellBack);
        assert_eq!(op.decision, Some(Decision::FlagForReview));
    }

    #[test]
    fn test_failure_then_fallback_failure() {
        let mut inv = invocation();
        inv.primary_failed("connection refused");
        inv.fallback_failed("no heuristics loaded");

        let op = inv.into_opinion();
        assert_eq!(op.status, OpinionStatus::Failed);
        assert!(op.rationale.contains("connection refused"));
        assert!(op.rationale.contains("no heuristics loaded"));
    }

    #[test]
    fn test_primary_without_decision_needs_fallback() {
        let mut inv = invocation();
        inv.primary_returned(Opinion::failed("utilitarian", "model refused"));
        assert!(inv.needs_fallback());
    }

    #[test]
    fn test_timeout_is_terminal_and_ignores_late_results() {
        let mut inv = invocation();
        inv.timed_out("no answer within 10ms");
        inv.primary_returned(Opinion::succeeded("utilitarian", Decision::Allow, 0.9, "late"));

        let op = inv.into_opinion();
        assert_eq!(op.status, OpinionStatus::TimedOut);
        assert_eq!(op.decision, None);
    }

    #[test]
    fn test_pending_into_opinion_is_failed() {
        let op = invocation().into_opinion();
        assert_eq!(op.status, OpinionStatus::Failed);
    }
}
