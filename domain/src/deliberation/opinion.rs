//! Opinion value object - one specialist's verdict on one task.

use crate::core::decision::Decision;
use crate::core::id::SpecialistId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All opinions of one deliberation, keyed by specialist
pub type OpinionSet = BTreeMap<SpecialistId, Opinion>;

/// How the opinion came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpinionStatus {
    /// Primary evaluation completed
    Succeeded,
    /// Primary and fallback evaluation both failed
    Failed,
    /// Primary evaluation did not finish within its timeout
    TimedOut,
    /// Primary evaluation failed; degraded local analysis was used instead
    FellBack,
}

impl OpinionStatus {
    /// Whether opinions with this status take part in the vote
    pub fn is_participating(&self) -> bool {
        matches!(self, OpinionStatus::Succeeded | OpinionStatus::FellBack)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OpinionStatus::Succeeded => "SUCCEEDED",
            OpinionStatus::Failed => "FAILED",
            OpinionStatus::TimedOut => "TIMED_OUT",
            OpinionStatus::FellBack => "FELL_BACK",
        }
    }
}

impl std::fmt::Display for OpinionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A specialist's structured verdict.
///
/// `decision` is `Some` exactly when `status` is SUCCEEDED or FELL_BACK;
/// FAILED and TIMED_OUT opinions carry no decision and confidence 0.
/// The constructors are the only way to reach a consistent state, so
/// prefer them over struct literals.
///
/// # Example
///
/// ```
/// use council_domain::{Decision, Opinion, OpinionStatus};
///
/// let op = Opinion::succeeded("utilitarian", Decision::Allow, 0.8, "Net benefit outweighs harm")
///     .with_evidence(vec!["Contains 'education' indicators".to_string()]);
/// assert!(op.is_participating());
///
/// let late = Opinion::timed_out("cultural", "no answer within 5000ms");
/// assert_eq!(late.status, OpinionStatus::TimedOut);
/// assert_eq!(late.decision, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub specialist_id: SpecialistId,
    /// Ethical framework the specialist reasons from (e.g. "Utilitarianism")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub framework: String,
    pub decision: Option<Decision>,
    pub confidence: f64,
    pub rationale: String,
    #[serde(default)]
    pub evidence: Vec<String>,
    pub status: OpinionStatus,
}

impl Opinion {
    fn participating(
        specialist_id: impl Into<SpecialistId>,
        decision: Decision,
        confidence: f64,
        rationale: impl Into<String>,
        status: OpinionStatus,
    ) -> Self {
        Self {
            specialist_id: specialist_id.into(),
            framework: String::new(),
            decision: Some(decision),
            confidence: clamp_confidence(confidence),
            rationale: rationale.into(),
            evidence: Vec::new(),
            status,
        }
    }

    fn absent(
        specialist_id: impl Into<SpecialistId>,
        reason: impl Into<String>,
        status: OpinionStatus,
    ) -> Self {
        Self {
            specialist_id: specialist_id.into(),
            framework: String::new(),
            decision: None,
            confidence: 0.0,
            rationale: reason.into(),
            evidence: Vec::new(),
            status,
        }
    }

    /// Opinion from a completed primary evaluation
    pub fn succeeded(
        specialist_id: impl Into<SpecialistId>,
        decision: Decision,
        confidence: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self::participating(
            specialist_id,
            decision,
            confidence,
            rationale,
            OpinionStatus::Succeeded,
        )
    }

    /// Opinion from the degraded local analysis
    pub fn fell_back(
        specialist_id: impl Into<SpecialistId>,
        decision: Decision,
        confidence: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self::participating(
            specialist_id,
            decision,
            confidence,
            rationale,
            OpinionStatus::FellBack,
        )
    }

    /// Placeholder for a specialist whose evaluation and fallback both failed
    pub fn failed(specialist_id: impl Into<SpecialistId>, reason: impl Into<String>) -> Self {
        Self::absent(specialist_id, reason, OpinionStatus::Failed)
    }

    /// Placeholder for a specialist that did not answer in time
    pub fn timed_out(specialist_id: impl Into<SpecialistId>, reason: impl Into<String>) -> Self {
        Self::absent(specialist_id, reason, OpinionStatus::TimedOut)
    }

    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn with_framework(mut self, framework: impl Into<String>) -> Self {
        self.framework = framework.into();
        self
    }

    /// Re-label a participating opinion under another id and status.
    ///
    /// Non-participating target statuses drop the decision so the
    /// decision/status invariant keeps holding. Confidence is forced back
    /// into [0, 1] since the fields are public and may have been set directly.
    pub fn relabel(mut self, specialist_id: SpecialistId, status: OpinionStatus) -> Self {
        self.specialist_id = specialist_id;
        self.status = status;
        if status.is_participating() {
            self.confidence = clamp_confidence(self.confidence);
        } else {
            self.decision = None;
            self.confidence = 0.0;
        }
        self
    }

    /// Whether this opinion takes part in the vote
    pub fn is_participating(&self) -> bool {
        self.status.is_participating() && self.decision.is_some()
    }

    /// The decision, only if this opinion takes part in the vote
    pub fn vote(&self) -> Option<Decision> {
        if self.status.is_participating() {
            self.decision
        } else {
            None
        }
    }
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_succeeded_opinion() {
        let op = Opinion::succeeded("a", Decision::Remove, 0.9, "harmful");
        assert_eq!(op.decision, Some(Decision::Remove));
        assert_eq!(op.status, OpinionStatus::Succeeded);
        assert!(op.is_participating());
        assert_eq!(op.vote(), Some(Decision::Remove));
    }

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(Opinion::succeeded("a", Decision::Allow, 1.7, "").confidence, 1.0);
        assert_eq!(Opinion::fell_back("a", Decision::Allow, -0.2, "").confidence, 0.0);
        assert_eq!(Opinion::succeeded("a", Decision::Allow, f64::NAN, "").confidence, 0.0);
    }

    #[test]
    fn test_absent_opinions_carry_no_decision() {
        let failed = Opinion::failed("a", "boom");
        assert_eq!(failed.decision, None);
        assert_eq!(failed.confidence, 0.0);
        assert!(!failed.is_participating());

        let late = Opinion::timed_out("b", "too slow");
        assert_eq!(late.status, OpinionStatus::TimedOut);
        assert_eq!(late.vote(), None);
    }

    #[test]
    fn test_relabel_keeps_invariant() {
        let op = Opinion::succeeded("wrong-id", Decision::Allow, 0.7, "ok")
            .relabel(SpecialistId::from("right-id"), OpinionStatus::FellBack);
        assert_eq!(op.specialist_id.as_str(), "right-id");
        assert_eq!(op.status, OpinionStatus::FellBack);
        assert_eq!(op.decision, Some(Decision::Allow));

        let op = op.relabel(SpecialistId::from("right-id"), OpinionStatus::Failed);
        assert_eq!(op.decision, None);
        assert_eq!(op.confidence, 0.0);
    }

    #[test]
    fn test_relabel_clamps_directly_assigned_confidence() {
        let mut op = Opinion::succeeded("a", Decision::Remove, 0.5, "ok");
        op.confidence = 7.0;
        let op = op.relabel(SpecialistId::from("a"), OpinionStatus::Succeeded);
        assert_eq!(op.confidence, 1.0);

        let mut op = Opinion::succeeded("a", Decision::Remove, 0.5, "ok");
        op.confidence = f64::NAN;
        let op = op.relabel(SpecialistId::from("a"), OpinionStatus::FellBack);
        assert_eq!(op.confidence, 0.0);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&OpinionStatus::FellBack).unwrap();
        assert_eq!(json, "\"FELL_BACK\"");
        assert!(OpinionStatus::FellBack.is_participating());
        assert!(!OpinionStatus::TimedOut.is_participating());
    }
}
