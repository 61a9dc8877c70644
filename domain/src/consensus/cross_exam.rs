//! Cross-examination - classify specialist opinions into agreement,
//! conflict and low-confidence sets.

use super::tie_break::TieBreakOrder;
use crate::core::decision::Decision;
use crate::core::id::SpecialistId;
use crate::deliberation::opinion::OpinionSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Default confidence below which an opinion is flagged
pub const DEFAULT_LOW_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Knobs for [`examine`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExaminationPolicy {
    pub low_confidence_threshold: f64,
    pub tie_break: TieBreakOrder,
}

impl Default for ExaminationPolicy {
    fn default() -> Self {
        Self {
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            tie_break: TieBreakOrder::default(),
        }
    }
}

impl ExaminationPolicy {
    pub fn with_low_confidence_threshold(mut self, threshold: f64) -> Self {
        self.low_confidence_threshold = threshold;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreakOrder) -> Self {
        self.tie_break = tie_break;
        self
    }
}

/// A participating specialist that diverges from the majority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub specialist_id: SpecialistId,
    pub decision: Decision,
}

/// Result of cross-examining a set of opinions.
///
/// Derived and ephemeral: it is recomputed from the opinions and never
/// stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossExamination {
    /// Decision held by the largest group of participants
    pub majority_decision: Option<Decision>,
    pub agreements: BTreeSet<SpecialistId>,
    pub conflicts: Vec<Conflict>,
    pub low_confidence: BTreeSet<SpecialistId>,
    /// FAILED and TIMED_OUT specialists, kept on the record outside the vote
    pub non_participating: BTreeSet<SpecialistId>,
    /// Participant count per decision
    pub tally: BTreeMap<Decision, usize>,
    /// Ordering used to break ties; synthesis reuses it
    pub tie_break: TieBreakOrder,
}

impl CrossExamination {
    pub fn participant_count(&self) -> usize {
        self.tally.values().sum()
    }

    /// True when at least one specialist participated and none disagreed
    pub fn is_unanimous(&self) -> bool {
        self.majority_decision.is_some() && self.conflicts.is_empty()
    }

    pub fn is_conflicting(&self, id: &SpecialistId) -> bool {
        self.conflicts.iter().any(|c| &c.specialist_id == id)
    }
}

/// Cross-examine `opinions`.
///
/// Pure and deterministic: identical input yields identical output.
pub fn examine(opinions: &OpinionSet, policy: &ExaminationPolicy) -> CrossExamination {
    let mut tally: BTreeMap<Decision, usize> = BTreeMap::new();
    let mut non_participating = BTreeSet::new();
    let mut low_confidence = BTreeSet::new();

    for (id, opinion) in opinions {
        match opinion.vote() {
            Some(decision) => {
                *tally.entry(decision).or_insert(0) += 1;
                if opinion.confidence < policy.low_confidence_threshold {
                    low_confidence.insert(id.clone());
                }
            }
            None => {
                non_participating.insert(id.clone());
            }
        }
    }

    let majority_decision = tally
        .iter()
        .map(|(decision, count)| (*decision, *count))
        .reduce(|best, candidate| {
            if candidate.1 > best.1
                || (candidate.1 == best.1
                    && policy.tie_break.prefer(best.0, candidate.0) == candidate.0)
            {
                candidate
            } else {
                best
            }
        })
        .map(|(decision, _)| decision);

    let mut agreements = BTreeSet::new();
    let mut conflicts = Vec::new();

    if let Some(majority) = majority_decision {
        for (id, opinion) in opinions {
            match opinion.vote() {
                Some(decision) if decision == majority => {
                    agreements.insert(id.clone());
                }
                Some(decision) => conflicts.push(Conflict {
                    specialist_id: id.clone(),
                    decision,
                }),
                None => {}
            }
        }
    }

    CrossExamination {
        majority_decision,
        agreements,
        conflicts,
        low_confidence,
        non_participating,
        tally,
        tie_break: policy.tie_break.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliberation::opinion::Opinion;

    fn set(opinions: Vec<Opinion>) -> OpinionSet {
        opinions
            .into_iter()
            .map(|o| (o.specialist_id.clone(), o))
            .collect()
    }

    #[test]
    fn test_unanimous() {
        let ops = set(vec![
            Opinion::succeeded("a", Decision::Allow, 0.9, ""),
            Opinion::succeeded("b", Decision::Allow, 0.8, ""),
        ]);
        let exam = examine(&ops, &ExaminationPolicy::default());

        assert_eq!(exam.majority_decision, Some(Decision::Allow));
        assert!(exam.is_unanimous());
        assert_eq!(exam.agreements.len(), 2);
        assert!(exam.conflicts.is_empty());
    }

    #[test]
    fn test_majority_and_conflicts() {
        let ops = set(vec![
            Opinion::succeeded("a", Decision::Allow, 0.9, ""),
            Opinion::succeeded("b", Decision::Allow, 0.8, ""),
            Opinion::fell_back("c", Decision::Remove, 0.6, ""),
        ]);
        let exam = examine(&ops, &ExaminationPolicy::default());

        assert_eq!(exam.majority_decision, Some(Decision::Allow));
        assert_eq!(
            exam.conflicts,
            vec![Conflict {
                specialist_id: "c".into(),
                decision: Decision::Remove
            }]
        );
        assert!(exam.is_conflicting(&"c".into()));
        assert_eq!(exam.tally.get(&Decision::Allow), Some(&2));
    }

    #[test]
    fn test_tie_prefers_more_restrictive() {
        let ops = set(vec![
            Opinion::succeeded("a", Decision::Allow, 0.9, ""),
            Opinion::succeeded("b", Decision::FlagForReview, 0.9, ""),
        ]);
        let exam = examine(&ops, &ExaminationPolicy::default());
        assert_eq!(exam.majority_decision, Some(Decision::FlagForReview));

        let ops = set(vec![
            Opinion::succeeded("a", Decision::Remove, 0.9, ""),
            Opinion::succeeded("b", Decision::FlagForReview, 0.9, ""),
            Opinion::succeeded("c", Decision::Allow, 0.9, ""),
        ]);
        let exam = examine(&ops, &ExaminationPolicy::default());
        assert_eq!(exam.majority_decision, Some(Decision::Remove));
    }

    #[test]
    fn test_failed_and_timed_out_excluded_from_vote() {
        let ops = set(vec![
            Opinion::succeeded("a", Decision::Allow, 0.9, ""),
            Opinion::failed("b", "boom"),
            Opinion::timed_out("c", "slow"),
        ]);
        let exam = examine(&ops, &ExaminationPolicy::default());

        assert_eq!(exam.majority_decision, Some(Decision::Allow));
        assert_eq!(exam.participant_count(), 1);
        assert_eq!(exam.non_participating.len(), 2);
        assert!(exam.conflicts.is_empty());
        assert!(!exam.low_confidence.contains(&SpecialistId::from("b")));
    }

    #[test]
    fn test_low_confidence_regardless_of_decision() {
        let ops = set(vec![
            Opinion::succeeded("a", Decision::Allow, 0.3, ""),
            Opinion::succeeded("b", Decision::Allow, 0.9, ""),
            Opinion::succeeded("c", Decision::Remove, 0.49, ""),
        ]);
        let exam = examine(&ops, &ExaminationPolicy::default());
        let low: Vec<&str> = exam.low_confidence.iter().map(|id| id.as_str()).collect();
        assert_eq!(low, vec!["a", "c"]);

        let strict = ExaminationPolicy::default().with_low_confidence_threshold(0.95);
        assert_eq!(examine(&ops, &strict).low_confidence.len(), 3);
    }

    #[test]
    fn test_nobody_participates() {
        let ops = set(vec![Opinion::timed_out("a", "slow")]);
        let exam = examine(&ops, &ExaminationPolicy::default());
        assert_eq!(exam.majority_decision, None);
        assert!(!exam.is_unanimous());
        assert!(exam.agreements.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let ops = set(vec![
            Opinion::succeeded("z", Decision::Remove, 0.7, ""),
            Opinion::succeeded("a", Decision::Allow, 0.7, ""),
        ]);
        let policy = ExaminationPolicy::default();
        assert_eq!(examine(&ops, &policy), examine(&ops, &policy));
    }
}
