//! Consensus synthesis - weighted aggregation of specialist opinions into
//! one auditable verdict.
//!
//! # Algorithm
//!
//! ```text
//! participants = opinions with status SUCCEEDED | FELL_BACK and weight > 0
//! W            = Σ weight(p)                          (renormalization base)
//! score(d)     = Σ weight(p) for p voting d, / W
//! confidence   = Σ weight(p) · confidence(p), / W
//! final        = unanimous decision            if no conflicts
//!              = argmax score(d), tie-break    otherwise
//! ```
//!
//! When `W == 0` (nobody answered, or only weight-0 specialists did) the
//! result degrades to FLAG_FOR_REVIEW with confidence 0.

use super::cross_exam::CrossExamination;
use super::weights::SpecialistWeights;
use crate::core::decision::Decision;
use crate::core::id::{SpecialistId, TaskId};
use crate::deliberation::opinion::{Opinion, OpinionSet};
use crate::deliberation::task::DeliberationTask;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

/// Phrase used in the reasoning whenever nobody could vote
pub const ALL_UNAVAILABLE: &str = "all specialists unavailable";

/// Scores closer than this are treated as tied
const SCORE_EPSILON: f64 = 1e-9;

/// Coarse quality label derived from aggregate confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliberationQuality {
    High,
    Medium,
    Low,
}

impl DeliberationQuality {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.8 {
            DeliberationQuality::High
        } else if confidence >= 0.5 {
            DeliberationQuality::Medium
        } else {
            DeliberationQuality::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliberationQuality::High => "high",
            DeliberationQuality::Medium => "medium",
            DeliberationQuality::Low => "low",
        }
    }
}

impl std::fmt::Display for DeliberationQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The final verdict of one deliberation.
///
/// Created once by [`synthesize`]; the coordinator only stamps
/// `processing_time` before handing it to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub task_id: TaskId,
    pub final_decision: Decision,
    /// Weighted average confidence of the participants
    pub confidence: f64,
    pub reasoning: String,
    pub individual_contributions: OpinionSet,
    pub agents_consulted: usize,
    pub consensus_reached: bool,
    /// Participants whose decision differs from the final one
    pub conflicts_resolved: usize,
    pub processing_time: Duration,
    /// Share of participating weight behind each decision
    pub decision_scores: BTreeMap<Decision, f64>,
    /// Participants' evidence, prefixed with the specialist id
    pub evidence: Vec<String>,
    pub deliberation_quality: DeliberationQuality,
}

impl ConsensusResult {
    pub fn with_processing_time(mut self, processing_time: Duration) -> Self {
        self.processing_time = processing_time;
        self
    }

    /// Specialists whose decision matched the final one
    pub fn supporters(&self) -> impl Iterator<Item = &Opinion> {
        self.individual_contributions
            .values()
            .filter(move |o| o.vote() == Some(self.final_decision))
    }

    /// Specialists whose decision differed from the final one
    pub fn dissenters(&self) -> impl Iterator<Item = &Opinion> {
        self.individual_contributions
            .values()
            .filter(move |o| matches!(o.vote(), Some(d) if d != self.final_decision))
    }
}

/// A participant with its resolved weight
struct Weighted<'a> {
    opinion: &'a Opinion,
    weight: f64,
}

/// Synthesize one verdict from the opinions and their cross-examination.
///
/// Pure: the same inputs always produce a bit-identical result, including
/// the reasoning text. `processing_time` is left at zero.
pub fn synthesize(
    task: &DeliberationTask,
    opinions: &OpinionSet,
    cross_exam: &CrossExamination,
    weights: &SpecialistWeights,
) -> ConsensusResult {
    let consulted = opinions.len();

    let mut ranked: Vec<Weighted<'_>> = opinions
        .values()
        .map(|opinion| Weighted {
            opinion,
            weight: weights.effective(&opinion.specialist_id, consulted),
        })
        .collect();
    // Weight-descending, then id for a stable order
    ranked.sort_by(|a, b| {
        b.weight
            .total_cmp(&a.weight)
            .then_with(|| a.opinion.specialist_id.cmp(&b.opinion.specialist_id))
    });

    let voters: Vec<&Weighted<'_>> = ranked
        .iter()
        .filter(|w| w.weight > 0.0 && w.opinion.vote().is_some())
        .collect();
    let total_weight: f64 = voters.iter().map(|w| w.weight).sum();

    if voters.is_empty() || total_weight <= 0.0 {
        return unavailable(task, opinions, &ranked);
    }

    let mut scores: BTreeMap<Decision, f64> = Decision::ALL.iter().map(|d| (*d, 0.0)).collect();
    let mut weighted_confidence = 0.0;
    for voter in &voters {
        if let Some(decision) = voter.opinion.vote() {
            *scores.entry(decision).or_insert(0.0) += voter.weight;
        }
        weighted_confidence += voter.weight * voter.opinion.confidence;
    }
    for score in scores.values_mut() {
        *score /= total_weight;
    }
    let confidence = (weighted_confidence / total_weight).clamp(0.0, 1.0);

    let unanimous = cross_exam.conflicts.is_empty();
    let weighted_winner = scores
        .iter()
        .filter(|(_, score)| **score > 0.0)
        .map(|(decision, score)| (*decision, *score))
        .reduce(|best, candidate| {
            let tied = (candidate.1 - best.1).abs() <= SCORE_EPSILON;
            if (!tied && candidate.1 > best.1)
                || (tied && cross_exam.tie_break.prefer(best.0, candidate.0) == candidate.0)
            {
                candidate
            } else {
                best
            }
        })
        .map(|(decision, _)| decision);

    let final_decision = match (unanimous, cross_exam.majority_decision, weighted_winner) {
        (true, Some(majority), _) => majority,
        (_, _, Some(winner)) => winner,
        // Unreachable with at least one voter; keep the safe default anyway
        _ => Decision::FlagForReview,
    };

    let conflicts_resolved = opinions
        .values()
        .filter(|o| matches!(o.vote(), Some(d) if d != final_decision))
        .count();

    let evidence = ranked
        .iter()
        .filter(|w| w.opinion.vote().is_some())
        .flat_map(|w| {
            w.opinion
                .evidence
                .iter()
                .map(move |item| format!("{}: {}", w.opinion.specialist_id, item))
        })
        .collect();

    let reasoning = compose_reasoning(
        final_decision,
        confidence,
        unanimous,
        &scores,
        &ranked,
        cross_exam,
        conflicts_resolved,
    );

    ConsensusResult {
        task_id: task.task_id().clone(),
        final_decision,
        confidence,
        reasoning,
        individual_contributions: opinions.clone(),
        agents_consulted: consulted,
        consensus_reached: unanimous,
        conflicts_resolved,
        processing_time: Duration::ZERO,
        decision_scores: scores,
        evidence,
        deliberation_quality: DeliberationQuality::from_confidence(confidence),
    }
}

/// Degraded verdict when no specialist can vote
fn unavailable(
    task: &DeliberationTask,
    opinions: &OpinionSet,
    ranked: &[Weighted<'_>],
) -> ConsensusResult {
    let mut reasoning = format!(
        "Final decision: {} (confidence 0.00). Outcome: {}; deferring to human review.",
        Decision::FlagForReview,
        ALL_UNAVAILABLE
    );

    let answered_without_weight: Vec<&Weighted<'_>> =
        ranked.iter().filter(|w| w.opinion.vote().is_some()).collect();
    if !answered_without_weight.is_empty() {
        reasoning.push_str(" Specialists that answered carry no voting weight:");
        for w in &answered_without_weight {
            push_line(&mut reasoning, w);
        }
    }

    let silent: Vec<&Weighted<'_>> =
        ranked.iter().filter(|w| w.opinion.vote().is_none()).collect();
    if !silent.is_empty() {
        reasoning.push_str("\nDid not participate:");
        for w in &silent {
            let _ = write!(
                reasoning,
                "\n- {} ({}): {}",
                w.opinion.specialist_id, w.opinion.status, w.opinion.rationale
            );
        }
    }

    ConsensusResult {
        task_id: task.task_id().clone(),
        final_decision: Decision::FlagForReview,
        confidence: 0.0,
        reasoning,
        individual_contributions: opinions.clone(),
        agents_consulted: opinions.len(),
        consensus_reached: false,
        conflicts_resolved: 0,
        processing_time: Duration::ZERO,
        decision_scores: Decision::ALL.iter().map(|d| (*d, 0.0)).collect(),
        evidence: Vec::new(),
        deliberation_quality: DeliberationQuality::Low,
    }
}

fn compose_reasoning(
    final_decision: Decision,
    confidence: f64,
    unanimous: bool,
    scores: &BTreeMap<Decision, f64>,
    ranked: &[Weighted<'_>],
    cross_exam: &CrossExamination,
    conflicts_resolved: usize,
) -> String {
    let mut out = format!(
        "Final decision: {} (confidence {:.2}).",
        final_decision, confidence
    );

    let participants = cross_exam.participant_count();
    if unanimous {
        let _ = write!(
            out,
            " Unanimous: all {} participating specialist{} agreed on {}.",
            participants,
            if participants == 1 { "" } else { "s" },
            final_decision
        );
    } else {
        let breakdown: Vec<String> = Decision::ALL
            .iter()
            .filter_map(|d| {
                let score = scores.get(d).copied().unwrap_or(0.0);
                (score > 0.0).then(|| format!("{} {:.2}", d, score))
            })
            .collect();
        let _ = write!(
            out,
            " Resolved by weighting: specialists disagreed and the weighted vote ({}) favoured {}; {} dissenting opinion{} outweighed.",
            breakdown.join(", "),
            final_decision,
            conflicts_resolved,
            if conflicts_resolved == 1 { " was" } else { "s were" }
        );
    }

    let agreed: Vec<&Weighted<'_>> = ranked
        .iter()
        .filter(|w| w.opinion.vote() == Some(final_decision))
        .collect();
    let disagreed: Vec<&Weighted<'_>> = ranked
        .iter()
        .filter(|w| matches!(w.opinion.vote(), Some(d) if d != final_decision))
        .collect();
    let silent: Vec<&Weighted<'_>> = ranked
        .iter()
        .filter(|w| w.opinion.vote().is_none())
        .collect();

    if !agreed.is_empty() {
        out.push_str("\nAgreed:");
        for w in &agreed {
            push_line(&mut out, w);
        }
    }

    if !disagreed.is_empty() {
        out.push_str("\nDisagreed:");
        for w in &disagreed {
            push_line(&mut out, w);
        }
    }

    if !silent.is_empty() {
        out.push_str("\nDid not participate:");
        for w in &silent {
            let _ = write!(
                out,
                "\n- {} ({}): {}",
                w.opinion.specialist_id, w.opinion.status, w.opinion.rationale
            );
        }
    }

    if !cross_exam.low_confidence.is_empty() {
        let ids: Vec<&str> = cross_exam
            .low_confidence
            .iter()
            .map(SpecialistId::as_str)
            .collect();
        let _ = write!(out, "\nLow confidence: {}.", ids.join(", "));
    }

    out
}

fn push_line(out: &mut String, w: &Weighted<'_>) {
    let decision = w
        .opinion
        .decision
        .map(|d| d.as_str())
        .unwrap_or("NONE");
    let _ = write!(
        out,
        "\n- {} (weight {:.2}, {}, confidence {:.2}{}): {}",
        w.opinion.specialist_id,
        w.weight,
        decision,
        w.opinion.confidence,
        if w.opinion.status == crate::deliberation::opinion::OpinionStatus::FellBack {
            ", fallback"
        } else {
            ""
        },
        w.opinion.rationale
    );
}
