//! Deliberation outcome - everything the coordinator hands back for one task.

use super::lifecycle::{DeliberationLifecycle, DeliberationStage};
use super::opinion::OpinionSet;
use super::task::DeliberationTask;
use crate::consensus::cross_exam::CrossExamination;
use crate::consensus::synthesis::ConsensusResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed deliberation: the task, its verdict and the full trail
/// that led there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationOutcome {
    pub task: DeliberationTask,
    pub result: ConsensusResult,
    /// Every registered specialist's opinion, participating or not
    pub opinions: OpinionSet,
    pub cross_examination: CrossExamination,
    pub lifecycle: DeliberationLifecycle,
}

impl DeliberationOutcome {
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle.entered_at(DeliberationStage::Complete)
    }

    pub fn participant_count(&self) -> usize {
        self.opinions.values().filter(|o| o.is_participating()).count()
    }
}
