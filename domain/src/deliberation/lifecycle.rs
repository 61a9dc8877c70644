//! Deliberation lifecycle state machine.
//!
//! ```text
//! CREATED → DISPATCHED → EXAMINED → SYNTHESIZED → COMPLETE
//! ```
//!
//! Each transition moves exactly one step forward. Specialist failures do
//! not leave this path; only input validation stops a task, and it does so
//! before DISPATCHED.

use crate::core::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliberationStage {
    Created,
    Dispatched,
    Examined,
    Synthesized,
    Complete,
}

impl DeliberationStage {
    /// The only stage reachable from this one
    pub fn next(&self) -> Option<DeliberationStage> {
        match self {
            DeliberationStage::Created => Some(DeliberationStage::Dispatched),
            DeliberationStage::Dispatched => Some(DeliberationStage::Examined),
            DeliberationStage::Examined => Some(DeliberationStage::Synthesized),
            DeliberationStage::Synthesized => Some(DeliberationStage::Complete),
            DeliberationStage::Complete => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliberationStage::Created => "CREATED",
            DeliberationStage::Dispatched => "DISPATCHED",
            DeliberationStage::Examined => "EXAMINED",
            DeliberationStage::Synthesized => "SYNTHESIZED",
            DeliberationStage::Complete => "COMPLETE",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DeliberationStage::Created => "Created",
            DeliberationStage::Dispatched => "Dispatch",
            DeliberationStage::Examined => "Cross-Examination",
            DeliberationStage::Synthesized => "Synthesis",
            DeliberationStage::Complete => "Complete",
        }
    }
}

impl std::fmt::Display for DeliberationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A timestamped stage transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTransition {
    pub stage: DeliberationStage,
    pub at: DateTime<Utc>,
}

/// Tracks one task's progress through the lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationLifecycle {
    stage: DeliberationStage,
    history: Vec<StageTransition>,
}

impl DeliberationLifecycle {
    /// Start a lifecycle in CREATED
    pub fn new() -> Self {
        Self {
            stage: DeliberationStage::Created,
            history: vec![StageTransition {
                stage: DeliberationStage::Created,
                at: Utc::now(),
            }],
        }
    }

    pub fn stage(&self) -> DeliberationStage {
        self.stage
    }

    pub fn history(&self) -> &[StageTransition] {
        &self.history
    }

    /// Move to `to`, which must be the immediate successor of the current stage.
    pub fn advance(&mut self, to: DeliberationStage) -> Result<(), DomainError> {
        if self.stage.next() != Some(to) {
            return Err(DomainError::InvalidTransition {
                from: self.stage.to_string(),
                to: to.to_string(),
            });
        }
        self.stage = to;
        self.history.push(StageTransition { stage: to, at: Utc::now() });
        Ok(())
    }

    /// When the task entered `stage`, if it has
    pub fn entered_at(&self, stage: DeliberationStage) -> Option<DateTime<Utc>> {
        self.history.iter().find(|t| t.stage == stage).map(|t| t.at)
    }

    pub fn is_complete(&self) -> bool {
        self.stage == DeliberationStage::Complete
    }
}

impl Default for DeliberationLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_forward_path() {
        let mut lc = DeliberationLifecycle::new();
        assert_eq!(lc.stage(), DeliberationStage::Created);

        for stage in [
            DeliberationStage::Dispatched,
            DeliberationStage::Examined,
            DeliberationStage::Synthesized,
            DeliberationStage::Complete,
        ] {
            lc.advance(stage).unwrap();
        }

        assert!(lc.is_complete());
        assert_eq!(lc.history().len(), 5);
        assert!(lc.entered_at(DeliberationStage::Examined).is_some());
    }

    #[test]
    fn test_cannot_skip_stage() {
        let mut lc = DeliberationLifecycle::new();
        let err = lc.advance(DeliberationStage::Examined).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: "CREATED".into(),
                to: "EXAMINED".into()
            }
        );
        assert_eq!(lc.stage(), DeliberationStage::Created);
    }

    #[test]
    fn test_cannot_go_backwards_or_past_complete() {
        let mut lc = DeliberationLifecycle::new();
        lc.advance(DeliberationStage::Dispatched).unwrap();
        assert!(lc.advance(DeliberationStage::Created).is_err());
        assert!(lc.advance(DeliberationStage::Dispatched).is_err());
        assert_eq!(DeliberationStage::Complete.next(), None);
    }
}
