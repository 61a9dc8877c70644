//! Deliberation history port
//!
//! Append-only record of completed deliberations, keyed by task id.

use async_trait::async_trait;
use council_domain::{DeliberationOutcome, TaskId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    #[error("Task {0} is already recorded")]
    Duplicate(TaskId),

    #[error("History store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DeliberationHistory: Send + Sync {
    /// Record a completed deliberation. Existing entries are never replaced.
    async fn append(&self, outcome: DeliberationOutcome) -> Result<(), HistoryError>;

    async fn get(&self, task_id: &TaskId) -> Option<DeliberationOutcome>;

    /// All recorded deliberations, oldest submission first
    async fn list(&self) -> Vec<DeliberationOutcome>;
}

/// History that remembers nothing
pub struct NoHistory;

#[async_trait]
impl DeliberationHistory for NoHistory {
    async fn append(&self, _outcome: DeliberationOutcome) -> Result<(), HistoryError> {
        Ok(())
    }

    async fn get(&self, _task_id: &TaskId) -> Option<DeliberationOutcome> {
        None
    }

    async fn list(&self) -> Vec<DeliberationOutcome> {
        Vec::new()
    }
}
