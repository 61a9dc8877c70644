//! In-memory deliberation history.

use async_trait::async_trait;
use council_application::ports::history::{DeliberationHistory, HistoryError};
use council_domain::{DeliberationOutcome, TaskId};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local, append-only history keyed by task id
#[derive(Default)]
pub struct InMemoryHistory {
    entries: RwLock<HashMap<TaskId, DeliberationOutcome>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl DeliberationHistory for InMemoryHistory {
    async fn append(&self, outcome: DeliberationOutcome) -> Result<(), HistoryError> {
        let task_id = outcome.task.task_id().clone();
        let mut entries = self.entries.write().await;
        if entries.contains_key(&task_id) {
            return Err(HistoryError::Duplicate(task_id));
        }
        entries.insert(task_id, outcome);
        Ok(())
    }

    async fn get(&self, task_id: &TaskId) -> Option<DeliberationOutcome> {
        self.entries.read().await.get(task_id).cloned()
    }

    async fn list(&self) -> Vec<DeliberationOutcome> {
        let mut outcomes: Vec<DeliberationOutcome> =
            self.entries.read().await.values().cloned().collect();
        outcomes.sort_by(|a, b| {
            a.task
                .submitted_at()
                .cmp(&b.task.submitted_at())
                .then_with(|| a.task.task_id().cmp(b.task.task_id()))
        });
        outcomes
    }
}
