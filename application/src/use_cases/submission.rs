//! Submission service
//!
//! Asynchronous front door to [`DeliberateUseCase`]: `submit` hands back a
//! task id immediately, the deliberation runs on its own tokio task, and
//! callers poll with `status`, block with `wait`, or stop it with `cancel`.
//! Finished tasks stay queryable until released with `forget`.
//!
//! Each submission owns a [`CancellationToken`], so cancelling one task
//! never touches any other.

use crate::use_cases::deliberate::{DeliberateError, DeliberateUseCase};
use council_domain::{DeliberationOutcome, ModerationContext, TaskId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Unknown task: {0}")]
    UnknownTask(TaskId),

    #[error("Task still pending: {0}")]
    StillPending(TaskId),
}

/// Externally visible state of a submitted task
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionStatus {
    Pending,
    Complete(Box<DeliberationOutcome>),
    Cancelled,
    /// Rejected during validation
    Failed(String),
}

impl SubmissionStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, SubmissionStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "PENDING",
            SubmissionStatus::Complete(_) => "COMPLETE",
            SubmissionStatus::Cancelled => "CANCELLED",
            SubmissionStatus::Failed(_) => "FAILED",
        }
    }
}

struct Submission {
    status: watch::Receiver<SubmissionStatus>,
    cancel: CancellationToken,
}

/// Tracks submitted deliberations by task id
#[derive(Clone)]
pub struct SubmissionService {
    use_case: Arc<DeliberateUseCase>,
    submissions: Arc<Mutex<HashMap<TaskId, Submission>>>,
}

impl SubmissionService {
    pub fn new(use_case: Arc<DeliberateUseCase>) -> Self {
        Self {
            use_case,
            submissions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Directly awaitable form, bypassing task tracking
    pub async fn deliberate(
        &self,
        content: impl Into<String>,
        context: ModerationContext,
    ) -> Result<DeliberationOutcome, DeliberateError> {
        self.use_case.deliberate(content, context).await
    }

    /// Submit content for deliberation and return its task id at once.
    ///
    /// Validation failures are not returned here; the task is recorded as
    /// FAILED with the validation message.
    pub fn submit(&self, content: impl Into<String>, context: ModerationContext) -> TaskId {
        let task_id = TaskId::generate();
        let cancel = CancellationToken::new();

        let status = match self.use_case.prepare(task_id.clone(), content, context) {
            Ok(prepared) => {
                let (tx, rx) = watch::channel(SubmissionStatus::Pending);
                let use_case = Arc::clone(&self.use_case);
                let token = cancel.clone();
                let id = task_id.clone();

                tokio::spawn(async move {
                    let status = match use_case.run(prepared, Some(token)).await {
                        Ok(outcome) => SubmissionStatus::Complete(Box::new(outcome)),
                        Err(DeliberateError::Cancelled) => SubmissionStatus::Cancelled,
                        Err(e) => SubmissionStatus::Failed(e.to_string()),
                    };
                    debug!(task_id = %id, status = status.as_str(), "Submission finished");
                    let _ = tx.send(status);
                });
                rx
            }
            Err(e) => {
                info!(task_id = %task_id, "Submission rejected: {}", e);
                // Rejected submissions never change; the sender can go
                let (_, rx) = watch::channel(SubmissionStatus::Failed(e.to_string()));
                rx
            }
        };

        self.lock().insert(
            task_id.clone(),
            Submission { status, cancel },
        );
        task_id
    }

    /// Current status without waiting
    pub fn status(&self, task_id: &TaskId) -> Result<SubmissionStatus, SubmissionError> {
        self.lock()
            .get(task_id)
            .map(|s| s.status.borrow().clone())
            .ok_or_else(|| SubmissionError::UnknownTask(task_id.clone()))
    }

    /// Wait until the task leaves PENDING
    pub async fn wait(&self, task_id: &TaskId) -> Result<SubmissionStatus, SubmissionError> {
        let mut rx = self
            .lock()
            .get(task_id)
            .map(|s| s.status.clone())
            .ok_or_else(|| SubmissionError::UnknownTask(task_id.clone()))?;

        let finished = rx
            .wait_for(SubmissionStatus::is_finished)
            .await
            .map(|status| status.clone());
        // If the sender is gone, the last value is final
        Ok(match finished {
            Ok(status) => status,
            Err(_) => rx.borrow().clone(),
        })
    }

    /// Request cancellation. Returns `true` if the task was still pending.
    ///
    /// A request that arrives after synthesis has no effect; the task
    /// then still finishes COMPLETE.
    pub fn cancel(&self, task_id: &TaskId) -> Result<bool, SubmissionError> {
        let submissions = self.lock();
        let submission = submissions
            .get(task_id)
            .ok_or_else(|| SubmissionError::UnknownTask(task_id.clone()))?;

        let pending = !submission.status.borrow().is_finished();
        if pending {
            info!(task_id = %task_id, "Cancelling deliberation");
            submission.cancel.cancel();
        }
        Ok(pending)
    }

    /// Drop a finished task and hand back its final status.
    ///
    /// Pending tasks are kept; cancel and wait for them first.
    pub fn forget(&self, task_id: &TaskId) -> Result<SubmissionStatus, SubmissionError> {
        let mut submissions = self.lock();
        let status = submissions
            .get(task_id)
            .map(|s| s.status.borrow().clone())
            .ok_or_else(|| SubmissionError::UnknownTask(task_id.clone()))?;
        if !status.is_finished() {
            return Err(SubmissionError::StillPending(task_id.clone()));
        }
        submissions.remove(task_id);
        debug!(task_id = %task_id, "Submission forgotten");
        Ok(status)
    }

    /// Task ids known to this service
    pub fn task_ids(&self) -> Vec<TaskId> {
        let mut ids: Vec<TaskId> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<TaskId, Submission>> {
        self.submissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(SubmissionStatus::Pending.as_str(), "PENDING");
        assert_eq!(SubmissionStatus::Cancelled.as_str(), "CANCELLED");
        assert!(!SubmissionStatus::Pending.is_finished());
        assert!(SubmissionStatus::Failed("x".into()).is_finished());
    }

    #[test]
    fn test_submission_error_display() {
        let error = SubmissionError::UnknownTask(TaskId::new("abc"));
        assert_eq!(error.to_string(), "Unknown task: abc");
        let error = SubmissionError::StillPending(TaskId::new("abc"));
        assert_eq!(error.to_string(), "Task still pending: abc");
    }
}
