//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.

use council_domain::{DeliberationStage, Opinion, TaskId};

/// Callback for progress updates during a deliberation
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, log lines, etc.)
pub trait ProgressNotifier: Send + Sync {
    /// Called when the task enters a lifecycle stage
    fn on_stage(&self, _task_id: &TaskId, _stage: DeliberationStage) {}

    /// Called when dispatch starts
    fn on_dispatch_start(&self, total_specialists: usize);

    /// Called when one specialist reaches a terminal state
    fn on_specialist_complete(&self, opinion: &Opinion);

    /// Called when every specialist has been resolved
    fn on_dispatch_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_dispatch_start(&self, _total_specialists: usize) {}
    fn on_specialist_complete(&self, _opinion: &Opinion) {}
    fn on_dispatch_complete(&self) {}
}
