//! Deliberate use case
//!
//! Orchestrates one full deliberation:
//!
//! ```text
//! CREATED ──dispatch──▶ DISPATCHED ──examine──▶ EXAMINED ──synthesize──▶ SYNTHESIZED ──▶ COMPLETE
//!    │                                                                                     │
//!    └── input validated, registry snapshotted                      audit + history ◀─────┘
//! ```
//!
//! Specialist failures never abort a deliberation; they surface as
//! non-participating opinions. The only outward errors are invalid input
//! (rejected before DISPATCHED) and cancellation.

use crate::config::DeliberationParams;
use crate::ports::audit_sink::{AuditSink, NoAuditSink};
use crate::ports::history::{DeliberationHistory, NoHistory};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::registry::{RegistrySnapshot, SpecialistRegistry};
use crate::use_cases::dispatch::Dispatcher;
use council_domain::{
    AuditRecord, DeliberationLifecycle, DeliberationOutcome, DeliberationStage, DeliberationTask,
    DomainError, ModerationContext, TaskId, examine, synthesize,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// Errors that can occur during a deliberation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeliberateError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DomainError),

    #[error("Deliberation cancelled")]
    Cancelled,
}

impl DeliberateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeliberateError::Cancelled)
    }
}

/// A validated task bound to the council snapshot it will run against
#[derive(Debug)]
pub struct PreparedDeliberation {
    task: Arc<DeliberationTask>,
    snapshot: Arc<RegistrySnapshot>,
    lifecycle: DeliberationLifecycle,
}

impl PreparedDeliberation {
    pub fn task(&self) -> &DeliberationTask {
        &self.task
    }

    pub fn task_id(&self) -> &TaskId {
        self.task.task_id()
    }

    pub fn snapshot(&self) -> &RegistrySnapshot {
        &self.snapshot
    }
}

/// Use case for running a council deliberation
#[derive(Clone)]
pub struct DeliberateUseCase {
    registry: Arc<SpecialistRegistry>,
    params: DeliberationParams,
    audit_sink: Arc<dyn AuditSink>,
    history: Arc<dyn DeliberationHistory>,
    progress: Arc<dyn ProgressNotifier>,
    /// In-flight audit deliveries
    audit_tasks: TaskTracker,
}

impl DeliberateUseCase {
    pub fn new(registry: Arc<SpecialistRegistry>, params: DeliberationParams) -> Self {
        Self {
            registry,
            params,
            audit_sink: Arc::new(NoAuditSink),
            history: Arc::new(NoHistory),
            progress: Arc::new(NoProgress),
            audit_tasks: TaskTracker::new(),
        }
    }

    pub fn with_audit_sink(mut self, audit_sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = audit_sink;
        self
    }

    pub fn with_history(mut self, history: Arc<dyn DeliberationHistory>) -> Self {
        self.history = history;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn params(&self) -> &DeliberationParams {
        &self.params
    }

    pub fn registry(&self) -> &Arc<SpecialistRegistry> {
        &self.registry
    }

    pub fn history(&self) -> &Arc<dyn DeliberationHistory> {
        &self.history
    }

    /// Wait until every audit record handed off so far is delivered or given up on.
    ///
    /// Short-lived callers (a CLI run) use this before exiting.
    pub async fn flush_audit(&self) {
        self.audit_tasks.close();
        self.audit_tasks.wait().await;
        self.audit_tasks.reopen();
    }

    /// Run a deliberation to completion
    pub async fn deliberate(
        &self,
        content: impl Into<String>,
        context: ModerationContext,
    ) -> Result<DeliberationOutcome, DeliberateError> {
        let prepared = self.prepare(TaskId::generate(), content, context)?;
        self.run(prepared, None).await
    }

    /// Run a deliberation that stops when `token` is cancelled
    pub async fn deliberate_with_cancellation(
        &self,
        content: impl Into<String>,
        context: ModerationContext,
        token: CancellationToken,
    ) -> Result<DeliberationOutcome, DeliberateError> {
        let prepared = self.prepare(TaskId::generate(), content, context)?;
        self.run(prepared, Some(token)).await
    }

    /// CREATED: validate the input and freeze the council for this task
    pub fn prepare(
        &self,
        task_id: TaskId,
        content: impl Into<String>,
        context: ModerationContext,
    ) -> Result<PreparedDeliberation, DeliberateError> {
        let task = DeliberationTask::create_with_id(
            task_id,
            content,
            context,
            self.params.max_content_length,
        )?;

        let snapshot = self.registry.snapshot();
        if snapshot.is_empty() {
            return Err(DomainError::NoSpecialists.into());
        }

        let lifecycle = DeliberationLifecycle::new();
        self.progress.on_stage(task.task_id(), DeliberationStage::Created);
        debug!(
            task_id = %task.task_id(),
            specialists = snapshot.len(),
            "Created deliberation for \"{}\"",
            task.preview(60)
        );

        Ok(PreparedDeliberation {
            task: Arc::new(task),
            snapshot,
            lifecycle,
        })
    }

    /// DISPATCHED → COMPLETE for a prepared task
    pub async fn run(
        &self,
        prepared: PreparedDeliberation,
        cancellation: Option<CancellationToken>,
    ) -> Result<DeliberationOutcome, DeliberateError> {
        let PreparedDeliberation {
            task,
            snapshot,
            mut lifecycle,
        } = prepared;
        let task_id = task.task_id().clone();

        info!(
            task_id = %task_id,
            "Starting deliberation with {} specialists",
            snapshot.len()
        );

        // Phase 1: Dispatch
        let started = Instant::now();
        self.enter(&mut lifecycle, &task_id, DeliberationStage::Dispatched);

        let mut dispatcher = Dispatcher::new(self.params.specialist_timeout)
            .with_deliberation_timeout(self.params.deliberation_timeout)
            .with_progress(Arc::clone(&self.progress));
        if let Some(token) = &cancellation {
            dispatcher = dispatcher.with_cancellation(token.clone());
        }

        let opinions = match dispatcher.dispatch(&task, snapshot.specialists()).await {
            Ok(opinions) => opinions,
            Err(_) => {
                info!(task_id = %task_id, "Deliberation cancelled");
                return Err(DeliberateError::Cancelled);
            }
        };

        // Phase 2: Cross-examination
        let cross_examination = examine(&opinions, &self.params.examination_policy());
        self.enter(&mut lifecycle, &task_id, DeliberationStage::Examined);
        debug!(
            task_id = %task_id,
            agreements = cross_examination.agreements.len(),
            conflicts = cross_examination.conflicts.len(),
            low_confidence = cross_examination.low_confidence.len(),
            "Cross-examination complete"
        );

        // Phase 3: Synthesis
        let result = synthesize(&task, &opinions, &cross_examination, snapshot.weights())
            .with_processing_time(started.elapsed());
        self.enter(&mut lifecycle, &task_id, DeliberationStage::Synthesized);

        // Last point a cancellation can take effect; past here the result is
        // audited and recorded
        if cancellation.as_ref().is_some_and(CancellationToken::is_cancelled) {
            info!(task_id = %task_id, "Deliberation cancelled after synthesis");
            return Err(DeliberateError::Cancelled);
        }

        self.enter(&mut lifecycle, &task_id, DeliberationStage::Complete);
        info!(
            task_id = %task_id,
            decision = %result.final_decision,
            confidence = %format_args!("{:.2}", result.confidence),
            consensus = result.consensus_reached,
            "Deliberation complete in {}ms",
            result.processing_time.as_millis()
        );

        let outcome = DeliberationOutcome {
            task: Arc::unwrap_or_clone(task),
            result,
            opinions,
            cross_examination,
            lifecycle,
        };

        self.emit_audit(AuditRecord::from_outcome(&outcome));
        if let Err(e) = self.history.append(outcome.clone()).await {
            warn!(task_id = %task_id, "Failed to record history: {}", e);
        }

        Ok(outcome)
    }

    fn enter(&self, lifecycle: &mut DeliberationLifecycle, task_id: &TaskId, stage: DeliberationStage) {
        match lifecycle.advance(stage) {
            Ok(()) => self.progress.on_stage(task_id, stage),
            Err(e) => warn!(task_id = %task_id, "{}", e),
        }
    }

    /// Hand the record to the audit sink without waiting for it.
    ///
    /// Up to `audit_retry_budget` attempts with linear backoff; the final
    /// failure is only logged.
    fn emit_audit(&self, record: AuditRecord) {
        let sink = Arc::clone(&self.audit_sink);
        let attempts = self.params.audit_retry_budget.max(1);
        let backoff = self.params.audit_retry_backoff;

        self.audit_tasks.spawn(async move {
            for attempt in 1..=attempts {
                match sink.emit(&record).await {
                    Ok(()) => {
                        debug!(task_id = %record.task_id, attempt, "Audit record emitted");
                        return;
                    }
                    Err(e) if attempt < attempts => {
                        debug!(
                            task_id = %record.task_id,
                            attempt,
                            "Audit emission failed, retrying: {}",
                            e
                        );
                        tokio::time::sleep(retry_delay(backoff, attempt)).await;
                    }
                    Err(e) => {
                        warn!(
                            task_id = %record.task_id,
                            "Audit emission failed after {} attempts: {}",
                            attempts,
                            e
                        );
                    }
                }
            }
        });
    }
}

impl std::fmt::Debug for DeliberateUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliberateUseCase")
            .field("specialists", &self.registry.len())
            .field("params", &self.params)
            .finish()
    }
}

/// Linear backoff before the retry following `attempt`, saturating instead
/// of overflowing for large configured values
fn retry_delay(backoff: Duration, attempt: u32) -> Duration {
    backoff.saturating_mul(attempt)
}

/// Convenience for callers that only need the stage durations
pub fn stage_duration(
    lifecycle: &DeliberationLifecycle,
    from: DeliberationStage,
    to: DeliberationStage,
) -> Option<Duration> {
    let start = lifecycle.entered_at(from)?;
    let end = lifecycle.entered_at(to)?;
    (end - start).to_std().ok()
}
