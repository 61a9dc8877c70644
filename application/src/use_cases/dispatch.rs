//! Dispatch phase
//!
//! Fans one task out to every specialist concurrently and collects exactly
//! one [`Opinion`] per specialist, whatever happens to the individual calls.
//!
//! Each specialist runs on its own [`JoinSet`] task and is driven through an
//! [`Invocation`] state machine:
//!
//! - primary `evaluate` under the per-specialist timeout
//! - on error or panic, the synchronous `fallback_evaluate`
//! - on timeout, no fallback (the specialist is recorded TIMED_OUT)
//!
//! The collection loop additionally watches an optional global deadline and
//! a [`CancellationToken`].

use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::specialist::Specialist;
use council_domain::{DeliberationTask, Invocation, Opinion, OpinionSet, SpecialistId};
use futures::FutureExt;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Dispatch was cancelled; no opinions are returned
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Dispatch cancelled")]
pub struct DispatchCancelled;

/// Concurrent specialist dispatcher
pub struct Dispatcher {
    specialist_timeout: Duration,
    deliberation_timeout: Option<Duration>,
    cancellation_token: Option<CancellationToken>,
    progress: Arc<dyn ProgressNotifier>,
}

impl Dispatcher {
    pub fn new(specialist_timeout: Duration) -> Self {
        Self {
            specialist_timeout,
            deliberation_timeout: None,
            cancellation_token: None,
            progress: Arc::new(NoProgress),
        }
    }

    /// Bound the whole dispatch phase; still-pending specialists are
    /// recorded TIMED_OUT when it elapses
    pub fn with_deliberation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.deliberation_timeout = timeout;
        self
    }

    /// Set a cancellation token for interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    /// Dispatch `task` to every specialist.
    ///
    /// The returned set has exactly one entry per specialist. The only
    /// error is cancellation, in which case every in-flight call is
    /// aborted and no fallback runs.
    pub async fn dispatch(
        &self,
        task: &Arc<DeliberationTask>,
        specialists: &[Arc<dyn Specialist>],
    ) -> Result<OpinionSet, DispatchCancelled> {
        info!(
            task_id = %task.task_id(),
            "Dispatching to {} specialists",
            specialists.len()
        );
        self.progress.on_dispatch_start(specialists.len());

        let mut join_set = JoinSet::new();
        let mut pending: BTreeMap<SpecialistId, String> = BTreeMap::new();

        for specialist in specialists {
            let specialist = Arc::clone(specialist);
            let task = Arc::clone(task);
            let timeout = self.specialist_timeout;
            pending.insert(specialist.id().clone(), specialist.framework().to_string());

            join_set.spawn(async move { Self::invoke(specialist, task, timeout).await });
        }

        // A deadline too far out to represent is no deadline at all
        let deadline = self
            .deliberation_timeout
            .and_then(|d| Instant::now().checked_add(d));
        let mut opinions = OpinionSet::new();

        loop {
            let joined = tokio::select! {
                biased;
                _ = cancelled(self.cancellation_token.as_ref()) => {
                    join_set.abort_all();
                    warn!(
                        task_id = %task.task_id(),
                        "Dispatch cancelled with {} specialists pending",
                        pending.len()
                    );
                    self.progress.on_dispatch_complete();
                    return Err(DispatchCancelled);
                }
                _ = expired(deadline) => {
                    join_set.abort_all();
                    warn!(
                        task_id = %task.task_id(),
                        "Deliberation timeout reached with {} specialists pending",
                        pending.len()
                    );
                    let reason = format!(
                        "deliberation timeout of {}ms elapsed",
                        self.deliberation_timeout.unwrap_or_default().as_millis()
                    );
                    for (id, framework) in std::mem::take(&mut pending) {
                        let mut invocation = Invocation::new(id.clone(), framework);
                        invocation.timed_out(reason.clone());
                        self.record(&mut opinions, invocation.into_opinion());
                    }
                    break;
                }
                joined = join_set.join_next() => joined,
            };

            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok(opinion) => {
                    pending.remove(&opinion.specialist_id);
                    self.record(&mut opinions, opinion);
                }
                Err(e) => {
                    // The specialist is identified below from `pending`
                    warn!("Specialist task join error: {}", e);
                }
            }
        }

        // Only a panicking fallback can leave a task without a report
        for (id, framework) in pending {
            let mut invocation = Invocation::new(id.clone(), framework);
            invocation.abort("specialist task terminated abnormally");
            self.record(&mut opinions, invocation.into_opinion());
        }

        self.progress.on_dispatch_complete();
        Ok(opinions)
    }

    /// Drive one specialist from PENDING to a terminal opinion
    async fn invoke(
        specialist: Arc<dyn Specialist>,
        task: Arc<DeliberationTask>,
        timeout: Duration,
    ) -> Opinion {
        let id = specialist.id().clone();
        let mut invocation = Invocation::new(id.clone(), specialist.framework());

        let primary = AssertUnwindSafe(specialist.evaluate(task.content(), task.context(), timeout))
            .catch_unwind();

        match tokio::time::timeout(timeout, primary).await {
            Ok(Ok(Ok(opinion))) => invocation.primary_returned(opinion),
            Ok(Ok(Err(e))) => {
                debug!(specialist = %id, "Primary evaluation failed: {}", e);
                invocation.primary_failed(e.to_string());
            }
            Ok(Err(payload)) => {
                let message = panic_message(&*payload);
                warn!(specialist = %id, "Primary evaluation panicked: {}", message);
                invocation.primary_failed(format!("evaluation panicked: {}", message));
            }
            Err(_) => {
                debug!(specialist = %id, "Timed out after {}ms", timeout.as_millis());
                invocation.timed_out(format!("no answer within {}ms", timeout.as_millis()));
            }
        }

        if invocation.needs_fallback() {
            match specialist.fallback_evaluate(task.content(), task.context()) {
                Ok(opinion) => invocation.fallback_returned(opinion),
                Err(e) => invocation.fallback_failed(e.to_string()),
            }
        }

        invocation.into_opinion()
    }

    fn record(&self, opinions: &mut OpinionSet, opinion: Opinion) {
        if opinion.is_participating() {
            info!(
                specialist = %opinion.specialist_id,
                status = %opinion.status,
                "Specialist answered"
            );
        } else {
            warn!(
                specialist = %opinion.specialist_id,
                status = %opinion.status,
                "Specialist unavailable: {}",
                opinion.rationale
            );
        }
        self.progress.on_specialist_complete(&opinion);
        opinions.insert(opinion.specialist_id.clone(), opinion);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}

async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
