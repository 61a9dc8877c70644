//! Specialist port
//!
//! Defines the contract every ethical-perspective reasoner satisfies.
//! How a specialist reaches its opinion (remote model, local heuristic,
//! keyword matcher) is an adapter concern.

use async_trait::async_trait;
use council_domain::{ModerationContext, Opinion, SpecialistId};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors a specialist can report instead of an opinion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpecialistError {
    #[error("Specialist unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Static description of a specialist: who it is and how much it counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialistProfile {
    pub id: SpecialistId,
    /// Ethical framework label (e.g. "Utilitarianism")
    pub framework: String,
    pub weight: f64,
}

impl SpecialistProfile {
    pub fn new(id: impl Into<SpecialistId>, framework: impl Into<String>, weight: f64) -> Self {
        Self {
            id: id.into(),
            framework: framework.into(),
            weight,
        }
    }
}

/// One independent reasoner on the council.
///
/// Implementations must not share mutable state across concurrent calls;
/// the dispatcher invokes every specialist of a task at the same time.
#[async_trait]
pub trait Specialist: Send + Sync {
    fn profile(&self) -> &SpecialistProfile;

    fn id(&self) -> &SpecialistId {
        &self.profile().id
    }

    fn framework(&self) -> &str {
        &self.profile().framework
    }

    fn weight(&self) -> f64 {
        self.profile().weight
    }

    /// Primary evaluation.
    ///
    /// `timeout` is advisory; the dispatcher enforces it regardless.
    async fn evaluate(
        &self,
        content: &str,
        context: &ModerationContext,
        timeout: Duration,
    ) -> Result<Opinion, SpecialistError>;

    /// Degraded local analysis used when [`evaluate`](Self::evaluate) fails.
    ///
    /// Must not block on I/O.
    fn fallback_evaluate(
        &self,
        content: &str,
        context: &ModerationContext,
    ) -> Result<Opinion, SpecialistError>;
}
