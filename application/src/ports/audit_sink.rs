//! Audit sink port
//!
//! Receives one immutable [`AuditRecord`] per completed deliberation.
//! Emission is fire-and-forget from the coordinator's point of view:
//! failures are retried locally, then logged, and never reach the caller.

use async_trait::async_trait;
use council_domain::AuditRecord;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Audit sink unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn emit(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// No-op sink for tests and when auditing is disabled
pub struct NoAuditSink;

#[async_trait]
impl AuditSink for NoAuditSink {
    async fn emit(&self, _record: &AuditRecord) -> Result<(), AuditError> {
        Ok(())
    }
}
