//! Audit record emitted once per completed deliberation.

use crate::consensus::synthesis::ConsensusResult;
use crate::core::id::TaskId;
use crate::deliberation::opinion::OpinionSet;
use crate::deliberation::outcome::DeliberationOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Immutable, self-contained trace of one deliberation.
///
/// The content itself is not stored; only its SHA-256 digest, so records
/// can be correlated with the source material without duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub task_id: TaskId,
    pub content_digest: String,
    pub submitted_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub result: ConsensusResult,
    pub opinions: OpinionSet,
}

impl AuditRecord {
    pub fn from_outcome(outcome: &DeliberationOutcome) -> Self {
        Self {
            task_id: outcome.task.task_id().clone(),
            content_digest: content_digest(outcome.task.content()),
            submitted_at: outcome.task.submitted_at(),
            completed_at: outcome.completed_at().unwrap_or_else(Utc::now),
            result: outcome.result.clone(),
            opinions: outcome.opinions.clone(),
        }
    }
}

/// Lower-case hex SHA-256 of `content`
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest: [u8; 32] = hasher.finalize().into();
    digest.iter().fold(String::with_capacity(64), |mut out, byte| {
        let _ = write!(out, "{:02x}", byte);
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_digest_is_stable_hex() {
        let digest = content_digest("hello");
        assert_eq!(
            digest,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(content_digest("hello"), digest);
        assert_ne!(content_digest("hello!"), digest);
    }
}
