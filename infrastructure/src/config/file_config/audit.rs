//! Audit configuration from TOML (`[audit]` section)

use serde::{Deserialize, Serialize};

/// Raw audit configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAuditConfig {
    /// Write audit records at all
    pub enabled: bool,
    /// JSONL file receiving one record per completed deliberation
    pub path: String,
    /// Delivery attempts per record
    pub retry_budget: u32,
    /// Base delay between attempts, in milliseconds
    pub retry_backoff_ms: u64,
}

impl Default for FileAuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "council-audit.jsonl".to_string(),
            retry_budget: 3,
            retry_backoff_ms: 200,
        }
    }
}
