//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; [`FileConfig::validate`] reports every
//! problem at once before the values are turned into application types.

mod audit;
mod deliberation;
mod output;
mod specialists;

pub use audit::FileAuditConfig;
pub use deliberation::FileDeliberationConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use specialists::FileSpecialistConfig;

use crate::specialists::reference_council;
use council_application::DeliberationParams;
use council_application::ports::specialist::Specialist;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("deliberation.{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("deliberation.low_confidence_threshold must be within [0, 1], got {0}")]
    ThresholdOutOfRange(f64),

    #[error("deliberation.max_content_length cannot be 0")]
    ZeroContentLength,

    #[error("deliberation.tie_break: {0}")]
    InvalidTieBreak(String),

    #[error("specialist id cannot be empty")]
    EmptySpecialistId,

    #[error("duplicate specialist id '{0}'")]
    DuplicateSpecialistId(String),

    #[error("specialist '{id}' has invalid weight {weight}")]
    InvalidWeight { id: String, weight: f64 },

    #[error("specialist '{id}': {message}")]
    UnknownFramework { id: String, message: String },

    #[error("every configured specialist is disabled")]
    NoEnabledSpecialists,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Timeouts, limits and cross-examination settings
    pub deliberation: FileDeliberationConfig,
    /// Audit trail settings
    pub audit: FileAuditConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Council members; empty means the reference council
    pub specialists: Vec<FileSpecialistConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        // 1. Deliberation limits
        let deliberation = &self.deliberation;
        if deliberation.specialist_timeout_ms == 0 {
            issues.push(ConfigValidationError::ZeroTimeout("specialist_timeout_ms"));
        }
        if deliberation.deliberation_timeout_ms == Some(0) {
            issues.push(ConfigValidationError::ZeroTimeout("deliberation_timeout_ms"));
        }
        let threshold = deliberation.low_confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            issues.push(ConfigValidationError::ThresholdOutOfRange(threshold));
        }
        if deliberation.max_content_length == 0 {
            issues.push(ConfigValidationError::ZeroContentLength);
        }
        if let Err(message) = deliberation.parse_tie_break() {
            issues.push(ConfigValidationError::InvalidTieBreak(message));
        }

        // 2. Specialists
        let mut seen = HashSet::new();
        for entry in &self.specialists {
            if entry.id.trim().is_empty() {
                issues.push(ConfigValidationError::EmptySpecialistId);
            } else if !seen.insert(entry.id.as_str()) {
                issues.push(ConfigValidationError::DuplicateSpecialistId(entry.id.clone()));
            }
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                issues.push(ConfigValidationError::InvalidWeight {
                    id: entry.id.clone(),
                    weight: entry.weight,
                });
            }
            if let Err(message) = entry.parse_framework() {
                issues.push(ConfigValidationError::UnknownFramework {
                    id: entry.id.clone(),
                    message,
                });
            }
        }
        if !self.specialists.is_empty() && self.specialists.iter().all(|s| !s.enabled) {
            issues.push(ConfigValidationError::NoEnabledSpecialists);
        }

        issues
    }

    /// Application parameters for these settings.
    ///
    /// Call after [`validate`](Self::validate); an unparsable tie-break
    /// order falls back to the default.
    pub fn to_params(&self) -> DeliberationParams {
        let deliberation = &self.deliberation;
        DeliberationParams::default()
            .with_specialist_timeout(Duration::from_millis(deliberation.specialist_timeout_ms))
            .with_deliberation_timeout(
                deliberation
                    .deliberation_timeout_ms
                    .map(Duration::from_millis),
            )
            .with_low_confidence_threshold(deliberation.low_confidence_threshold)
            .with_max_content_length(deliberation.max_content_length)
            .with_tie_break(deliberation.parse_tie_break().unwrap_or_default())
            .with_audit_retry(
                self.audit.retry_budget,
                Duration::from_millis(self.audit.retry_backoff_ms),
            )
    }

    /// The enabled council members, or the reference council when none are configured
    pub fn build_specialists(&self) -> Result<Vec<Arc<dyn Specialist>>, ConfigValidationError> {
        if self.specialists.is_empty() {
            return Ok(reference_council());
        }

        self.specialists
            .iter()
            .filter(|entry| entry.enabled)
            .map(|entry| {
                entry
                    .build()
                    .map_err(|message| ConfigValidationError::UnknownFramework {
                        id: entry.id.clone(),
                        message,
                    })
            })
            .collect()
    }
}
