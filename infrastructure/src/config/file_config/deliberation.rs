//! Deliberation configuration from TOML (`[deliberation]` section)

use council_domain::{
    DEFAULT_LOW_CONFIDENCE_THRESHOLD, DEFAULT_MAX_CONTENT_LENGTH, Decision, TieBreakOrder,
};
use serde::{Deserialize, Serialize};

/// Raw deliberation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDeliberationConfig {
    /// Per-specialist timeout in milliseconds
    pub specialist_timeout_ms: u64,
    /// Bound on the whole dispatch phase, in milliseconds
    pub deliberation_timeout_ms: Option<u64>,
    /// Opinions below this confidence are flagged
    pub low_confidence_threshold: f64,
    /// Maximum content length in characters
    pub max_content_length: usize,
    /// Preference order for tied votes, most preferred first
    pub tie_break: Vec<String>,
}

impl Default for FileDeliberationConfig {
    fn default() -> Self {
        Self {
            specialist_timeout_ms: 5000,
            deliberation_timeout_ms: None,
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE_THRESHOLD,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            tie_break: TieBreakOrder::default()
                .as_slice()
                .iter()
                .map(|d| d.as_str().to_string())
                .collect(),
        }
    }
}

impl FileDeliberationConfig {
    /// Parse `tie_break` into a validated order
    pub fn parse_tie_break(&self) -> Result<TieBreakOrder, String> {
        let decisions = self
            .tie_break
            .iter()
            .map(|s| s.parse::<Decision>().map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        TieBreakOrder::new(decisions).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tie_break_is_conservative() {
        let config = FileDeliberationConfig::default();
        assert_eq!(config.tie_break, vec!["REMOVE", "FLAG_FOR_REVIEW", "ALLOW"]);
        assert_eq!(config.parse_tie_break().unwrap(), TieBreakOrder::default());
    }

    #[test]
    fn test_parse_tie_break_rejects_incomplete_order() {
        let config = FileDeliberationConfig {
            tie_break: vec!["ALLOW".to_string(), "REMOVE".to_string()],
            ..Default::default()
        };
        assert!(config.parse_tie_break().is_err());

        let config = FileDeliberationConfig {
            tie_break: vec!["ALLOW".to_string(), "ESCALATE".to_string(), "REMOVE".to_string()],
            ..Default::default()
        };
        assert!(config.parse_tie_break().is_err());
    }
}
