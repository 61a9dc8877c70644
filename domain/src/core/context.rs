//! Moderation context value object
//!
//! An opaque key/value bag describing where the content will appear.
//! The core never interprets it beyond validating the well-known keys;
//! specialists read whatever they need.

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Well-known boolean flags
pub const BOOLEAN_KEYS: &[&str] = &[
    "vulnerable_audience",
    "educational_value",
    "public_interest",
    "democratic_value",
    "public_platform",
];

/// Key/value context supplied with the content (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModerationContext {
    entries: BTreeMap<String, Value>,
}

impl ModerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Read a boolean flag, treating a missing key as `default`
    pub fn flag_or(&self, key: &str, default: bool) -> bool {
        self.entries
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or(default)
    }

    /// Read a boolean flag, treating a missing key as `false`
    pub fn flag(&self, key: &str) -> bool {
        self.flag_or(key, false)
    }

    /// Expected audience size (defaults to 1)
    pub fn audience_size(&self) -> u64 {
        self.entries
            .get("audience_size")
            .and_then(Value::as_u64)
            .unwrap_or(1)
    }

    pub fn platform(&self) -> Option<&str> {
        self.entries.get("platform").and_then(Value::as_str)
    }

    /// Target cultures (defaults to `["global"]`)
    pub fn target_cultures(&self) -> Vec<String> {
        match self.entries.get("target_cultures").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            None => vec!["global".to_string()],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Check the well-known keys hold values of the right shape.
    ///
    /// Unknown keys are accepted as-is.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(v) = self.entries.get("audience_size")
            && v.as_u64().is_none()
        {
            return Err(DomainError::MalformedContext(format!(
                "audience_size must be a non-negative integer, got {}",
                v
            )));
        }

        if let Some(v) = self.entries.get("platform")
            && !v.is_string()
        {
            return Err(DomainError::MalformedContext(format!(
                "platform must be a string, got {}",
                v
            )));
        }

        for key in BOOLEAN_KEYS {
            if let Some(v) = self.entries.get(*key)
                && !v.is_boolean()
            {
                return Err(DomainError::MalformedContext(format!(
                    "{} must be a boolean, got {}",
                    key, v
                )));
            }
        }

        if let Some(v) = self.entries.get("target_cultures") {
            let well_formed = v
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string));
            if !well_formed {
                return Err(DomainError::MalformedContext(format!(
                    "target_cultures must be an array of strings, got {}",
                    v
                )));
            }
        }

        Ok(())
    }
}

impl From<BTreeMap<String, Value>> for ModerationContext {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, Value)> for ModerationContext {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors_and_defaults() {
        let ctx = ModerationContext::new()
            .with("audience_size", 50_000)
            .with("educational_value", true)
            .with("platform", "forum");

        assert_eq!(ctx.audience_size(), 50_000);
        assert!(ctx.flag("educational_value"));
        assert!(!ctx.flag("public_interest"));
        assert!(ctx.flag_or("public_platform", true));
        assert_eq!(ctx.platform(), Some("forum"));
        assert_eq!(ctx.target_cultures(), vec!["global".to_string()]);
        assert_eq!(ModerationContext::new().audience_size(), 1);
    }

    #[test]
    fn test_validate_accepts_unknown_keys() {
        let ctx = ModerationContext::new()
            .with("anything", json!({"nested": [1, 2]}))
            .with("target_cultures", json!(["jp", "us"]));
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_values() {
        let bad_size = ModerationContext::new().with("audience_size", -3);
        assert!(matches!(
            bad_size.validate(),
            Err(DomainError::MalformedContext(_))
        ));

        let bad_flag = ModerationContext::new().with("vulnerable_audience", "yes");
        assert!(bad_flag.validate().is_err());

        let bad_cultures = ModerationContext::new().with("target_cultures", json!([1]));
        assert!(bad_cultures.validate().is_err());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let ctx = ModerationContext::new().with("platform", "video");
        assert_eq!(
            serde_json::to_value(&ctx).unwrap(),
            json!({"platform": "video"})
        );
    }
}
