//! Moderation decision value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A moderation verdict on a piece of content.
///
/// # Example
///
/// ```
/// use council_domain::Decision;
///
/// let d: Decision = "flag_for_review".parse().unwrap();
/// assert_eq!(d, Decision::FlagForReview);
/// assert!(Decision::Remove.restrictiveness() > Decision::Allow.restrictiveness());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Content may stay up
    Allow,
    /// Content must be taken down
    Remove,
    /// Content needs a human moderator
    FlagForReview,
}

impl Decision {
    /// All decisions, in declaration order
    pub const ALL: [Decision; 3] = [Decision::Allow, Decision::Remove, Decision::FlagForReview];

    /// How restrictive this outcome is for the content's author.
    ///
    /// REMOVE > FLAG_FOR_REVIEW > ALLOW.
    pub fn restrictiveness(&self) -> u8 {
        match self {
            Decision::Allow => 0,
            Decision::FlagForReview => 1,
            Decision::Remove => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "ALLOW",
            Decision::Remove => "REMOVE",
            Decision::FlagForReview => "FLAG_FOR_REVIEW",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Decision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "allow" => Ok(Decision::Allow),
            "remove" => Ok(Decision::Remove),
            "flag_for_review" | "flag" | "review" => Ok(Decision::FlagForReview),
            _ => Err(DomainError::InvalidDecision(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decision() {
        assert_eq!("ALLOW".parse::<Decision>().ok(), Some(Decision::Allow));
        assert_eq!("remove".parse::<Decision>().ok(), Some(Decision::Remove));
        assert_eq!(
            "Flag-For-Review".parse::<Decision>().ok(),
            Some(Decision::FlagForReview)
        );
        assert_eq!("flag".parse::<Decision>().ok(), Some(Decision::FlagForReview));
        assert!("ban".parse::<Decision>().is_err());
    }

    #[test]
    fn test_restrictiveness_order() {
        assert!(Decision::Remove.restrictiveness() > Decision::FlagForReview.restrictiveness());
        assert!(Decision::FlagForReview.restrictiveness() > Decision::Allow.restrictiveness());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Decision::FlagForReview).unwrap();
        assert_eq!(json, "\"FLAG_FOR_REVIEW\"");
        let back: Decision = serde_json::from_str("\"REMOVE\"").unwrap();
        assert_eq!(back, Decision::Remove);
    }

    #[test]
    fn test_display() {
        assert_eq!(Decision::Allow.to_string(), "ALLOW");
        assert_eq!(Decision::FlagForReview.to_string(), "FLAG_FOR_REVIEW");
    }
}
