//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// These are validation failures only. Specialist misbehavior is never an
/// error at this level; it is recorded as data on the [`Opinion`](crate::Opinion).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Content cannot be empty")]
    EmptyContent,

    #[error("Content is too long: {length} characters (maximum {max})")]
    ContentTooLong { length: usize, max: usize },

    #[error("Malformed context: {0}")]
    MalformedContext(String),

    #[error("No specialists registered")]
    NoSpecialists,

    #[error("Duplicate specialist id: {0}")]
    DuplicateSpecialist(String),

    #[error("Unknown specialist: {0}")]
    UnknownSpecialist(String),

    #[error("Invalid weight for specialist {id}: {weight}")]
    InvalidWeight { id: String, weight: f64 },

    #[error("Invalid decision: {0}")]
    InvalidDecision(String),

    #[error("Invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    /// Check if this error was caused by the caller's input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyContent
                | DomainError::ContentTooLong { .. }
                | DomainError::MalformedContext(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(DomainError::EmptyContent.to_string(), "Content cannot be empty");
        assert_eq!(
            DomainError::ContentTooLong { length: 12, max: 10 }.to_string(),
            "Content is too long: 12 characters (maximum 10)"
        );
    }

    #[test]
    fn test_is_input_error() {
        assert!(DomainError::EmptyContent.is_input_error());
        assert!(DomainError::MalformedContext("x".into()).is_input_error());
        assert!(!DomainError::NoSpecialists.is_input_error());
        assert!(!DomainError::DuplicateSpecialist("a".into()).is_input_error());
    }
}
