//! Deliberation task entity - the unit of work.

use crate::core::context::ModerationContext;
use crate::core::error::DomainError;
use crate::core::id::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default maximum content length, in characters
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 10_000;

/// A piece of content submitted for deliberation.
///
/// Immutable once created: fields are private and there are no setters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationTask {
    task_id: TaskId,
    content: String,
    context: ModerationContext,
    submitted_at: DateTime<Utc>,
}

impl DeliberationTask {
    /// Validate the input and create a task with a fresh id.
    ///
    /// Rejects empty or whitespace-only content, content longer than
    /// `max_content_length` characters, and malformed context.
    pub fn create(
        content: impl Into<String>,
        context: ModerationContext,
        max_content_length: usize,
    ) -> Result<Self, DomainError> {
        Self::create_with_id(TaskId::generate(), content, context, max_content_length)
    }

    /// Like [`create`](Self::create), under an id the caller already handed out.
    pub fn create_with_id(
        task_id: TaskId,
        content: impl Into<String>,
        context: ModerationContext,
        max_content_length: usize,
    ) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyContent);
        }

        let length = content.chars().count();
        if length > max_content_length {
            return Err(DomainError::ContentTooLong {
                length,
                max: max_content_length,
            });
        }

        context.validate()?;

        Ok(Self {
            task_id,
            content,
            context,
            submitted_at: Utc::now(),
        })
    }

    /// Rebuild a task from stored parts, without validation.
    pub fn restore(
        task_id: TaskId,
        content: impl Into<String>,
        context: ModerationContext,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            content: content.into(),
            context,
            submitted_at,
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn context(&self) -> &ModerationContext {
        &self.context
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Short single-line preview for logs
    pub fn preview(&self, max_chars: usize) -> String {
        let flat: String = self
            .content
            .chars()
            .map(|c| if c.is_whitespace() { ' ' } else { c })
            .collect();
        if flat.chars().count() > max_chars {
            let cut: String = flat.chars().take(max_chars).collect();
            format!("{}...", cut)
        } else {
            flat
        }
    }
}
