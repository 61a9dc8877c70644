//! Domain layer for ethos-council
//!
//! This crate contains the core types and the pure deliberation algorithms.
//! It has no dependencies on infrastructure, presentation or an async runtime.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A council is a set of independent specialists, each reasoning from one
//! ethical framework, that evaluate the same piece of content:
//!
//! - **Opinion**: one specialist's decision, confidence, rationale and evidence
//! - **Cross-examination**: who agrees with the majority, who conflicts, who is unsure
//! - **Synthesis**: weighted aggregation into a single auditable verdict
//!
//! ## Decisions
//!
//! - **ALLOW**: leave the content up
//! - **FLAG_FOR_REVIEW**: defer to a human moderator
//! - **REMOVE**: take the content down

pub mod audit;
pub mod consensus;
pub mod core;
pub mod deliberation;

// Re-export commonly used types
pub use audit::{AuditRecord, content_digest};
pub use consensus::{
    cross_exam::{
        Conflict, CrossExamination, DEFAULT_LOW_CONFIDENCE_THRESHOLD, ExaminationPolicy, examine,
    },
    synthesis::{ALL_UNAVAILABLE, ConsensusResult, DeliberationQuality, synthesize},
    tie_break::TieBreakOrder,
    weights::SpecialistWeights,
};
pub use core::{
    context::ModerationContext,
    decision::Decision,
    error::DomainError,
    id::{SpecialistId, TaskId},
};
pub use deliberation::{
    invocation::{Invocation, InvocationState},
    lifecycle::{DeliberationLifecycle, DeliberationStage, StageTransition},
    opinion::{Opinion, OpinionSet, OpinionStatus},
    outcome::DeliberationOutcome,
    task::{DEFAULT_MAX_CONTENT_LENGTH, DeliberationTask},
};
