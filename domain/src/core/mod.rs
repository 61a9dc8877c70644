//! Core domain concepts shared across all subdomains.
//!
//! - [`decision::Decision`]: the moderation verdict (ALLOW / REMOVE / FLAG_FOR_REVIEW)
//! - [`context::ModerationContext`]: key/value bag describing the content's setting
//! - [`id::SpecialistId`], [`id::TaskId`]: identifiers
//! - [`error::DomainError`]: domain-level validation errors

pub mod context;
pub mod decision;
pub mod error;
pub mod id;
