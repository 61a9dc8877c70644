//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod deliberate;
pub mod dispatch;
pub mod submission;
