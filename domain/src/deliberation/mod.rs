//! Deliberation entities
//!
//! - [`task`]: the submitted content and its context
//! - [`opinion`]: one specialist's verdict
//! - [`invocation`]: per-specialist call state machine (timeout / fallback)
//! - [`lifecycle`]: task-level stage machine
//! - [`outcome`]: the packaged result of a completed deliberation

pub mod invocation;
pub mod lifecycle;
pub mod opinion;
pub mod outcome;
pub mod task;
