//! Application layer for ethos-council
//!
//! This crate contains use cases, port definitions, the specialist registry
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod use_cases;

// Re-export commonly used types
pub use config::DeliberationParams;
pub use ports::{
    audit_sink::{AuditError, AuditSink, NoAuditSink},
    history::{DeliberationHistory, HistoryError, NoHistory},
    progress::{NoProgress, ProgressNotifier},
    specialist::{Specialist, SpecialistError, SpecialistProfile},
};
pub use registry::{RegistrySnapshot, SpecialistRegistry};
pub use use_cases::deliberate::{DeliberateError, DeliberateUseCase, PreparedDeliberation};
pub use use_cases::dispatch::{DispatchCancelled, Dispatcher};
pub use use_cases::submission::{SubmissionError, SubmissionService, SubmissionStatus};
