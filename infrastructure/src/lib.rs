//! Infrastructure layer for ethos-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the reference specialists, the JSONL audit
//! sink, the in-memory history store and configuration file loading.

pub mod audit;
pub mod config;
pub mod history;
pub mod specialists;

// Re-export commonly used types
pub use audit::JsonlAuditSink;
pub use config::{
    ConfigLoader, ConfigValidationError, FileAuditConfig, FileConfig, FileDeliberationConfig,
    FileOutputConfig, FileOutputFormat, FileSpecialistConfig,
};
pub use history::InMemoryHistory;
pub use specialists::{Framework, HeuristicSpecialist, reference_council};
