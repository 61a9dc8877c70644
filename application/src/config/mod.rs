//! Application-level configuration.
//!
//! - [`DeliberationParams`]: timeouts, input limits, examination policy, audit retries

pub mod deliberation_params;

pub use deliberation_params::DeliberationParams;
