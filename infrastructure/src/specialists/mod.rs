//! Reference specialists
//!
//! Four keyword-heuristic specialists, one per ethical framework, so the
//! council can run end to end without any remote reasoning backend:
//!
//! | id | framework |
//! |----|-----------|
//! | `utilitarian` | harm vs. benefit |
//! | `deontological` | rights and duties |
//! | `cultural` | cultural sensitivity |
//! | `free_speech` | freedom of expression |

pub mod framework;
pub mod heuristic;
pub mod heuristics;

pub use framework::Framework;
pub use heuristic::HeuristicSpecialist;

use council_application::ports::specialist::Specialist;
use std::sync::Arc;

/// The four reference specialists with equal weights summing to 1
pub fn reference_council() -> Vec<Arc<dyn Specialist>> {
    let weight = 1.0 / Framework::ALL.len() as f64;
    Framework::ALL
        .iter()
        .map(|framework| Arc::new(HeuristicSpecialist::new(*framework, weight)) as Arc<dyn Specialist>)
        .collect()
}
