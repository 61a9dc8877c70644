//! Consensus: cross-examination and weighted synthesis
//!
//! Both stages are pure functions over an [`OpinionSet`](crate::OpinionSet):
//!
//! ```text
//! opinions ──examine()──▶ CrossExamination ──synthesize()──▶ ConsensusResult
//!                                              ▲
//!                              SpecialistWeights
//! ```

pub mod cross_exam;
pub mod synthesis;
pub mod tie_break;
pub mod weights;
