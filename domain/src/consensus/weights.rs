//! Specialist voting weights.

use crate::core::error::DomainError;
use crate::core::id::SpecialistId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-specialist weights used by the synthesizer.
///
/// Weights need not sum to 1; they are renormalized over whichever
/// specialists actually participate. A specialist without an explicit
/// entry gets an equal share (`1 / n` for `n` consulted specialists).
/// A weight of 0 keeps the specialist on the record but out of the vote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpecialistWeights {
    weights: BTreeMap<SpecialistId, f64>,
}

impl SpecialistWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equal weights summing to 1
    pub fn equal<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SpecialistId>,
    {
        let ids: Vec<SpecialistId> = ids.into_iter().map(Into::into).collect();
        let share = if ids.is_empty() {
            0.0
        } else {
            1.0 / ids.len() as f64
        };
        Self {
            weights: ids.into_iter().map(|id| (id, share)).collect(),
        }
    }

    /// Set one weight, rejecting negative or non-finite values
    pub fn set(&mut self, id: impl Into<SpecialistId>, weight: f64) -> Result<(), DomainError> {
        let id = id.into();
        validate_weight(&id, weight)?;
        self.weights.insert(id, weight);
        Ok(())
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, id: impl Into<SpecialistId>, weight: f64) -> Result<Self, DomainError> {
        self.set(id, weight)?;
        Ok(self)
    }

    pub fn get(&self, id: &SpecialistId) -> Option<f64> {
        self.weights.get(id).copied()
    }

    /// Weight for `id`, falling back to an equal share of `consulted`
    pub fn effective(&self, id: &SpecialistId, consulted: usize) -> f64 {
        self.get(id).unwrap_or_else(|| {
            if consulted == 0 {
                0.0
            } else {
                1.0 / consulted as f64
            }
        })
    }

    pub fn remove(&mut self, id: &SpecialistId) -> Option<f64> {
        self.weights.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SpecialistId, f64)> {
        self.weights.iter().map(|(id, w)| (id, *w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}

fn validate_weight(id: &SpecialistId, weight: f64) -> Result<(), DomainError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(DomainError::InvalidWeight {
            id: id.to_string(),
            weight,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_weights_sum_to_one() {
        let w = SpecialistWeights::equal(["a", "b", "c", "d"]);
        assert_eq!(w.len(), 4);
        assert!((w.total() - 1.0).abs() < 1e-12);
        assert_eq!(w.get(&SpecialistId::from("a")), Some(0.25));
    }

    #[test]
    fn test_effective_falls_back_to_equal_share() {
        let w = SpecialistWeights::new().with("a", 0.7).unwrap();
        assert_eq!(w.effective(&SpecialistId::from("a"), 4), 0.7);
        assert_eq!(w.effective(&SpecialistId::from("b"), 4), 0.25);
        assert_eq!(w.effective(&SpecialistId::from("b"), 0), 0.0);
    }

    #[test]
    fn test_rejects_invalid_weights() {
        let mut w = SpecialistWeights::new();
        assert!(w.set("a", -0.1).is_err());
        assert!(w.set("a", f64::INFINITY).is_err());
        assert!(w.set("a", 0.0).is_ok());
    }
}
