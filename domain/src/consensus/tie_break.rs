//! Tie-break ordering for equal vote counts or equal weights.

use crate::core::decision::Decision;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Preference order applied when two decisions tie.
///
/// The default is conservative: REMOVE, then FLAG_FOR_REVIEW, then ALLOW.
///
/// # Example
///
/// ```
/// use council_domain::{Decision, TieBreakOrder};
///
/// let order = TieBreakOrder::default();
/// assert_eq!(order.prefer(Decision::Allow, Decision::Remove), Decision::Remove);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Decision>", into = "Vec<Decision>")]
pub struct TieBreakOrder {
    order: [Decision; 3],
}

impl TieBreakOrder {
    /// Build an order from a full permutation of the three decisions
    pub fn new(order: Vec<Decision>) -> Result<Self, DomainError> {
        let [a, b, c]: [Decision; 3] = order.clone().try_into().map_err(|_| {
            DomainError::InvalidDecision(format!(
                "tie-break order must list all three decisions, got {:?}",
                order
            ))
        })?;
        if a == b || b == c || a == c {
            return Err(DomainError::InvalidDecision(format!(
                "tie-break order contains duplicates: {:?}",
                order
            )));
        }
        Ok(Self { order: [a, b, c] })
    }

    /// Ordered by restrictiveness, most restrictive first
    pub fn conservative() -> Self {
        Self {
            order: [Decision::Remove, Decision::FlagForReview, Decision::Allow],
        }
    }

    /// Position of `decision` in the order; lower wins ties
    pub fn rank(&self, decision: Decision) -> usize {
        self.order
            .iter()
            .position(|d| *d == decision)
            .unwrap_or(self.order.len())
    }

    /// The preferred of two tied decisions
    pub fn prefer(&self, a: Decision, b: Decision) -> Decision {
        if self.rank(b) < self.rank(a) { b } else { a }
    }

    pub fn as_slice(&self) -> &[Decision] {
        &self.order
    }
}

impl Default for TieBreakOrder {
    fn default() -> Self {
        Self::conservative()
    }
}

impl TryFrom<Vec<Decision>> for TieBreakOrder {
    type Error = DomainError;

    fn try_from(order: Vec<Decision>) -> Result<Self, Self::Error> {
        Self::new(order)
    }
}

impl From<TieBreakOrder> for Vec<Decision> {
    fn from(order: TieBreakOrder) -> Self {
        order.order.to_vec()
    }
}
