//! Specialist Registry
//!
//! The [`SpecialistRegistry`] holds the council: the registered specialists
//! and their voting weights. Each deliberation takes a [`RegistrySnapshot`]
//! when it is created and works from that snapshot until it completes.
//!
//! # Snapshots
//!
//! ```text
//! register / set_weight ──▶ new Arc<RegistrySnapshot> (copy-on-write)
//!                                  │
//! deliberation CREATED ──snapshot()─┘  (cheap Arc clone, never changes)
//! ```
//!
//! Reconfiguring the registry therefore never affects a deliberation that
//! has already started.

use crate::ports::specialist::Specialist;
use council_domain::{DomainError, SpecialistId, SpecialistWeights};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Immutable view of the council at one point in time
#[derive(Clone, Default)]
pub struct RegistrySnapshot {
    specialists: Vec<Arc<dyn Specialist>>,
    weights: SpecialistWeights,
}

impl RegistrySnapshot {
    /// Registered specialists, ordered by id
    pub fn specialists(&self) -> &[Arc<dyn Specialist>] {
        &self.specialists
    }

    pub fn weights(&self) -> &SpecialistWeights {
        &self.weights
    }

    pub fn ids(&self) -> Vec<SpecialistId> {
        self.specialists.iter().map(|s| s.id().clone()).collect()
    }

    pub fn get(&self, id: &SpecialistId) -> Option<&Arc<dyn Specialist>> {
        self.specialists.iter().find(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.specialists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specialists.is_empty()
    }
}

impl std::fmt::Debug for RegistrySnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrySnapshot")
            .field("specialists", &self.ids())
            .field("weights", &self.weights)
            .finish()
    }
}

/// Registry of specialists with per-specialist weights
#[derive(Default)]
pub struct SpecialistRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl SpecialistRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a specialist under its profile weight.
    ///
    /// Rejects duplicate ids and invalid weights.
    pub fn register(&self, specialist: Arc<dyn Specialist>) -> Result<(), DomainError> {
        self.update(|snapshot| {
            let id = specialist.id().clone();
            if snapshot.get(&id).is_some() {
                return Err(DomainError::DuplicateSpecialist(id.to_string()));
            }
            snapshot.weights.set(id.clone(), specialist.weight())?;
            snapshot.specialists.push(specialist);
            snapshot.specialists.sort_by(|a, b| a.id().cmp(b.id()));
            debug!(specialist = %id, "Registered specialist");
            Ok(())
        })
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(self, specialist: Arc<dyn Specialist>) -> Result<Self, DomainError> {
        self.register(specialist)?;
        Ok(self)
    }

    /// Remove a specialist; returns whether it was registered
    pub fn unregister(&self, id: &SpecialistId) -> bool {
        let mut removed = false;
        let _ = self.update(|snapshot| {
            let before = snapshot.specialists.len();
            snapshot.specialists.retain(|s| s.id() != id);
            snapshot.weights.remove(id);
            removed = snapshot.specialists.len() != before;
            Ok(())
        });
        removed
    }

    /// Override the weight of a registered specialist
    pub fn set_weight(&self, id: &SpecialistId, weight: f64) -> Result<(), DomainError> {
        self.update(|snapshot| {
            if snapshot.get(id).is_none() {
                return Err(DomainError::UnknownSpecialist(id.to_string()));
            }
            snapshot.weights.set(id.clone(), weight)
        })
    }

    /// The current council, frozen
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Apply `change` to a copy of the current snapshot and publish it on success
    fn update<F>(&self, change: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut RegistrySnapshot) -> Result<(), DomainError>,
    {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = RegistrySnapshot::clone(&guard);
        change(&mut next)?;
        *guard = Arc::new(next);
        Ok(())
    }
}
