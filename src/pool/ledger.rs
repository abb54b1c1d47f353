//! Instance → owning pool bookkeeping.

use std::collections::HashMap;
use std::hash::Hash;

use super::unit::{PooledUnit, TemplateId, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ownership {
    pub unit: UnitId,
    pub template: TemplateId,
}

/// Records which pool owns every live instance and hands out unit ids.
///
/// Entries are added when a pool creates a unit and removed only when the unit is destroyed.
#[derive(Debug)]
pub struct OwnerLedger<I> {
    owners: HashMap<I, Ownership>,
    next_unit: u64,
}

impl<I> Default for OwnerLedger<I> {
    fn default() -> Self {
        Self { owners: HashMap::new(), next_unit: 0 }
    }
}

impl<I: Copy + Eq + Hash> OwnerLedger<I> {
    /// Register a freshly created instance and mint its handle.
    pub fn issue(&mut self, template: TemplateId, instance: I) -> PooledUnit<I> {
        let unit = UnitId(self.next_unit);
        self.next_unit += 1;
        self.owners.insert(instance, Ownership { unit, template });
        PooledUnit::new(unit, template, instance)
    }

    pub fn forget(&mut self, instance: I) -> Option<Ownership> {
        self.owners.remove(&instance)
    }

    #[inline]
    pub fn owner_of(&self, instance: I) -> Option<Ownership> {
        self.owners.get(&instance).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.owners.len()
    }
}
