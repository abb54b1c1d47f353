//! Keyed directory of pools.
//!
//! Callers spawn by template and despawn by instance. The registry creates pools lazily, and
//! routes despawns through the ownership ledger so the caller never needs to know which pool
//! issued a unit.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::hash::Hash;

use bevy::log::{debug, warn};
use bevy::math::{Quat, Vec3};

use super::error::PoolError;
use super::host::PoolHost;
use super::ledger::{OwnerLedger, Ownership};
use super::queue::Pool;
use super::settings::PoolSettings;
use super::unit::{PooledUnit, TemplateId};

/// Outcome of [`PoolRegistry::despawn`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Despawned {
    /// The unit was active and is now back in its pool's free queue.
    Reclaimed,
    /// The unit belongs to a pool but was already free. Nothing changed.
    AlreadyFree,
    /// No pool owns the instance, so it was destroyed outright.
    Destroyed,
}

#[derive(Debug)]
pub struct PoolRegistry<I> {
    settings: PoolSettings,
    pools: BTreeMap<TemplateId, Pool<I>>,
    ledger: OwnerLedger<I>,
}

impl<I> Default for PoolRegistry<I> {
    fn default() -> Self {
        Self::new(PoolSettings::default())
    }
}

impl<I> PoolRegistry<I> {
    pub fn new(settings: PoolSettings) -> Self {
        Self { settings, pools: BTreeMap::new(), ledger: OwnerLedger::default() }
    }

    #[inline]
    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }
}

/// Look up the pool for `template`, creating it with the default preallocation if needed.
fn pool_or_create<'a, I, H>(
    pools: &'a mut BTreeMap<TemplateId, Pool<I>>,
    ledger: &mut OwnerLedger<I>,
    settings: &PoolSettings,
    host: &mut H,
    template: TemplateId,
) -> Result<&'a mut Pool<I>, PoolError>
where
    I: Copy + Eq + Hash + Debug,
    H: PoolHost<I>,
{
    match pools.entry(template) {
        Entry::Occupied(entry) => Ok(entry.into_mut()),
        Entry::Vacant(entry) => {
            debug!("No pool for {template} yet; creating one on first use");
            let pool = Pool::new(template, settings.default_amount, None, settings, host, ledger)?;
            Ok(entry.insert(pool))
        }
    }
}

impl<I: Copy + Eq + Hash + Debug> PoolRegistry<I> {
    /// Create and pre-warm the pool for `template`.
    ///
    /// Idempotent: if the pool already exists nothing happens and `amount`/`parent` are
    /// ignored. Returns whether a pool was created.
    pub fn preload<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        template: TemplateId,
        amount: usize,
        parent: Option<I>,
    ) -> Result<bool, PoolError> {
        let Entry::Vacant(entry) = self.pools.entry(template) else {
            return Ok(false);
        };
        let pool = Pool::new(template, amount, parent, &self.settings, host, &mut self.ledger)?;
        entry.insert(pool);
        Ok(true)
    }

    pub fn spawn<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        template: TemplateId,
        position: Vec3,
        rotation: Quat,
    ) -> Result<PooledUnit<I>, PoolError> {
        let pool = pool_or_create(&mut self.pools, &mut self.ledger, &self.settings, host, template)?;
        pool.spawn(host, &mut self.ledger, position, rotation)
    }

    /// Spawn, parenting a freshly created unit under `parent`. Reused units are not moved.
    pub fn spawn_with_parent<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        template: TemplateId,
        position: Vec3,
        rotation: Quat,
        parent: I,
    ) -> Result<PooledUnit<I>, PoolError> {
        let pool = pool_or_create(&mut self.pools, &mut self.ledger, &self.settings, host, template)?;
        pool.spawn_with_parent(host, &mut self.ledger, position, rotation, parent)
    }

    /// Reactivate the oldest free unit of `template` in place.
    ///
    /// `Ok(None)` when the pool has no free unit.
    pub fn spawn_oldest<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        template: TemplateId,
    ) -> Result<Option<PooledUnit<I>>, PoolError> {
        let pool = pool_or_create(&mut self.pools, &mut self.ledger, &self.settings, host, template)?;
        Ok(pool.spawn_oldest(host))
    }

    /// Return `instance` to whichever pool created it.
    ///
    /// An instance no pool owns is destroyed instead; that is a caller mistake and is logged.
    pub fn despawn<H: PoolHost<I>>(&mut self, host: &mut H, instance: I) -> Despawned {
        let pool = self
            .ledger
            .owner_of(instance)
            .and_then(|owner| self.pools.get_mut(&owner.template));

        let Some(pool) = pool else {
            warn!("Despawning {instance:?}, which no pool owns; destroying it instead");
            self.ledger.forget(instance);
            host.destroy(instance);
            return Despawned::Destroyed;
        };

        if pool.despawn(host, instance) {
            Despawned::Reclaimed
        } else {
            debug!("{instance:?} was already free; ignoring despawn");
            Despawned::AlreadyFree
        }
    }

    /// `None` if no pool exists for `template` or nothing in it is active.
    pub fn despawn_oldest<H: PoolHost<I>>(&mut self, host: &mut H, template: TemplateId) -> Option<PooledUnit<I>> {
        self.pools.get_mut(&template)?.despawn_oldest(host)
    }

    /// `None` if no pool exists for `template` or nothing in it is active.
    pub fn despawn_newest<H: PoolHost<I>>(&mut self, host: &mut H, template: TemplateId) -> Option<PooledUnit<I>> {
        self.pools.get_mut(&template)?.despawn_newest(host)
    }

    /// Return every active unit of `template` to its pool. The pool must exist.
    pub fn collect_pool<H: PoolHost<I>>(&mut self, host: &mut H, template: TemplateId) -> Result<usize, PoolError> {
        let pool = self.pools.get_mut(&template).ok_or(PoolError::MissingPool(template))?;
        Ok(pool.collect(host))
    }

    /// Destroy every unit of `template` and forget its pool. The pool must exist.
    pub fn release_pool<H: PoolHost<I>>(&mut self, host: &mut H, template: TemplateId) -> Result<usize, PoolError> {
        let pool = self.pools.remove(&template).ok_or(PoolError::MissingPool(template))?;
        Ok(pool.release(host, &mut self.ledger))
    }

    pub fn collect_all<H: PoolHost<I>>(&mut self, host: &mut H) -> usize {
        self.pools.values_mut().map(|pool| pool.collect(host)).sum()
    }

    /// Release every pool. Later spawns start over with freshly created pools.
    pub fn release_all<H: PoolHost<I>>(&mut self, host: &mut H) -> usize {
        let pools = std::mem::take(&mut self.pools);
        pools
            .into_values()
            .map(|pool| pool.release(host, &mut self.ledger))
            .sum()
    }

    /// Position of the oldest active unit of `template`, or `fallback`. The pool must exist.
    pub fn first_active_position<H: PoolHost<I>>(
        &self,
        host: &H,
        template: TemplateId,
        fallback: Vec3,
    ) -> Result<Vec3, PoolError> {
        let pool = self.pools.get(&template).ok_or(PoolError::MissingPool(template))?;
        Ok(pool.first_active_position(host, fallback))
    }

    #[inline]
    pub fn pool(&self, template: TemplateId) -> Option<&Pool<I>> {
        self.pools.get(&template)
    }

    #[inline]
    pub fn contains(&self, template: TemplateId) -> bool {
        self.pools.contains_key(&template)
    }

    #[inline]
    pub fn owner_of(&self, instance: I) -> Option<Ownership> {
        self.ledger.owner_of(instance)
    }

    #[inline]
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Units tracked across all pools.
    #[inline]
    pub fn unit_count(&self) -> usize {
        self.ledger.len()
    }
}
