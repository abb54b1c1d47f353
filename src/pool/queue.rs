//! One pool per template: a free queue plus an active deque.
//!
//! Invariant: after construction every unit the pool created is in exactly one of `free` or
//! `active`. `active` is in spawn order (oldest at the front), which is what the
//! oldest/newest despawns rely on.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use bevy::log::{debug, warn};
use bevy::math::{Quat, Vec3};

use super::error::PoolError;
use super::host::PoolHost;
use super::ledger::OwnerLedger;
use super::settings::{Exhausted, PoolSettings};
use super::unit::{PooledUnit, TemplateId};

#[derive(Debug)]
pub struct Pool<I> {
    template: TemplateId,
    parent: Option<I>,
    free: VecDeque<PooledUnit<I>>,
    active: VecDeque<PooledUnit<I>>,
    max_size: Option<usize>,
    on_exhausted: Exhausted,
    created: usize,
}

impl<I: Copy + Eq + Hash + Debug> Pool<I> {
    /// Create the pool and pre-warm it with `amount` inactive units under `parent`.
    pub(crate) fn new<H: PoolHost<I>>(
        template: TemplateId,
        amount: usize,
        parent: Option<I>,
        settings: &PoolSettings,
        host: &mut H,
        ledger: &mut OwnerLedger<I>,
    ) -> Result<Self, PoolError> {
        let amount = match settings.max_size {
            Some(max) if amount > max => {
                warn!("Preload of {amount} units for {template} exceeds the pool limit; clamping to {max}");
                max
            }
            _ => amount,
        };

        let mut pool = Self {
            template,
            parent,
            free: VecDeque::with_capacity(amount),
            active: VecDeque::new(),
            max_size: settings.max_size,
            on_exhausted: settings.on_exhausted,
            created: 0,
        };

        for _ in 0..amount {
            match pool.create(host, ledger, parent) {
                Ok(unit) => {
                    pool.free.push_back(unit);
                    host.set_active(unit.instance(), false);
                }
                Err(err) => {
                    // Nothing may outlive a pool that never made it into the registry.
                    let destroyed = pool.release(host, ledger);
                    warn!("Preload of {template} failed after {destroyed} units: {err}");
                    return Err(err);
                }
            }
        }

        debug!("Created pool for {template} with {amount} units");
        Ok(pool)
    }

    fn create<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        ledger: &mut OwnerLedger<I>,
        parent: Option<I>,
    ) -> Result<PooledUnit<I>, PoolError> {
        let instance = host.instantiate(self.template, parent)?;
        self.created += 1;
        Ok(ledger.issue(self.template, instance))
    }

    /// Pick the unit the next spawn hands out.
    ///
    /// Oldest free unit first. An empty queue grows the pool, unless the pool is at its limit,
    /// in which case the exhaustion policy decides.
    fn acquire<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        ledger: &mut OwnerLedger<I>,
        parent: Option<I>,
    ) -> Result<PooledUnit<I>, PoolError> {
        if let Some(unit) = self.free.pop_front() {
            return Ok(unit);
        }

        match self.max_size {
            Some(max) if self.total() >= max => {
                let exhausted = PoolError::Exhausted { template: self.template, max };
                match self.on_exhausted {
                    Exhausted::Fail => Err(exhausted),
                    // Still active; the caller re-places it and moves it to the back.
                    Exhausted::RecycleOldest => self.active.pop_front().ok_or(exhausted),
                }
            }
            _ => {
                let unit = self.create(host, ledger, parent)?;
                debug!("Pool for {} grew to {} units", self.template, self.created);
                Ok(unit)
            }
        }
    }

    fn activate_at<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        unit: PooledUnit<I>,
        position: Vec3,
        rotation: Quat,
    ) -> PooledUnit<I> {
        host.place(unit.instance(), position, rotation);
        host.set_active(unit.instance(), true);
        self.active.push_back(unit);
        unit
    }

    pub(crate) fn spawn<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        ledger: &mut OwnerLedger<I>,
        position: Vec3,
        rotation: Quat,
    ) -> Result<PooledUnit<I>, PoolError> {
        let unit = self.acquire(host, ledger, self.parent)?;
        Ok(self.activate_at(host, unit, position, rotation))
    }

    /// Like `spawn`, but a freshly created unit goes under `parent`.
    ///
    /// Reused units keep whatever parent they already had.
    pub(crate) fn spawn_with_parent<H: PoolHost<I>>(
        &mut self,
        host: &mut H,
        ledger: &mut OwnerLedger<I>,
        position: Vec3,
        rotation: Quat,
        parent: I,
    ) -> Result<PooledUnit<I>, PoolError> {
        let unit = self.acquire(host, ledger, Some(parent))?;
        Ok(self.activate_at(host, unit, position, rotation))
    }

    /// Reactivate the oldest free unit where it was last left. Never grows the pool.
    pub(crate) fn spawn_oldest<H: PoolHost<I>>(&mut self, host: &mut H) -> Option<PooledUnit<I>> {
        let unit = self.free.pop_front()?;
        host.set_active(unit.instance(), true);
        self.active.push_back(unit);
        Some(unit)
    }

    fn reclaim<H: PoolHost<I>>(&mut self, host: &mut H, unit: PooledUnit<I>) {
        self.free.push_back(unit);
        host.set_active(unit.instance(), false);
    }

    /// Return `instance` to the free queue. Returns `false` if it was not active.
    pub(crate) fn despawn<H: PoolHost<I>>(&mut self, host: &mut H, instance: I) -> bool {
        let Some(index) = self.active.iter().position(|u| u.instance() == instance) else {
            return false;
        };
        let Some(unit) = self.active.remove(index) else {
            return false;
        };
        self.reclaim(host, unit);
        true
    }

    pub(crate) fn despawn_oldest<H: PoolHost<I>>(&mut self, host: &mut H) -> Option<PooledUnit<I>> {
        let unit = self.active.pop_front()?;
        self.reclaim(host, unit);
        Some(unit)
    }

    pub(crate) fn despawn_newest<H: PoolHost<I>>(&mut self, host: &mut H) -> Option<PooledUnit<I>> {
        let unit = self.active.pop_back()?;
        self.reclaim(host, unit);
        Some(unit)
    }

    /// Despawn every active unit, oldest first. Returns how many were collected.
    pub(crate) fn collect<H: PoolHost<I>>(&mut self, host: &mut H) -> usize {
        let mut collected = 0;
        while let Some(unit) = self.active.pop_front() {
            self.reclaim(host, unit);
            collected += 1;
        }
        collected
    }

    /// Collect, then destroy every unit and drop their ledger entries.
    ///
    /// Consumes the pool. Returns how many units were destroyed.
    pub(crate) fn release<H: PoolHost<I>>(mut self, host: &mut H, ledger: &mut OwnerLedger<I>) -> usize {
        self.collect(host);

        let destroyed = self.free.len();
        for unit in self.free.drain(..) {
            ledger.forget(unit.instance());
            host.destroy(unit.instance());
        }

        debug!("Released pool for {} ({destroyed} units destroyed)", self.template);
        destroyed
    }

    /// Position of the oldest active unit, or `fallback` when nothing is active.
    pub fn first_active_position<H: PoolHost<I>>(&self, host: &H, fallback: Vec3) -> Vec3 {
        self.active
            .front()
            .and_then(|unit| host.position(unit.instance()))
            .unwrap_or(fallback)
    }

    #[inline]
    pub fn template(&self) -> TemplateId {
        self.template
    }

    #[inline]
    pub fn parent(&self) -> Option<I> {
        self.parent
    }

    #[inline]
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Units currently held, free or active.
    #[inline]
    pub fn total(&self) -> usize {
        self.active.len() + self.free.len()
    }

    /// Units ever instantiated by this pool.
    #[inline]
    pub fn created(&self) -> usize {
        self.created
    }

    /// Active units, oldest first.
    pub fn active(&self) -> impl Iterator<Item = PooledUnit<I>> + '_ {
        self.active.iter().copied()
    }

    pub fn is_active(&self, instance: I) -> bool {
        self.active.iter().any(|u| u.instance() == instance)
    }
}
