//! Pooling plugin: the keyed pool registry, hosted on the ECS.
//!
//! # Data flow
//! ```text
//!   Update (any gameplay system)
//!   ┌───────────────────────────────────────────────────────────┐
//!   │  MessageWriter<PoolRequest>                               │
//!   │    Spawn / SpawnOldest / Despawn / DespawnOldest /        │
//!   │    DespawnNewest / Collect / CollectAll / ReleaseAll      │
//!   └───────────────────────────────────────────────────────────┘
//!                 │
//!                 v
//!   PostUpdate (PoolSystems)
//!   ┌───────────────────────────────────────────────────────────┐
//!   │  apply_pool_requests (exclusive)                          │
//!   │    - drains PoolRequest in write order                    │
//!   │    - mutates EntityPools through WorldHost                │
//!   │    - writes UnitSpawned for every activated unit          │
//!   └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Code that already has exclusive access (startup, state transitions, tests) can skip the
//! messages and call [`with_pools`] directly.
//!
//! # Unit invariants
//! Active: `UnitState::Active`, visible, collision filters from `ActiveLayers`.
//! Inactive: `UnitState::Inactive`, hidden, empty collision filters, zero velocity.
//! `WorldHost::set_active` is the only writer of these.

pub mod components;
pub mod host;
pub mod messages;
pub mod systems;
pub mod templates;

use bevy::prelude::*;

use crate::pool::{PoolRegistry, PoolSettings};

pub use components::{ActiveLayers, Pooled, UnitState};
pub use host::{with_pools, world_transform, EntityPools, WorldHost};
pub use messages::{PoolRequest, UnitSpawned};
pub use templates::TemplateLibrary;

/// Systems that apply pool requests. Order readers of `UnitSpawned` after this set.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolSystems;

#[derive(Default)]
pub struct PoolingPlugin {
    pub settings: PoolSettings,
}

impl Plugin for PoolingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TemplateLibrary>()
            .insert_resource(EntityPools(PoolRegistry::new(self.settings)))
            .add_message::<PoolRequest>()
            .add_message::<UnitSpawned>()
            .add_systems(PostUpdate, systems::apply_pool_requests.in_set(PoolSystems));
    }
}

#[cfg(test)]
mod tests;
