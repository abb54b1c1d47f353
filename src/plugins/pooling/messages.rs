//! Buffered pool requests.
//!
//! Gameplay systems never borrow the registry. They write a `PoolRequest`; the single
//! consumer (`apply_pool_requests`) applies requests in the order they were written.

use bevy::prelude::*;

use crate::pool::TemplateId;

#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub enum PoolRequest {
    /// Spawn at a placement. With `parent`, a freshly created unit goes under it.
    Spawn {
        template: TemplateId,
        position: Vec3,
        rotation: Quat,
        parent: Option<Entity>,
    },
    SpawnOldest { template: TemplateId },
    Despawn { entity: Entity },
    DespawnOldest { template: TemplateId },
    DespawnNewest { template: TemplateId },
    Collect { template: TemplateId },
    CollectAll,
    ReleaseAll,
}

impl PoolRequest {
    pub fn spawn(template: TemplateId, position: Vec3) -> Self {
        Self::Spawn { template, position, rotation: Quat::IDENTITY, parent: None }
    }

    pub fn spawn_under(template: TemplateId, position: Vec3, rotation: Quat, parent: Entity) -> Self {
        Self::Spawn { template, position, rotation, parent: Some(parent) }
    }
}

/// Written once for every unit a `Spawn` or `SpawnOldest` request activated.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitSpawned {
    pub template: TemplateId,
    pub entity: Entity,
}
