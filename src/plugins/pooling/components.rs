use avian2d::prelude::*;
use bevy::prelude::*;

use crate::pool::TemplateId;

/// Marks an entity created by a pool, and which template it came from.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pooled {
    pub template: TemplateId,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitState {
    #[default]
    Inactive,
    Active,
}

/// Collision layers a pooled unit uses while active.
///
/// Inactive units keep their memberships but get empty filters, so they collide with nothing
/// without any structural change to the entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct ActiveLayers(pub CollisionLayers);

impl ActiveLayers {
    #[inline]
    pub fn inactive(&self) -> CollisionLayers {
        CollisionLayers::new(self.0.memberships, LayerMask::NONE)
    }
}
