//! `PoolHost` over a Bevy `World`.
//!
//! Activation never adds or removes components. It only writes values:
//! - `UnitState`
//! - `Visibility` (Hidden when inactive)
//! - `CollisionLayers` (filters emptied when inactive, restored from `ActiveLayers`)
//! - `LinearVelocity` (zeroed when inactive)
//!
//! Placement and position queries are in world space. A parented unit is placed by converting
//! the requested pose into its parent's frame.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::pool::{PoolError, PoolHost, PoolRegistry, PooledUnit, TemplateId};

use super::components::{ActiveLayers, Pooled, UnitState};
use super::templates::TemplateLibrary;

/// The app-wide registry. All pool mutation goes through [`with_pools`].
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct EntityPools(pub PoolRegistry<Entity>);

pub struct WorldHost<'w> {
    world: &'w mut World,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }
}

impl PoolHost<Entity> for WorldHost<'_> {
    fn instantiate(&mut self, template: TemplateId, parent: Option<Entity>) -> Result<Entity, PoolError> {
        let (name, build) = self
            .world
            .get_resource::<TemplateLibrary>()
            .and_then(|library| library.builder(template))
            .ok_or(PoolError::UnknownTemplate(template))?;

        let parent = parent.filter(|&p| {
            let exists = self.world.get_entity(p).is_ok();
            if !exists {
                warn!("Parent {p:?} for {template} no longer exists; spawning at the root");
            }
            exists
        });

        let mut entity = self.world.spawn((
            Name::new(format!("{name}(Pooled)")),
            Pooled { template },
            UnitState::Inactive,
            Transform::default(),
            Visibility::Hidden,
        ));
        build(&mut entity);
        if let Some(parent) = parent {
            entity.insert(ChildOf(parent));
        }
        Ok(entity.id())
    }

    fn destroy(&mut self, instance: Entity) {
        if !self.world.despawn(instance) {
            debug!("Pooled entity {instance:?} was already gone");
        }
    }

    fn set_active(&mut self, instance: Entity, active: bool) {
        let Ok(mut entity) = self.world.get_entity_mut(instance) else {
            warn!("Cannot toggle {instance:?}: entity does not exist");
            return;
        };

        if let Some(mut state) = entity.get_mut::<UnitState>() {
            *state = if active { UnitState::Active } else { UnitState::Inactive };
        }
        if let Some(mut vis) = entity.get_mut::<Visibility>() {
            *vis = if active { Visibility::Inherited } else { Visibility::Hidden };
        }

        let layers = entity.get::<ActiveLayers>().copied();
        if let (Some(layers), Some(mut current)) = (layers, entity.get_mut::<CollisionLayers>()) {
            *current = if active { layers.0 } else { layers.inactive() };
        }

        if !active {
            if let Some(mut vel) = entity.get_mut::<LinearVelocity>() {
                vel.0 = Vec2::ZERO;
            }
        }
    }

    fn place(&mut self, instance: Entity, position: Vec3, rotation: Quat) {
        let world: &World = &*self.world;
        let parent = world
            .get::<ChildOf>(instance)
            .and_then(|child_of| world_transform(world, child_of.parent()));

        let (translation, rotation) = match parent {
            Some(parent) => {
                let target = GlobalTransform::from(Transform::from_translation(position).with_rotation(rotation));
                let local = target.reparented_to(&parent);
                (local.translation, local.rotation)
            }
            None => (position, rotation),
        };

        if let Some(mut tf) = self.world.get_mut::<Transform>(instance) {
            tf.translation = translation;
            tf.rotation = rotation;
        }
    }

    fn position(&self, instance: Entity) -> Option<Vec3> {
        world_transform(&*self.world, instance).map(|global| global.translation())
    }
}

impl PooledUnit<Entity> {
    /// Resolve the unit's transform from the world.
    pub fn transform<'w>(&self, world: &'w World) -> Option<&'w Transform> {
        world.get::<Transform>(self.instance())
    }
}

/// World-space transform of `entity`, composed from its `ChildOf` chain.
///
/// Unlike `GlobalTransform`, this does not wait for transform propagation, so it is exact
/// right after a unit is placed. A parent without a `Transform` counts as the identity.
pub fn world_transform(world: &World, entity: Entity) -> Option<GlobalTransform> {
    let local = *world.get::<Transform>(entity)?;
    let parent = world
        .get::<ChildOf>(entity)
        .and_then(|child_of| world_transform(world, child_of.parent()))
        .unwrap_or_default();
    Some(parent.mul_transform(local))
}

/// Run `f` with the registry and a host over the rest of the world.
///
/// # Panics
/// If `EntityPools` is missing (the `PoolingPlugin` was not added).
pub fn with_pools<T>(
    world: &mut World,
    f: impl FnOnce(&mut PoolRegistry<Entity>, &mut WorldHost<'_>) -> T,
) -> T {
    world.resource_scope(|world, mut pools: Mut<EntityPools>| {
        let mut host = WorldHost::new(world);
        f(&mut pools.0, &mut host)
    })
}
