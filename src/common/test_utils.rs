//! Test helpers.
//!
//! Systems that use `Commands` enqueue structural changes; we call `world.flush()` after
//! running so queued commands land before assertions. Pool tests also need a world with the
//! pooling resources in place, which `pooled_world` builds without an `App`.

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::plugins::pooling::{EntityPools, TemplateLibrary};
use crate::pool::{PoolRegistry, PoolSettings};

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A bare world holding an empty template library and a registry with `settings`.
pub fn pooled_world(settings: PoolSettings) -> World {
    let mut world = World::new();
    world.init_resource::<TemplateLibrary>();
    world.insert_resource(EntityPools(PoolRegistry::new(settings)));
    world
}
