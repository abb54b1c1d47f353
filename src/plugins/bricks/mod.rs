//! Bricks plugin: the two pooled templates the game recycles.
//!
//! - `brick`: collectible bricks laid out on the track when a level starts.
//! - `stack`: the blocks stacked under the player as bricks are collected.
//!
//! Level lifecycle:
//! - OnEnter(InGame): preload both pools, then lay the bricks out from the brick pool.
//! - OnExit(InGame): collect every pool, so the next level starts warm.
//!
//! Stacking goes through [`push_stack`] / [`pop_stack`]. Both run with exclusive world access
//! and return the affected entity, which the request messages cannot do.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::pooling::{with_pools, world_transform, ActiveLayers, TemplateLibrary};
use crate::pool::{PoolError, TemplateId};

#[derive(Resource, Debug, Clone, Copy)]
pub struct BrickTemplates {
    pub brick: TemplateId,
    pub stack: TemplateId,
}

const BRICK_SIZE: Vec2 = Vec2::new(24.0, 12.0);

fn brick_bundle() -> impl Bundle + Clone {
    let layers = CollisionLayers::new(Layer::Brick, [Layer::Player]);
    (
        Sprite {
            color: Color::srgb(0.9, 0.45, 0.2),
            custom_size: Some(BRICK_SIZE),
            ..default()
        },
        Collider::rectangle(BRICK_SIZE.x, BRICK_SIZE.y),
        Sensor,
        layers,
        ActiveLayers(layers),
    )
}

fn stack_bundle() -> impl Bundle + Clone {
    Sprite {
        color: Color::srgb(0.95, 0.8, 0.3),
        custom_size: Some(BRICK_SIZE),
        ..default()
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<TemplateLibrary>();
    let templates = {
        let mut library = app.world_mut().resource_mut::<TemplateLibrary>();
        BrickTemplates {
            brick: library.register_bundle("Brick", brick_bundle()),
            stack: library.register_bundle("Stack", stack_bundle()),
        }
    };

    app.insert_resource(templates)
        .add_systems(OnEnter(GameState::InGame), (preload_pools, lay_out_bricks).chain())
        .add_systems(OnExit(GameState::InGame), collect_pools);
}

fn preload_pools(world: &mut World) {
    let templates = *world.resource::<BrickTemplates>();
    let (bricks, stacks) = {
        let tunables = world.resource::<Tunables>();
        (tunables.brick_count(), tunables.stack_preload)
    };

    let result = with_pools(world, |pools, host| {
        pools.preload(host, templates.brick, bricks, None)?;
        pools.preload(host, templates.stack, stacks, None)
    });
    if let Err(err) = result {
        error!("Failed to preload brick pools: {err}");
    }
}

/// Centered grid of bricks, `brick_spacing` apart.
fn brick_layout(tunables: &Tunables) -> Vec<Vec3> {
    let spacing = tunables.brick_spacing;
    let origin = Vec2::new(
        (tunables.brick_columns as f32 - 1.0) * spacing * 0.5,
        (tunables.brick_rows as f32 - 1.0) * spacing * 0.5,
    );

    (0..tunables.brick_rows)
        .flat_map(|row| (0..tunables.brick_columns).map(move |col| (row, col)))
        .map(|(row, col)| (Vec2::new(col as f32, row as f32) * spacing - origin).extend(1.0))
        .collect()
}

fn lay_out_bricks(world: &mut World) {
    let brick = world.resource::<BrickTemplates>().brick;
    let layout = brick_layout(world.resource::<Tunables>());

    with_pools(world, |pools, host| {
        for position in layout {
            if let Err(err) = pools.spawn(host, brick, position, Quat::IDENTITY) {
                error!("Failed to lay out brick at {position}: {err}");
                break;
            }
        }
    });
}

fn collect_pools(world: &mut World) {
    let collected = with_pools(world, |pools, host| pools.collect_all(host));
    debug!("Level over: collected {collected} pooled units");
}

/// Put one more block on top of `holder`'s stack and return it.
///
/// The block goes `stack_step` above the holder per block already active, along the holder's
/// up axis and with its rotation. Blocks created for this call are parented to `holder`;
/// reused blocks keep their original parent but are still placed on the holder.
pub fn push_stack(world: &mut World, holder: Entity) -> Result<Entity, PoolError> {
    let stack = world.resource::<BrickTemplates>().stack;
    let step = world.resource::<Tunables>().stack_step;
    let (_, rotation, base) = world_transform(world, holder)
        .unwrap_or_default()
        .to_scale_rotation_translation();

    with_pools(world, |pools, host| {
        let height = pools.pool(stack).map_or(0, |pool| pool.active_len());
        let position = base + rotation * Vec3::Y * step * height as f32;
        pools
            .spawn_with_parent(host, stack, position, rotation, holder)
            .map(|unit| unit.instance())
    })
}

/// Take the top block off the stack. `None` when the stack is empty.
pub fn pop_stack(world: &mut World) -> Option<Entity> {
    let stack = world.resource::<BrickTemplates>().stack;
    with_pools(world, |pools, host| pools.despawn_newest(host, stack)).map(|unit| unit.instance())
}

/// World position of the bottom block, or `fallback` when nothing is stacked.
pub fn stack_base(world: &mut World, fallback: Vec3) -> Vec3 {
    let stack = world.resource::<BrickTemplates>().stack;
    with_pools(world, |pools, host| pools.first_active_position(&*host, stack, fallback))
        .unwrap_or_else(|err| {
            warn!("Cannot locate the stack base: {err}");
            fallback
        })
}
