//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `brick_stack::game::configure_headless` to install gameplay plugins.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

pub fn app_headless() -> App {
    let mut app = App::new();

    // Physics colliders expect the asset + scene infrastructure to exist.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    brick_stack::game::configure_headless(&mut app);
    app
}

/// Count pooled entities currently in the given state.
#[allow(dead_code)]
pub fn count_in_state(app: &mut App, state: brick_stack::plugins::pooling::UnitState) -> usize {
    let world = app.world_mut();
    world
        .query::<&brick_stack::plugins::pooling::UnitState>()
        .iter(world)
        .filter(|s| **s == state)
        .count()
}
