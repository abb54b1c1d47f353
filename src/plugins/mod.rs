//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::pooling::PoolingPlugin;
use crate::pool::PoolSettings;

pub mod bricks;
pub mod core;
pub mod physics;
pub mod pooling;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    app.add_plugins(PoolingPlugin { settings: PoolSettings::default() });
    bricks::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}
