//! Tunable gameplay constants.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    /// Bricks laid out on the track when a level starts (rows × columns).
    pub brick_rows: usize,
    pub brick_columns: usize,
    pub brick_spacing: f32,
    /// Stack units pre-warmed per level; the pool grows past this if a stack gets taller.
    pub stack_preload: usize,
    /// Height of one stacked unit above the previous one.
    pub stack_step: f32,
}

impl Tunables {
    pub fn brick_count(&self) -> usize {
        self.brick_rows * self.brick_columns
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            brick_rows: 4,
            brick_columns: 8,
            brick_spacing: 40.0,
            stack_preload: 32,
            stack_step: 6.0,
        }
    }
}
