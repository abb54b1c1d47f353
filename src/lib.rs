//! Library entry point.
//!
//! `pool` is the engine-independent pooling core; `plugins::pooling` hosts it on Bevy.
//! Integration tests in `tests/` are compiled as separate crates and import from here.

pub mod common;
pub mod game;
pub mod plugins;
pub mod pool;
