//! The engine seam.
//!
//! Pools never touch the engine directly. Everything they need from it (creating instances,
//! destroying them, switching them on and off, moving them) goes through [`PoolHost`].

use bevy::math::{Quat, Vec3};

use super::error::PoolError;
use super::unit::TemplateId;

pub trait PoolHost<I> {
    /// Build a new, distinct instance of `template`, optionally under `parent`.
    ///
    /// The pool deactivates or places the instance afterwards, so its initial state is free.
    fn instantiate(&mut self, template: TemplateId, parent: Option<I>) -> Result<I, PoolError>;

    /// Permanently release the instance. Called at most once per instance by the pools.
    fn destroy(&mut self, instance: I);

    /// Toggle visibility/processing. Called on every spawn and despawn, so keep it cheap.
    fn set_active(&mut self, instance: I, active: bool);

    /// Set world-space position and orientation together, whatever the instance is parented to.
    fn place(&mut self, instance: I, position: Vec3, rotation: Quat);

    /// Current world-space position, or `None` if the instance no longer exists.
    fn position(&self, instance: I) -> Option<Vec3>;
}
