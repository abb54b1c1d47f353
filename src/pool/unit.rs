//! Identifiers and the pooled-unit handle.

use std::fmt;

/// Identity of a template (the blueprint pooled units are built from).
///
/// Issued by whoever owns the templates (see `TemplateLibrary`). Two templates never share a
/// pool, even when they build identical entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateId(pub u32);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template#{}", self.0)
    }
}

/// Stable identity of one pooled unit, assigned by the registry when the unit is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit#{}", self.0)
    }
}

/// Handle to one recyclable instance.
///
/// `I` is the host's instance handle (an `Entity` under Bevy). The handle is non-owning: the
/// host keeps the instance's transform, and `instance()` is how callers get back to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PooledUnit<I> {
    id: UnitId,
    template: TemplateId,
    instance: I,
}

impl<I: Copy> PooledUnit<I> {
    #[inline]
    pub(crate) fn new(id: UnitId, template: TemplateId, instance: I) -> Self {
        Self { id, template, instance }
    }

    #[inline]
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Template whose pool owns this unit, for its whole life.
    #[inline]
    pub fn template(&self) -> TemplateId {
        self.template
    }

    #[inline]
    pub fn instance(&self) -> I {
        self.instance
    }
}
