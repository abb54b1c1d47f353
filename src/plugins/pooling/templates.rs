//! Registered templates (what Unity would call prefabs).
//!
//! A template is a builder that fills in a freshly spawned entity. The library hands out the
//! `TemplateId`s the pools are keyed by.

use std::sync::Arc;

use bevy::prelude::*;

use crate::pool::TemplateId;

pub type TemplateBuilder = Arc<dyn Fn(&mut EntityWorldMut) + Send + Sync>;

struct Template {
    name: String,
    build: TemplateBuilder,
}

#[derive(Resource, Default)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn register(
        &mut self,
        name: impl Into<String>,
        build: impl Fn(&mut EntityWorldMut) + Send + Sync + 'static,
    ) -> TemplateId {
        let id = TemplateId(self.templates.len() as u32);
        self.templates.push(Template { name: name.into(), build: Arc::new(build) });
        id
    }

    /// Register a template that inserts a copy of `bundle`.
    pub fn register_bundle<B: Bundle + Clone>(&mut self, name: impl Into<String>, bundle: B) -> TemplateId {
        self.register(name, move |entity| {
            entity.insert(bundle.clone());
        })
    }

    fn get(&self, id: TemplateId) -> Option<&Template> {
        self.templates.get(id.0 as usize)
    }

    /// Name and builder, cloned out so the caller can spawn while the library stays in the world.
    pub fn builder(&self, id: TemplateId) -> Option<(String, TemplateBuilder)> {
        self.get(id).map(|t| (t.name.clone(), Arc::clone(&t.build)))
    }

    pub fn name(&self, id: TemplateId) -> Option<&str> {
        self.get(id).map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
