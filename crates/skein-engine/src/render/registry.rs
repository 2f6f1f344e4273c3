use std::collections::HashMap;

use crate::backend::Backend;

use super::renderers::Renderer;

/// Tag → renderer map owned by one scene renderer.
pub struct RendererRegistry<B: Backend> {
    renderers: HashMap<String, Box<dyn Renderer<B>>>,
}

impl<B: Backend> RendererRegistry<B> {
    pub fn new() -> Self {
        Self { renderers: HashMap::new() }
    }

    /// Registers `renderer` for `tag`, returning the one it replaces.
    pub fn register(&mut self, tag: impl Into<String>, renderer: Box<dyn Renderer<B>>) -> Option<Box<dyn Renderer<B>>> {
        self.renderers.insert(tag.into(), renderer)
    }

    /// Removes and cleans up the renderer for `tag`. Returns whether one was registered.
    pub fn remove(&mut self, tag: &str) -> bool {
        match self.renderers.remove(tag) {
            Some(mut renderer) => {
                renderer.cleanup();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, tag: &str) -> Option<&dyn Renderer<B>> {
        self.renderers.get(tag).map(|r| &**r)
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.renderers.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn renderers(&self) -> impl Iterator<Item = &dyn Renderer<B>> {
        self.renderers.values().map(|r| &**r)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Cleans up every renderer and empties the registry.
    pub fn clear(&mut self) {
        for (tag, mut renderer) in self.renderers.drain() {
            log::trace!("cleaning up <{tag}> renderer");
            renderer.cleanup();
        }
    }
}

impl<B: Backend> Default for RendererRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}
