use std::sync::{PoisonError, RwLock};

use bevy::{asset::Handle, render::texture::Image, utils::HashMap};

/// Read access to textures that are already loaded, keyed by resolved URL.
pub trait TextureCache: Send + Sync {
    fn lookup(&self, url: &str) -> Option<Handle<Image>>;
}

/// Thread-safe in-memory [`TextureCache`]; the host loader inserts, stages read.
#[derive(Debug, Default)]
pub struct MemoryTextureCache {
    textures: RwLock<HashMap<String, Handle<Image>>>,
}

impl MemoryTextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: impl Into<String>, texture: Handle<Image>) -> Option<Handle<Image>> {
        self.textures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), texture)
    }

    pub fn remove(&self, url: &str) -> Option<Handle<Image>> {
        self.textures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.textures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.textures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TextureCache for MemoryTextureCache {
    fn lookup(&self, url: &str) -> Option<Handle<Image>> {
        self.textures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }
}
