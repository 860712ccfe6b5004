use std::collections::HashMap;

use parking_lot::RwLock;

use crate::assets::texture::Texture;

/// Caller-owned loading context: textures already loaded, keyed by resolved image path.
///
/// Share one cache (behind an `Arc`) between loads to avoid refetching images. Reads and
/// writes are internally locked. Loads running concurrently against the same cache do not wait
/// for each other's in-flight fetches; the only guarantee is that a path present in the cache is
/// never fetched again. The first texture stored for a path is kept, so every asset sharing
/// that path ends up with the same handle.
#[derive(Debug, Default)]
pub struct TextureCache {
    textures: RwLock<HashMap<String, Texture>>,
}

impl TextureCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture loaded for `path`.
    pub fn get(&self, path: &str) -> Option<Texture> {
        self.textures.read().get(path).cloned()
    }

    /// Whether `path` has been loaded.
    pub fn contains(&self, path: &str) -> bool {
        self.textures.read().contains_key(path)
    }

    /// Record `texture` for `path` unless one is already present; returns the stored texture.
    pub fn insert(&self, path: impl Into<String>, texture: Texture) -> Texture {
        self.textures
            .write()
            .entry(path.into())
            .or_insert(texture)
            .clone()
    }

    /// Forget `path` so the next load fetches it again.
    pub fn remove(&self, path: &str) -> Option<Texture> {
        self.textures.write().remove(path)
    }

    /// Forget everything.
    pub fn clear(&self) {
        self.textures.write().clear();
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.textures.read().len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.textures.read().is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
