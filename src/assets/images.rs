use std::{collections::HashMap, sync::Arc};

use futures::{StreamExt as _, TryStreamExt as _, stream};

use crate::{
    assets::{cache::TextureCache, source::ImageSource, texture::Texture},
    foundation::error::{LoadError, LoadResult},
    model::asset::Asset,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// What one image batch did.
pub struct ImageLoadStats {
    /// Distinct image paths among the assets.
    pub requested: usize,
    /// Paths fetched from the source in this batch.
    pub fetched: usize,
    /// Paths served from the cache.
    pub reused: usize,
}

/// Load textures for every image-backed asset in `assets`.
///
/// Paths are deduplicated and paths already in `cache` are skipped; the rest are fetched as one
/// concurrent batch of at most `concurrency` in flight. The batch succeeds or fails as a whole:
/// on the first failure nothing is written to the cache and no asset receives a texture from it.
/// On success every asset whose path is cached receives that path's texture.
#[tracing::instrument(skip_all, fields(assets = assets.len()))]
pub async fn load_images(
    assets: &[Arc<Asset>],
    source: &dyn ImageSource,
    cache: &TextureCache,
    concurrency: usize,
) -> LoadResult<ImageLoadStats> {
    let image_assets: Vec<&Arc<Asset>> = assets.iter().filter(|a| a.is_image_backed()).collect();

    // Cached textures are taken once here; assignment never re-reads the cache.
    let mut resolved: HashMap<&str, Option<Texture>> = HashMap::new();
    let mut pending = Vec::new();
    for path in image_assets.iter().filter_map(|a| a.image_path()) {
        if resolved.contains_key(path) {
            continue;
        }
        let cached = cache.get(path);
        if cached.is_none() {
            pending.push(path);
        }
        resolved.insert(path, cached);
    }

    let stats = ImageLoadStats {
        requested: resolved.len(),
        fetched: pending.len(),
        reused: resolved.len() - pending.len(),
    };

    if !pending.is_empty() {
        tracing::debug!(count = pending.len(), "fetching image batch");
        let loaded: Vec<(&str, Texture)> = stream::iter(pending)
            .map(|path| async move {
                source
                    .load(path)
                    .await
                    .map(|texture| (path, texture))
                    .map_err(|e| LoadError::image(path, &e))
            })
            .buffer_unordered(concurrency.max(1))
            .try_collect()
            .await?;

        for (path, texture) in loaded {
            resolved.insert(path, Some(cache.insert(path, texture)));
        }
    }

    for asset in &image_assets {
        let texture = asset
            .image_path()
            .and_then(|p| resolved.get(p))
            .and_then(Option::as_ref);
        if let Some(texture) = texture {
            asset.assign_texture(texture.clone());
        }
    }

    Ok(stats)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/images.rs"]
mod tests;
