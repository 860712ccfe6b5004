use std::sync::OnceLock;

use crate::{
    assets::texture::Texture,
    model::{layer::Layer, raw::RawRecord},
};

/// One materialized asset record.
///
/// Image-backed assets carry a resolved `image_path` and receive their [`Texture`] exactly once
/// from the image loader. Composition assets carry their own layer list instead.
#[derive(Debug)]
pub struct Asset {
    id: Option<String>,
    image_path: Option<String>,
    size: Option<(u32, u32)>,
    texture: OnceLock<Texture>,
    layers: Option<Vec<Layer>>,
    record: RawRecord,
}

impl Asset {
    pub(crate) fn new(
        id: Option<String>,
        image_path: Option<String>,
        size: Option<(u32, u32)>,
        layers: Option<Vec<Layer>>,
        record: RawRecord,
    ) -> Self {
        Self {
            id,
            image_path,
            size,
            texture: OnceLock::new(),
            layers,
            record,
        }
    }

    /// Asset id, unique within its document.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Resolved image location, present iff the asset is image-backed.
    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    /// Whether the asset refers to an image file.
    pub fn is_image_backed(&self) -> bool {
        self.image_path.is_some()
    }

    /// Loaded texture, once the image loader has run.
    pub fn texture(&self) -> Option<&Texture> {
        self.texture.get()
    }

    /// Declared pixel size (`w`/`h`).
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Whether this asset is a nested composition.
    pub fn is_composition(&self) -> bool {
        self.layers.is_some()
    }

    /// Layers of a composition asset.
    pub fn composition_layers(&self) -> Option<&[Layer]> {
        self.layers.as_deref()
    }

    /// Raw record (after interception) the asset was built from.
    pub fn record(&self) -> &RawRecord {
        &self.record
    }

    /// Attach the loaded texture. Ignored for assets without an image path and for assets that
    /// already hold one; returns whether `texture` was stored.
    pub(crate) fn assign_texture(&self, texture: Texture) -> bool {
        if self.image_path.is_none() {
            return false;
        }
        self.texture.set(texture).is_ok()
    }
}
