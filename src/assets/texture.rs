use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Opaque handle to a loaded image.
///
/// Cloning is cheap and clones compare equal: equality is identity of the underlying image, so
/// two assets sharing one fetched path hold equal textures while two separate decodes of the
/// same bytes do not.
#[derive(Clone, Debug)]
pub struct Texture(Arc<PreparedImage>);

impl Texture {
    /// Wrap a decoded image in a new handle.
    pub fn new(image: PreparedImage) -> Self {
        Self(Arc::new(image))
    }

    /// Decoded pixels behind this handle.
    pub fn image(&self) -> &PreparedImage {
        &self.0
    }

    /// `(width, height)` in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.0.width, self.0.height)
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Texture {}
