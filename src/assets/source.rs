use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;

use crate::assets::{
    decode::{data_uri_bytes, decode_image},
    texture::Texture,
};

/// Fetches and decodes one image by resolved path.
///
/// The image loader calls this once per distinct uncached path and runs those calls
/// concurrently, so implementations must tolerate parallel use.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Produce the texture for `path`.
    async fn load(&self, path: &str) -> anyhow::Result<Texture>;
}

/// [`ImageSource`] reading files below a root directory.
///
/// Base64 `data:` URIs are decoded in place. Decoding runs on the blocking pool so large images
/// do not stall the async executor.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: PathBuf,
}

impl FsImageSource {
    /// Resolve image paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory image paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ImageSource for FsImageSource {
    async fn load(&self, path: &str) -> anyhow::Result<Texture> {
        let bytes = if path.starts_with("data:") {
            data_uri_bytes(path)?
        } else {
            let full = self.root.join(path);
            tokio::fs::read(&full)
                .await
                .with_context(|| format!("read image bytes from '{}'", full.display()))?
        };

        let image = tokio::task::spawn_blocking(move || decode_image(&bytes))
            .await
            .context("join image decode task")??;
        Ok(Texture::new(image))
    }
}
