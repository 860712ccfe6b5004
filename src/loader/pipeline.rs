use std::{fmt, path::PathBuf, sync::Arc};

use crate::{
    assets::{
        cache::TextureCache,
        images::load_images,
        source::{FsImageSource, ImageSource},
    },
    foundation::{
        error::{LoadError, LoadResult},
        opts::LoaderOpts,
    },
    loader::transport::{DocumentTransport, FsTransport},
    model::{
        asset::Asset,
        document::Document,
        factory::ElementFactory,
        materialize::{ImagePathProxy, Materializer},
        raw::{Interceptor, RawDocument, base_path_of},
    },
    resolve::references::resolve_references,
};

/// Loads documents and materializes them into [`Document`] graphs.
///
/// Each load runs four stages in a fixed order:
///
/// 1. instantiate assets (through the interceptor, if any)
/// 2. load textures for image-backed assets as one concurrent batch
/// 3. instantiate layers (through the interceptor, if any), dropping unknown kinds
/// 4. wire layer references against a per-load id index
///
/// The [`TextureCache`] is the only state that outlives a load. Loaders built with
/// [`DocumentLoader::with_cache`] over the same cache never fetch an already loaded path twice.
pub struct DocumentLoader {
    transport: Arc<dyn DocumentTransport>,
    images: Arc<dyn ImageSource>,
    cache: Arc<TextureCache>,
    factory: ElementFactory,
    opts: LoaderOpts,
    path_proxy: Option<Arc<ImagePathProxy>>,
}

impl fmt::Debug for DocumentLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentLoader")
            .field("cached_textures", &self.cache.len())
            .field("factory", &self.factory)
            .field("opts", &self.opts)
            .field("path_proxy", &self.path_proxy.is_some())
            .finish_non_exhaustive()
    }
}

impl DocumentLoader {
    /// Loader over the given collaborators with a fresh cache, built-in layer kinds and default
    /// options.
    pub fn new(transport: Arc<dyn DocumentTransport>, images: Arc<dyn ImageSource>) -> Self {
        Self {
            transport,
            images,
            cache: Arc::new(TextureCache::new()),
            factory: ElementFactory::default(),
            opts: LoaderOpts::default(),
            path_proxy: None,
        }
    }

    /// Loader reading documents and images from the filesystem below `root`.
    pub fn from_fs(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::new(
            Arc::new(FsTransport::new(root.clone())),
            Arc::new(FsImageSource::new(root)),
        )
    }

    /// Use `cache` as the loading context.
    pub fn with_cache(mut self, cache: Arc<TextureCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Use `factory` to build layers.
    pub fn with_factory(mut self, factory: ElementFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Use `opts`.
    pub fn with_opts(mut self, opts: LoaderOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Rewrite every resolved image path (after base-path joining) with `proxy`.
    pub fn with_image_path_proxy<F>(mut self, proxy: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        self.path_proxy = Some(Arc::new(proxy));
        self
    }

    /// Loading context shared by this loader's loads.
    pub fn cache(&self) -> &Arc<TextureCache> {
        &self.cache
    }

    /// Layer registry.
    pub fn factory(&self) -> &ElementFactory {
        &self.factory
    }

    /// Layer registry, for registering custom kinds.
    pub fn factory_mut(&mut self) -> &mut ElementFactory {
        &mut self.factory
    }

    /// Active options.
    pub fn opts(&self) -> &LoaderOpts {
        &self.opts
    }

    /// Fetch the document at `path` and materialize it.
    ///
    /// Relative image paths are resolved against the directory part of `path`.
    #[tracing::instrument(skip(self))]
    pub async fn load_from_path(&self, path: &str) -> LoadResult<Document> {
        self.fetch_and_load(path, None).await
    }

    /// Like [`DocumentLoader::load_from_path`], routing every raw record through `interceptor`.
    ///
    /// Fails with [`LoadError::MissingInterceptor`] before any fetch when `interceptor` is
    /// `None`.
    #[tracing::instrument(skip(self, interceptor))]
    pub async fn load_from_path_with_interceptor(
        &self,
        path: &str,
        interceptor: Option<&dyn Interceptor>,
    ) -> LoadResult<Document> {
        let Some(interceptor) = interceptor else {
            return Err(LoadError::MissingInterceptor);
        };
        self.fetch_and_load(path, Some(interceptor)).await
    }

    /// Materialize an already fetched document body.
    ///
    /// `base_path` is the directory relative image paths are joined onto.
    #[tracing::instrument(
        skip(self, data, interceptor),
        fields(assets = data.assets.len(), layers = data.layers.len())
    )]
    pub async fn load_from_data(
        &self,
        data: RawDocument,
        base_path: &str,
        interceptor: Option<&dyn Interceptor>,
    ) -> LoadResult<Document> {
        let RawDocument {
            assets,
            layers,
            extra,
        } = data;

        let materializer = Materializer {
            base_path,
            factory: &self.factory,
            interceptor,
            path_proxy: self.path_proxy.as_deref(),
        };

        let assets: Vec<Arc<Asset>> = assets
            .into_iter()
            .map(|record| Arc::new(materializer.asset(record)))
            .collect();

        let image_stats = load_images(
            &assets,
            self.images.as_ref(),
            &self.cache,
            self.opts.fetch_concurrency(),
        )
        .await?;
        tracing::debug!(?image_stats, "images loaded");

        let layers = materializer.layers(layers);
        let resolve_stats = resolve_references(&layers, &assets, self.opts.resolve_mode)?;
        tracing::debug!(?resolve_stats, "references resolved");

        Ok(Document::new(assets, layers, extra))
    }

    async fn fetch_and_load(
        &self,
        path: &str,
        interceptor: Option<&dyn Interceptor>,
    ) -> LoadResult<Document> {
        let data = self
            .transport
            .fetch(path)
            .await
            .map_err(|e| LoadError::transport(path, &e))?;
        self.load_from_data(data, base_path_of(path), interceptor).await
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/pipeline.rs"]
mod tests;
