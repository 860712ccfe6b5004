//! Wavyte loader materializes declarative animation documents into in-memory object graphs.
//!
//! A document is a JSON body with an `assets` table (images and nested compositions) and a
//! `layers` list referencing those assets by id. Both bodymovin-style field names (`ty`, `p`/`u`,
//! `nm`, `refId`) and long names (`type`, `imagePath`, `name`) are understood.
//!
//! # Pipeline overview
//!
//! 1. **Assets**: every raw asset record becomes an [`Asset`] (after the optional
//!    [`Interceptor`] has rewritten it); relative image paths are joined onto the document's
//!    directory.
//! 2. **Images**: distinct uncached image paths are fetched and decoded as one concurrent batch
//!    through an [`ImageSource`]; results land in a shared [`TextureCache`].
//! 3. **Layers**: an [`ElementFactory`] turns raw layer records into [`Element`] trait objects;
//!    unknown kinds are dropped.
//! 4. **References**: image and composition layers are wired to their assets through weak
//!    links, so composition cycles never keep a [`Document`] alive.
//!
//! Entry points live on [`DocumentLoader`]: `load_from_path`, `load_from_path_with_interceptor`
//! and `load_from_data`.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;
mod loader;
mod model;
mod resolve;

pub use assets::cache::TextureCache;
pub use assets::decode::{data_uri_bytes, decode_image};
pub use assets::images::{ImageLoadStats, load_images};
pub use assets::source::{FsImageSource, ImageSource};
pub use assets::texture::{PreparedImage, Texture};
pub use foundation::error::{LoadError, LoadResult};
pub use foundation::opts::{LoaderOpts, ResolveMode};
pub use loader::pipeline::DocumentLoader;
pub use loader::transport::{DocumentTransport, FsTransport};
pub use model::asset::Asset;
pub use model::document::Document;
pub use model::factory::{ElementCtor, ElementFactory, discriminant};
pub use model::layer::{
    AssetLink, AssetMap, CompositionLayer, Element, ImageLayer, Layer, LayerHeader, NullLayer,
    ShapeLayer, SolidLayer, TextLayer,
};
pub use model::materialize::ImagePathProxy;
pub use model::raw::{Interceptor, RawDocument, RawRecord, base_path_of, resolve_image_path};
pub use resolve::references::{ResolveStats, build_asset_map, resolve_references};
pub use resolve::traverse::{CompositionCycle, walk_layers};
