use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock, Weak},
};

use crate::model::{
    asset::Asset,
    raw::{RawRecord, f64_field, i64_field, id_field, str_field, u32_field},
};

/// Per-load index from asset id to the materialized asset.
pub type AssetMap = HashMap<String, Arc<Asset>>;

/// A materialized layer.
pub type Layer = Box<dyn Element>;

/// Capability set every layer kind exposes to the loader.
///
/// Only the reference-wiring surface matters here; visual behaviour belongs to whoever renders
/// the document. Implementations must be safe to wire through `&self` because layers nested in
/// composition assets are only reachable through a shared [`Asset`].
pub trait Element: fmt::Debug + Send + Sync + Any {
    /// Discriminant this layer was created from (`"image"`, `"composition"`, ...).
    fn kind(&self) -> &str;

    /// Fields shared by every layer kind.
    fn header(&self) -> &LayerHeader;

    /// Raw record (after interception) the layer was built from.
    fn record(&self) -> &RawRecord;

    /// Whether this layer renders a nested composition asset.
    fn is_composition_type(&self) -> bool {
        false
    }

    /// Whether this layer renders an image asset.
    fn is_image_type(&self) -> bool {
        false
    }

    /// Asset id this layer asks for, if any.
    fn reference_id(&self) -> Option<&str> {
        None
    }

    /// Bind the referenced composition asset.
    fn setup_reference(&self, _assets: &AssetMap) {}

    /// Bind the referenced image asset.
    fn setup_image(&self, _assets: &AssetMap) {}

    /// Live referenced asset once wiring has happened.
    fn asset(&self) -> Option<Arc<Asset>> {
        None
    }
}

impl dyn Element {
    /// Downcast to a concrete layer kind.
    pub fn downcast_ref<T: Element>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Fields common to all layer kinds. Both long names and bodymovin short names are accepted.
pub struct LayerHeader {
    /// `name` / `nm`.
    pub name: Option<String>,
    /// `index` / `ind`.
    pub index: Option<i64>,
    /// `parent`.
    pub parent: Option<i64>,
    /// `inPoint` / `ip`, in frames.
    pub in_point: Option<f64>,
    /// `outPoint` / `op`, in frames.
    pub out_point: Option<f64>,
}

impl LayerHeader {
    /// Read the common fields; absent or mistyped fields stay `None`.
    pub fn from_record(record: &RawRecord) -> Self {
        Self {
            name: str_field(record, &["name", "nm"]),
            index: i64_field(record, &["index", "ind"]),
            parent: i64_field(record, &["parent"]),
            in_point: f64_field(record, &["inPoint", "ip"]),
            out_point: f64_field(record, &["outPoint", "op"]),
        }
    }
}

/// Non-owning, set-once link from a layer to the asset it references.
#[derive(Debug, Default)]
pub struct AssetLink {
    ref_id: Option<String>,
    target: OnceLock<Weak<Asset>>,
}

impl AssetLink {
    /// Link that will look up `ref_id` when bound.
    pub fn new(ref_id: Option<String>) -> Self {
        Self {
            ref_id,
            target: OnceLock::new(),
        }
    }

    /// Link reading its id from the record's `refId`.
    pub fn from_record(record: &RawRecord) -> Self {
        Self::new(id_field(record, "refId"))
    }

    /// Referenced asset id.
    pub fn ref_id(&self) -> Option<&str> {
        self.ref_id.as_deref()
    }

    /// Look the id up in `assets` and remember the hit. Returns whether the link is bound.
    ///
    /// A link binds at most once; later calls keep the first target.
    pub fn bind(&self, assets: &AssetMap) -> bool {
        let Some(asset) = self.ref_id.as_deref().and_then(|id| assets.get(id)) else {
            return self.target.get().is_some();
        };
        let _ = self.target.set(Arc::downgrade(asset));
        true
    }

    /// Referenced asset, while the owning document is alive.
    pub fn get(&self) -> Option<Arc<Asset>> {
        self.target.get().and_then(Weak::upgrade)
    }

    /// Whether [`AssetLink::bind`] has found the target.
    pub fn is_bound(&self) -> bool {
        self.target.get().is_some()
    }
}

#[derive(Debug)]
/// Layer that draws an image asset.
pub struct ImageLayer {
    header: LayerHeader,
    link: AssetLink,
    record: RawRecord,
}

impl ImageLayer {
    /// Build from a raw `image` record.
    pub fn from_record(record: RawRecord) -> Self {
        Self {
            header: LayerHeader::from_record(&record),
            link: AssetLink::from_record(&record),
            record,
        }
    }

    /// Link to the image asset.
    pub fn link(&self) -> &AssetLink {
        &self.link
    }
}

impl Element for ImageLayer {
    fn kind(&self) -> &str {
        "image"
    }

    fn header(&self) -> &LayerHeader {
        &self.header
    }

    fn record(&self) -> &RawRecord {
        &self.record
    }

    fn is_image_type(&self) -> bool {
        true
    }

    fn reference_id(&self) -> Option<&str> {
        self.link.ref_id()
    }

    fn setup_image(&self, assets: &AssetMap) {
        self.link.bind(assets);
    }

    fn asset(&self) -> Option<Arc<Asset>> {
        self.link.get()
    }
}

#[derive(Debug)]
/// Layer that plays a nested composition asset.
pub struct CompositionLayer {
    header: LayerHeader,
    link: AssetLink,
    size: Option<(u32, u32)>,
    record: RawRecord,
}

impl CompositionLayer {
    /// Build from a raw `composition` record.
    pub fn from_record(record: RawRecord) -> Self {
        let size = u32_field(&record, &["width", "w"]).zip(u32_field(&record, &["height", "h"]));
        Self {
            header: LayerHeader::from_record(&record),
            link: AssetLink::from_record(&record),
            size,
            record,
        }
    }

    /// Link to the composition asset.
    pub fn link(&self) -> &AssetLink {
        &self.link
    }

    /// Viewport size the nested composition is clipped to, if declared.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    /// Bound asset, when it actually carries a composition payload.
    pub fn composition(&self) -> Option<Arc<Asset>> {
        self.link.get().filter(|a| a.is_composition())
    }
}

impl Element for CompositionLayer {
    fn kind(&self) -> &str {
        "composition"
    }

    fn header(&self) -> &LayerHeader {
        &self.header
    }

    fn record(&self) -> &RawRecord {
        &self.record
    }

    fn is_composition_type(&self) -> bool {
        true
    }

    fn reference_id(&self) -> Option<&str> {
        self.link.ref_id()
    }

    fn setup_reference(&self, assets: &AssetMap) {
        self.link.bind(assets);
    }

    fn asset(&self) -> Option<Arc<Asset>> {
        self.link.get()
    }
}

#[derive(Debug)]
/// Flat-colour rectangle.
pub struct SolidLayer {
    header: LayerHeader,
    color: Option<String>,
    size: Option<(u32, u32)>,
    record: RawRecord,
}

impl SolidLayer {
    /// Build from a raw `solid` record.
    pub fn from_record(record: RawRecord) -> Self {
        let size =
            u32_field(&record, &["width", "sw"]).zip(u32_field(&record, &["height", "sh"]));
        Self {
            header: LayerHeader::from_record(&record),
            color: str_field(&record, &["color", "sc"]),
            size,
            record,
        }
    }

    /// Colour string as authored (e.g. `#ff0000`).
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Declared size.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }
}

impl Element for SolidLayer {
    fn kind(&self) -> &str {
        "solid"
    }

    fn header(&self) -> &LayerHeader {
        &self.header
    }

    fn record(&self) -> &RawRecord {
        &self.record
    }
}

#[derive(Debug)]
/// Vector shape layer; shape data stays raw.
pub struct ShapeLayer {
    header: LayerHeader,
    record: RawRecord,
}

impl ShapeLayer {
    /// Build from a raw `shape` record.
    pub fn from_record(record: RawRecord) -> Self {
        Self {
            header: LayerHeader::from_record(&record),
            record,
        }
    }

    /// Raw `shapes` array.
    pub fn shapes(&self) -> &[RawRecord] {
        self.record
            .get("shapes")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Element for ShapeLayer {
    fn kind(&self) -> &str {
        "shape"
    }

    fn header(&self) -> &LayerHeader {
        &self.header
    }

    fn record(&self) -> &RawRecord {
        &self.record
    }
}

#[derive(Debug)]
/// Text layer.
pub struct TextLayer {
    header: LayerHeader,
    text: Option<String>,
    record: RawRecord,
}

impl TextLayer {
    /// Build from a raw `text` record.
    pub fn from_record(record: RawRecord) -> Self {
        Self {
            header: LayerHeader::from_record(&record),
            text: str_field(&record, &["text"]),
            record,
        }
    }

    /// Plain text, when authored as a string. Bodymovin text documents stay in [`Element::record`].
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Element for TextLayer {
    fn kind(&self) -> &str {
        "text"
    }

    fn header(&self) -> &LayerHeader {
        &self.header
    }

    fn record(&self) -> &RawRecord {
        &self.record
    }
}

#[derive(Debug)]
/// Invisible transform parent.
pub struct NullLayer {
    header: LayerHeader,
    record: RawRecord,
}

impl NullLayer {
    /// Build from a raw `null` record.
    pub fn from_record(record: RawRecord) -> Self {
        Self {
            header: LayerHeader::from_record(&record),
            record,
        }
    }
}

impl Element for NullLayer {
    fn kind(&self) -> &str {
        "null"
    }

    fn header(&self) -> &LayerHeader {
        &self.header
    }

    fn record(&self) -> &RawRecord {
        &self.record
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/layer.rs"]
mod tests;
