use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;

use crate::model::{
    layer::{CompositionLayer, ImageLayer, Layer, NullLayer, ShapeLayer, SolidLayer, TextLayer},
    raw::RawRecord,
};

/// Constructor registered for one layer discriminant.
pub type ElementCtor = Arc<dyn Fn(RawRecord) -> Layer + Send + Sync>;

/// Numeric bodymovin layer types and the discriminant each maps to.
const BODYMOVIN_KINDS: [(i64, &str); 6] = [
    (0, "composition"),
    (1, "solid"),
    (2, "image"),
    (3, "null"),
    (4, "shape"),
    (5, "text"),
];

/// Registry turning raw layer records into typed layers.
///
/// Records whose discriminant has no registered constructor produce no layer. Custom kinds can
/// be registered (or built-ins overridden) without touching reference resolution, which only
/// talks to [`crate::Element`].
#[derive(Clone)]
pub struct ElementFactory {
    ctors: HashMap<String, ElementCtor>,
}

impl Default for ElementFactory {
    fn default() -> Self {
        Self::with_builtin_kinds()
    }
}

impl fmt::Debug for ElementFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementFactory")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl ElementFactory {
    /// Factory that recognises nothing.
    pub fn empty() -> Self {
        Self {
            ctors: HashMap::new(),
        }
    }

    /// Factory for `image`, `composition`, `solid`, `shape`, `text` and `null`.
    pub fn with_builtin_kinds() -> Self {
        let mut out = Self::empty();
        out.register("image", |r| Box::new(ImageLayer::from_record(r)) as Layer);
        out.register("composition", |r| Box::new(CompositionLayer::from_record(r)) as Layer);
        out.register("solid", |r| Box::new(SolidLayer::from_record(r)) as Layer);
        out.register("shape", |r| Box::new(ShapeLayer::from_record(r)) as Layer);
        out.register("text", |r| Box::new(TextLayer::from_record(r)) as Layer);
        out.register("null", |r| Box::new(NullLayer::from_record(r)) as Layer);
        out
    }

    /// Register `ctor` for `kind`, returning the constructor it replaced.
    pub fn register<F>(&mut self, kind: impl Into<String>, ctor: F) -> Option<ElementCtor>
    where
        F: Fn(RawRecord) -> Layer + Send + Sync + 'static,
    {
        self.ctors.insert(kind.into(), Arc::new(ctor))
    }

    /// Whether `kind` has a constructor.
    pub fn supports(&self, kind: &str) -> bool {
        self.ctors.contains_key(kind)
    }

    /// Registered discriminants, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.ctors.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Build the layer for `record`, or `None` when its kind is unknown.
    pub fn create(&self, record: RawRecord) -> Option<Layer> {
        let kind = discriminant(&record)?;
        let ctor = self.ctors.get(&kind)?;
        Some(ctor(record))
    }
}

/// Discriminant of a raw layer record.
///
/// A string `type` wins; otherwise a numeric bodymovin `ty` is mapped onto the built-in names,
/// and unmapped numbers come back as their decimal text so they can still be registered.
pub fn discriminant(record: &RawRecord) -> Option<String> {
    if let Some(kind) = record.get("type").and_then(Value::as_str) {
        return Some(kind.to_string());
    }
    let ty = record.get("ty").and_then(Value::as_i64)?;
    let mapped = BODYMOVIN_KINDS
        .iter()
        .find(|(n, _)| *n == ty)
        .map(|(_, name)| (*name).to_string());
    Some(mapped.unwrap_or_else(|| ty.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/model/factory.rs"]
mod tests;
