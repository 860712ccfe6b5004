use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    model::{
        asset::Asset,
        layer::{Element, Layer},
    },
    resolve::traverse::{CompositionCycle, walk_layers},
};

/// A fully loaded document.
///
/// Owns its assets; layers (top-level and nested) point back into them through weak links, so
/// dropping the document releases every asset even when compositions reference each other.
#[derive(Debug)]
pub struct Document {
    assets: Vec<Arc<Asset>>,
    layers: Vec<Layer>,
    extra: Map<String, Value>,
}

impl Document {
    pub(crate) fn new(
        assets: Vec<Arc<Asset>>,
        layers: Vec<Layer>,
        extra: Map<String, Value>,
    ) -> Self {
        Self {
            assets,
            layers,
            extra,
        }
    }

    /// Materialized assets, one per raw asset record, in document order.
    pub fn assets(&self) -> &[Arc<Asset>] {
        &self.assets
    }

    /// Materialized top-level layers in document order, unknown kinds removed.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Asset addressed by `id`, with the same last-wins rule reference resolution uses.
    pub fn asset(&self, id: &str) -> Option<&Arc<Asset>> {
        self.assets.iter().rev().find(|a| a.id() == Some(id))
    }

    /// Top-level field of the document body other than `assets`/`layers`.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// All top-level fields other than `assets`/`layers`.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Depth-first walk through layers and nested compositions; see [`walk_layers`].
    pub fn walk_layers(
        &self,
        visit: &mut dyn FnMut(usize, &dyn Element),
    ) -> Vec<CompositionCycle> {
        walk_layers(&self.layers, visit)
    }

    /// Composition reference cycles reachable from the top-level layers.
    pub fn composition_cycles(&self) -> Vec<CompositionCycle> {
        walk_layers(&self.layers, &mut |_, _| {})
    }
}
