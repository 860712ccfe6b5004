use serde_json::Value;

use crate::model::{
    asset::Asset,
    factory::ElementFactory,
    layer::Layer,
    raw::{Interceptor, RawRecord, id_field, resolve_image_path, str_field, u32_field},
};

/// Rewrites a resolved image location before it is stored on the asset.
pub type ImagePathProxy = dyn Fn(String) -> String + Send + Sync;

/// Turns raw records of one document into assets and layers.
pub(crate) struct Materializer<'a> {
    pub(crate) base_path: &'a str,
    pub(crate) factory: &'a ElementFactory,
    pub(crate) interceptor: Option<&'a dyn Interceptor>,
    pub(crate) path_proxy: Option<&'a ImagePathProxy>,
}

impl Materializer<'_> {
    fn intercept(&self, record: RawRecord) -> RawRecord {
        match self.interceptor {
            Some(i) => i.intercept(record),
            None => record,
        }
    }

    /// Build one asset. Never fails: missing or mistyped fields are simply absent.
    pub(crate) fn asset(&self, record: RawRecord) -> Asset {
        let record = self.intercept(record);

        let id = id_field(&record, "id");
        let size = u32_field(&record, &["width", "w"]).zip(u32_field(&record, &["height", "h"]));
        let nested = record.get("layers").and_then(Value::as_array).cloned();

        let (image_path, layers) = match nested {
            Some(records) => (None, Some(self.layers(records))),
            None => (self.image_path(&record), None),
        };

        Asset::new(id, image_path, size, layers, record)
    }

    fn image_path(&self, record: &RawRecord) -> Option<String> {
        let authored = str_field(record, &["imagePath"]).or_else(|| {
            let file = str_field(record, &["p"])?;
            let dir = str_field(record, &["u"]).unwrap_or_default();
            Some(format!("{dir}{file}"))
        })?;
        if authored.is_empty() {
            return None;
        }

        let resolved = resolve_image_path(self.base_path, &authored);
        Some(match self.path_proxy {
            Some(proxy) => proxy(resolved),
            None => resolved,
        })
    }

    /// Build one layer, or `None` when the factory does not know its kind.
    pub(crate) fn layer(&self, record: RawRecord) -> Option<Layer> {
        self.factory.create(self.intercept(record))
    }

    /// Build layers in order, dropping unknown kinds.
    pub(crate) fn layers(&self, records: Vec<RawRecord>) -> Vec<Layer> {
        let total = records.len();
        let layers: Vec<Layer> = records.into_iter().filter_map(|r| self.layer(r)).collect();
        if layers.len() < total {
            tracing::debug!(
                dropped = total - layers.len(),
                "skipped layers of unsupported kind"
            );
        }
        layers
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/materialize.rs"]
mod tests;
