use serde_json::{Map, Value};

use crate::foundation::error::{LoadError, LoadResult};

/// One untyped asset or layer record exactly as it appears in the document body.
pub type RawRecord = Value;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// Document body as delivered by a transport.
///
/// Only `assets` and `layers` are interpreted; every other top-level field is carried through to
/// the loaded [`crate::Document`] untouched.
pub struct RawDocument {
    /// Raw asset records, in document order.
    #[serde(default)]
    pub assets: Vec<RawRecord>,
    /// Raw layer records, in document order.
    #[serde(default)]
    pub layers: Vec<RawRecord>,
    /// Remaining top-level fields (frame rate, size, version, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawDocument {
    /// Parse a document body from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> LoadResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| LoadError::serde(format!("parse document JSON: {e}")))
    }

    /// Interpret an already-parsed JSON value as a document body.
    pub fn from_value(value: Value) -> LoadResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| LoadError::serde(format!("interpret document JSON: {e}")))
    }
}

/// Caller hook that rewrites each raw record before it is materialized.
///
/// Invoked once per raw asset record and once per raw layer record (including the layers nested
/// inside composition assets). Whatever it returns is the only version of the record the loader
/// reads.
pub trait Interceptor: Send + Sync {
    /// Transform one raw record.
    fn intercept(&self, record: RawRecord) -> RawRecord;
}

impl<F> Interceptor for F
where
    F: Fn(RawRecord) -> RawRecord + Send + Sync,
{
    fn intercept(&self, record: RawRecord) -> RawRecord {
        self(record)
    }
}

/// Directory part of a document location (`"a/b/doc.json"` -> `"a/b"`, `"/doc.json"` -> `"/"`,
/// `"doc.json"` -> `""`).
pub fn base_path_of(location: &str) -> &str {
    match location.rfind('/') {
        Some(0) => "/",
        Some(idx) => &location[..idx],
        None => "",
    }
}

/// Make a document-relative image path absolute against `base`.
///
/// Absolute paths, URLs and `data:` URIs are returned unchanged, as is everything when `base`
/// is empty.
pub fn resolve_image_path(base: &str, path: &str) -> String {
    if base.is_empty() || is_absolute_location(path) {
        return path.to_string();
    }
    format!("{}/{path}", base.trim_end_matches('/'))
}

fn is_absolute_location(path: &str) -> bool {
    path.starts_with('/') || path.starts_with("data:") || path.contains("://")
}

pub(crate) fn str_field(record: &RawRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| record.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

/// Ids may be authored as strings or numbers; both index the same way.
pub(crate) fn id_field(record: &RawRecord, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn i64_field(record: &RawRecord, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|k| record.get(*k).and_then(Value::as_i64))
}

pub(crate) fn f64_field(record: &RawRecord, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| record.get(*k).and_then(Value::as_f64))
}

pub(crate) fn u32_field(record: &RawRecord, keys: &[&str]) -> Option<u32> {
    keys.iter().find_map(|k| {
        record
            .get(*k)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    })
}

#[cfg(test)]
#[path = "../../tests/unit/model/raw.rs"]
mod tests;
