use std::sync::Arc;

use crate::{
    foundation::{
        error::{LoadError, LoadResult},
        opts::ResolveMode,
    },
    model::{
        asset::Asset,
        layer::{AssetMap, Layer},
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Outcome counters of one resolution pass.
pub struct ResolveStats {
    /// Layers whose reference was wired.
    pub bound: usize,
    /// Asset-backed or composition-backed layers whose id matched no asset.
    pub dangling: usize,
}

/// Index assets by id. Assets without an id are not addressable; on duplicate ids the later
/// asset wins.
pub fn build_asset_map(assets: &[Arc<Asset>]) -> AssetMap {
    let mut map = AssetMap::with_capacity(assets.len());
    for asset in assets {
        let Some(id) = asset.id() else {
            continue;
        };
        if map.insert(id.to_string(), asset.clone()).is_some() {
            tracing::warn!(asset_id = id, "duplicate asset id, later asset wins");
        }
    }
    map
}

/// Wire every asset-backed and composition-backed layer to its asset.
///
/// `layers` are resolved in order, followed by the layers nested in each composition asset
/// (each asset once, so self-referencing compositions terminate). All lookups go through a
/// single map built before the first layer is touched.
pub fn resolve_references(
    layers: &[Layer],
    assets: &[Arc<Asset>],
    mode: ResolveMode,
) -> LoadResult<ResolveStats> {
    let map = build_asset_map(assets);
    let mut stats = ResolveStats::default();

    resolve_pass(layers, &map, mode, &mut stats)?;
    for asset in assets {
        if let Some(nested) = asset.composition_layers() {
            resolve_pass(nested, &map, mode, &mut stats)?;
        }
    }

    Ok(stats)
}

fn resolve_pass(
    layers: &[Layer],
    map: &AssetMap,
    mode: ResolveMode,
    stats: &mut ResolveStats,
) -> LoadResult<()> {
    for layer in layers {
        let composition = layer.is_composition_type();
        if !composition && !layer.is_image_type() {
            continue;
        }

        let ref_id = layer.reference_id();
        if !ref_id.is_some_and(|id| map.contains_key(id)) {
            let ref_id = ref_id.unwrap_or_default();
            if mode == ResolveMode::Strict {
                return Err(LoadError::DanglingReference {
                    kind: layer.kind().to_string(),
                    ref_id: ref_id.to_string(),
                });
            }
            tracing::warn!(kind = layer.kind(), ref_id, "layer references unknown asset");
            stats.dangling += 1;
            continue;
        }

        if composition {
            layer.setup_reference(map);
        } else {
            layer.setup_image(map);
        }
        stats.bound += 1;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/references.rs"]
mod tests;
