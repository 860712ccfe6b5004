use serde_json::json;

use super::*;
use crate::model::factory::ElementFactory;

fn image_asset(id: &str) -> Arc<Asset> {
    Arc::new(Asset::new(
        Some(id.to_string()),
        Some(format!("dir/{id}.png")),
        None,
        None,
        json!({ "id": id }),
    ))
}

fn layers(records: Vec<serde_json::Value>) -> Vec<Layer> {
    let factory = ElementFactory::default();
    records
        .into_iter()
        .filter_map(|r| factory.create(r))
        .collect()
}

#[test]
fn asset_map_skips_anonymous_assets_and_keeps_last_duplicate() {
    let first = image_asset("a");
    let second = image_asset("a");
    let anonymous = Arc::new(Asset::new(None, None, None, None, json!({})));
    let map = build_asset_map(&[first, second.clone(), anonymous]);
    assert_eq!(map.len(), 1);
    assert!(Arc::ptr_eq(&map["a"], &second));
}

#[test]
fn image_and_composition_layers_are_wired() {
    let a1 = image_asset("a1");
    let comp = Arc::new(Asset::new(
        Some("comp".to_string()),
        None,
        None,
        Some(layers(vec![json!({"type": "image", "refId": "a1"})])),
        json!({"id": "comp"}),
    ));
    let assets = vec![a1.clone(), comp.clone()];
    let top = layers(vec![
        json!({"type": "image", "refId": "a1"}),
        json!({"type": "composition", "refId": "comp"}),
        json!({"type": "solid"}),
    ]);

    let stats = resolve_references(&top, &assets, ResolveMode::Lenient).unwrap();
    assert_eq!(stats, ResolveStats { bound: 3, dangling: 0 });

    assert!(Arc::ptr_eq(&top[0].asset().unwrap(), &a1));
    assert!(Arc::ptr_eq(&top[1].asset().unwrap(), &comp));
    assert!(top[2].asset().is_none());

    let nested = &comp.composition_layers().unwrap()[0];
    assert!(Arc::ptr_eq(&nested.asset().unwrap(), &a1));
}

#[test]
fn lenient_mode_leaves_dangling_links_unset() {
    let assets = vec![image_asset("a1")];
    let top = layers(vec![
        json!({"type": "image", "refId": "missing"}),
        json!({"type": "composition"}),
        json!({"type": "image", "refId": "a1"}),
    ]);
    let stats = resolve_references(&top, &assets, ResolveMode::Lenient).unwrap();
    assert_eq!(stats, ResolveStats { bound: 1, dangling: 2 });
    assert!(top[0].asset().is_none());
    assert!(top[1].asset().is_none());
    assert!(top[2].asset().is_some());
}

#[test]
fn strict_mode_rejects_the_first_dangling_reference() {
    let assets = vec![image_asset("a1")];
    let top = layers(vec![
        json!({"type": "image", "refId": "a1"}),
        json!({"type": "image", "refId": "ghost"}),
    ]);
    let err = resolve_references(&top, &assets, ResolveMode::Strict).unwrap_err();
    match err {
        LoadError::DanglingReference { kind, ref_id } => {
            assert_eq!(kind, "image");
            assert_eq!(ref_id, "ghost");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn self_referencing_composition_resolves_once() {
    let comp = Arc::new(Asset::new(
        Some("loop".to_string()),
        None,
        None,
        Some(layers(vec![json!({"ty": 0, "refId": "loop"})])),
        json!({"id": "loop"}),
    ));
    let top = layers(vec![json!({"ty": 0, "refId": "loop"})]);
    let stats = resolve_references(&top, std::slice::from_ref(&comp), ResolveMode::Strict).unwrap();
    assert_eq!(stats.bound, 2);

    let inner = &comp.composition_layers().unwrap()[0];
    assert!(Arc::ptr_eq(&inner.asset().unwrap(), &comp));
}
