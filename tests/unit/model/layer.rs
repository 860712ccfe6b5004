use serde_json::json;

use super::*;

fn asset(id: &str) -> Arc<Asset> {
    Arc::new(Asset::new(
        Some(id.to_string()),
        None,
        None,
        None,
        json!({ "id": id }),
    ))
}

fn map_of(assets: &[Arc<Asset>]) -> AssetMap {
    assets
        .iter()
        .map(|a| (a.id().unwrap().to_string(), a.clone()))
        .collect()
}

#[test]
fn header_reads_long_and_bodymovin_names() {
    let long = LayerHeader::from_record(&json!({
        "name": "bg", "index": 2, "parent": 1, "inPoint": 0.0, "outPoint": 90.0
    }));
    let short = LayerHeader::from_record(&json!({
        "nm": "bg", "ind": 2, "parent": 1, "ip": 0, "op": 90
    }));
    assert_eq!(long, short);
    assert_eq!(long.name.as_deref(), Some("bg"));
    assert_eq!(long.out_point, Some(90.0));

    assert_eq!(LayerHeader::from_record(&json!(null)), LayerHeader::default());
}

#[test]
fn image_layer_binds_through_setup_image() {
    let a1 = asset("a1");
    let map = map_of(&[a1.clone(), asset("a2")]);
    let layer = ImageLayer::from_record(json!({"type": "image", "refId": "a1"}));

    assert!(layer.is_image_type());
    assert!(!layer.is_composition_type());
    assert!(layer.asset().is_none());

    layer.setup_image(&map);
    let bound = layer.asset().unwrap();
    assert!(Arc::ptr_eq(&bound, &a1));
    assert_eq!(bound.id(), Some("a1"));
}

#[test]
fn link_is_weak_and_set_once() {
    let a1 = asset("a1");
    let link = AssetLink::new(Some("a1".to_string()));
    assert!(!link.bind(&AssetMap::new()));
    assert!(!link.is_bound());

    let first = map_of(std::slice::from_ref(&a1));
    assert!(link.bind(&first));

    let replacement = asset("a1");
    let second = map_of(std::slice::from_ref(&replacement));
    assert!(link.bind(&second));
    assert!(Arc::ptr_eq(&link.get().unwrap(), &a1));

    drop(first);
    drop(a1);
    assert!(link.is_bound());
    assert!(link.get().is_none());
}

#[test]
fn composition_layer_exposes_bound_composition_only() {
    let comp = Arc::new(Asset::new(
        Some("comp_0".to_string()),
        None,
        None,
        Some(vec![]),
        json!({"id": "comp_0", "layers": []}),
    ));
    let plain = asset("img");
    let map = map_of(&[comp.clone(), plain]);

    let to_comp =
        CompositionLayer::from_record(json!({"ty": 0, "refId": "comp_0", "w": 100, "h": 50}));
    to_comp.setup_reference(&map);
    assert_eq!(to_comp.size(), Some((100, 50)));
    assert!(Arc::ptr_eq(&to_comp.composition().unwrap(), &comp));

    let to_image = CompositionLayer::from_record(json!({"ty": 0, "refId": "img"}));
    to_image.setup_reference(&map);
    assert!(to_image.asset().is_some());
    assert!(to_image.composition().is_none());
}

#[test]
fn other_kinds_ignore_wiring() {
    let map = map_of(&[asset("a1")]);
    let solid = SolidLayer::from_record(
        json!({"type": "solid", "refId": "a1", "sc": "#ff0000", "sw": 4, "sh": 2}),
    );
    solid.setup_image(&map);
    solid.setup_reference(&map);
    assert!(solid.asset().is_none());
    assert!(solid.reference_id().is_none());
    assert_eq!(solid.color(), Some("#ff0000"));
    assert_eq!(solid.size(), Some((4, 2)));

    let shape = ShapeLayer::from_record(json!({"type": "shape", "shapes": [{"ty": "rc"}]}));
    assert_eq!(shape.shapes().len(), 1);

    let text = TextLayer::from_record(json!({"type": "text", "text": "hello"}));
    assert_eq!(text.text(), Some("hello"));
    assert_eq!(NullLayer::from_record(json!({})).kind(), "null");
}

#[test]
fn boxed_layers_downcast_to_their_kind() {
    let layer: Layer = Box::new(TextLayer::from_record(json!({"text": "hi"})));
    assert_eq!(layer.downcast_ref::<TextLayer>().unwrap().text(), Some("hi"));
    assert!(layer.downcast_ref::<ImageLayer>().is_none());
}
