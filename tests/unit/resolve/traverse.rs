use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::{
    foundation::opts::ResolveMode,
    model::{asset::Asset, factory::ElementFactory},
    resolve::references::resolve_references,
};

fn comp(id: &str, records: Vec<serde_json::Value>) -> Arc<Asset> {
    let factory = ElementFactory::default();
    let layers = records
        .into_iter()
        .filter_map(|r| factory.create(r))
        .collect();
    Arc::new(Asset::new(
        Some(id.to_string()),
        None,
        None,
        Some(layers),
        json!({ "id": id }),
    ))
}

fn top(records: Vec<serde_json::Value>) -> Vec<Layer> {
    let factory = ElementFactory::default();
    records
        .into_iter()
        .filter_map(|r| factory.create(r))
        .collect()
}

#[test]
fn walk_descends_into_bound_compositions_with_depth() {
    let inner = comp("inner", vec![json!({"type": "solid", "nm": "leaf"})]);
    let outer = comp(
        "outer",
        vec![
            json!({"type": "null", "nm": "n"}),
            json!({"type": "composition", "nm": "to_inner", "refId": "inner"}),
        ],
    );
    let layers = top(vec![json!({"type": "composition", "nm": "root", "refId": "outer"})]);
    // Layers only hold weak links, so the assets must outlive the walk.
    let assets = vec![inner, outer];
    resolve_references(&layers, &assets, ResolveMode::Strict).unwrap();

    let mut seen = Vec::new();
    let cycles = walk_layers(&layers, &mut |depth, layer| {
        seen.push((depth, layer.header().name.clone().unwrap()));
    });
    assert!(cycles.is_empty());
    assert_eq!(
        seen,
        vec![
            (0, "root".to_string()),
            (1, "n".to_string()),
            (1, "to_inner".to_string()),
            (2, "leaf".to_string()),
        ]
    );
}

#[test]
fn mutual_recursion_is_reported_not_followed() {
    let a = comp("a", vec![json!({"ty": 0, "refId": "b"})]);
    let b = comp("b", vec![json!({"ty": 0, "refId": "a"})]);
    let layers = top(vec![
        json!({"ty": 0, "refId": "a"}),
        json!({"ty": 0, "refId": "a"}),
    ]);
    let assets = vec![a, b];
    resolve_references(&layers, &assets, ResolveMode::Strict).unwrap();

    let mut visits = 0;
    let cycles = walk_layers(&layers, &mut |_, _| visits += 1);
    // second top-level layer is visited but `a` is not expanded again
    assert_eq!(visits, 4);
    assert_eq!(
        cycles,
        vec![CompositionCycle {
            path: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        }]
    );
}

#[test]
fn unbound_composition_layers_are_leaves() {
    let layers = top(vec![json!({"ty": 0, "refId": "nowhere"})]);
    let mut visits = 0;
    let cycles = walk_layers(&layers, &mut |_, _| visits += 1);
    assert_eq!(visits, 1);
    assert!(cycles.is_empty());
}

#[test]
fn shared_precomps_are_expanded_once_per_walk() {
    // Each level references the next through two layers; a per-instance walk would visit
    // 2 + 4 + 8 + ... layers.
    let depth = 12;
    let mut assets = vec![comp("c0", vec![json!({"type": "solid", "nm": "leaf"})])];
    for i in 1..=depth {
        let child = format!("c{}", i - 1);
        assets.push(comp(
            &format!("c{i}"),
            vec![
                json!({"ty": 0, "refId": child}),
                json!({"ty": 0, "refId": child}),
            ],
        ));
    }
    let layers = top(vec![json!({"ty": 0, "refId": format!("c{depth}")})]);
    resolve_references(&layers, &assets, ResolveMode::Strict).unwrap();

    let mut visits = 0;
    let mut max_depth = 0usize;
    let cycles = walk_layers(&layers, &mut |d, _| {
        visits += 1;
        max_depth = max_depth.max(d);
    });
    assert!(cycles.is_empty());
    // root + two layers per level + the leaf
    assert_eq!(visits, 1 + 2 * depth + 1);
    assert_eq!(max_depth, depth + 1);
}
