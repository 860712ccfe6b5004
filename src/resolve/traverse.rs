use std::collections::HashSet;

use crate::model::layer::{Element, Layer};

#[derive(Clone, Debug, PartialEq, Eq)]
/// A chain of composition asset ids that leads back to its first entry.
///
/// `path` starts and ends with the same id, e.g. `["comp_a", "comp_b", "comp_a"]`.
pub struct CompositionCycle {
    /// Asset ids along the cycle.
    pub path: Vec<String>,
}

/// Depth-first walk over `layers`, descending into bound composition assets.
///
/// `visit` receives each layer with its nesting depth (top level is `0`). Each composition asset
/// is expanded at most once per walk: later layers referencing it are visited themselves but not
/// descended into again, so shared precomps cost one expansion however often they are reused. A
/// composition already on the current descent path is not entered again; each such back edge is
/// returned once as a [`CompositionCycle`].
pub fn walk_layers(
    layers: &[Layer],
    visit: &mut dyn FnMut(usize, &dyn Element),
) -> Vec<CompositionCycle> {
    let mut state = WalkState::default();
    walk(layers, 0, &mut state, visit);
    state.cycles
}

#[derive(Default)]
struct WalkState {
    stack: Vec<String>,
    expanded: HashSet<String>,
    cycles: Vec<CompositionCycle>,
}

fn walk(
    layers: &[Layer],
    depth: usize,
    state: &mut WalkState,
    visit: &mut dyn FnMut(usize, &dyn Element),
) {
    for layer in layers {
        visit(depth, layer.as_ref());
        if !layer.is_composition_type() {
            continue;
        }

        let Some(asset) = layer.asset() else {
            continue;
        };
        let (Some(id), Some(nested)) = (asset.id(), asset.composition_layers()) else {
            continue;
        };

        if let Some(pos) = state.stack.iter().position(|s| s == id) {
            let mut path = state.stack[pos..].to_vec();
            path.push(id.to_string());
            let cycle = CompositionCycle { path };
            if !state.cycles.contains(&cycle) {
                state.cycles.push(cycle);
            }
            continue;
        }
        if !state.expanded.insert(id.to_string()) {
            continue;
        }

        state.stack.push(id.to_string());
        walk(nested, depth + 1, state, visit);
        state.stack.pop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resolve/traverse.rs"]
mod tests;
