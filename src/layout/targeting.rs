use super::LayoutConfig;
use crate::model::{Node, Position};
use crate::store::GraphStore;

/// True when the canvas point lies in `container`'s interior drop area, given
/// the container's absolute position.
fn interior_hit(container: &Node, origin: Position, point: Position, layout: &LayoutConfig) -> bool {
    let subflow = container.subflow();
    let left = origin.x + layout.interior_margin;
    let right = origin.x + subflow.width - layout.interior_margin;
    let top = origin.y + layout.header_height;
    let bottom = top + subflow.height;
    point.x >= left && point.x <= right && point.y >= top && point.y <= bottom
}

/// Resolves the single container that should receive a drop at `point`.
///
/// The deepest loop whose interior contains the point wins; among equally deep
/// loops the one added last (drawn on top) wins. Loops for which `excluded`
/// returns true are skipped.
pub fn container_at(
    store: &GraphStore,
    point: Position,
    layout: &LayoutConfig,
    excluded: impl Fn(&str) -> bool,
) -> Option<String> {
    let mut best: Option<(usize, &Node)> = None;
    for node in store.nodes() {
        if !node.node_type.is_container() || excluded(&node.id) {
            continue;
        }
        let Some(origin) = store.absolute_position(&node.id) else {
            continue;
        };
        if !interior_hit(node, origin, point, layout) {
            continue;
        }
        let depth = store.depth(&node.id);
        if best.is_none_or(|(best_depth, _)| depth >= best_depth) {
            best = Some((depth, node));
        }
    }
    best.map(|(_, node)| node.id.clone())
}
