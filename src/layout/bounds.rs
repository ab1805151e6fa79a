use super::{LayoutConfig, estimate_footprint};
use crate::model::{Node, Position, Size};
use crate::store::GraphStore;

/// Legal range for a child's position inside one container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChildBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl ChildBounds {
    pub fn contains(&self, position: Position) -> bool {
        let x = position.x >= self.min_x && position.x <= self.max_x.max(self.min_x);
        let y = position.y >= self.min_y && position.y <= self.max_y.max(self.min_y);
        x && y
    }
}

/// Size of a loop's interior drop area: its subflow width minus the side
/// margins, and its subflow height.
pub fn interior_size(container: &Node, layout: &LayoutConfig) -> Size {
    let subflow = container.subflow();
    Size::new(
        subflow.width - 2.0 * layout.interior_margin,
        subflow.height,
    )
}

/// Bounds for a child of `footprint` inside an interior of `interior` size.
pub fn child_bounds(interior: Size, footprint: Size, layout: &LayoutConfig) -> ChildBounds {
    let pad = layout.boundary_padding;
    ChildBounds {
        min_x: pad + layout.inset_x,
        max_x: interior.width - footprint.width - pad - layout.inset_x,
        min_y: pad + layout.header_height,
        max_y: interior.height - footprint.height - pad + layout.header_height,
    }
}

/// Clamps both axes independently. When a container is too small for the
/// child, the minimum wins so the range never inverts.
pub fn clamp_child_position(
    interior: Size,
    footprint: Size,
    proposed: Position,
    layout: &LayoutConfig,
) -> Position {
    let b = child_bounds(interior, footprint, layout);
    Position::new(
        proposed.x.min(b.max_x).max(b.min_x),
        proposed.y.min(b.max_y).max(b.min_y),
    )
}

/// Clamps `node` into `container`, using the container's current interior.
pub fn clamp_into(container: &Node, node: &Node, proposed: Position, layout: &LayoutConfig) -> Position {
    clamp_child_position(
        interior_size(container, layout),
        estimate_footprint(node, layout),
        proposed,
        layout,
    )
}

/// Smallest subflow size that still holds every current child of `parent_id`
/// with padding, floored at the configured container minimum.
pub fn required_container_size(store: &GraphStore, parent_id: &str, layout: &LayoutConfig) -> Size {
    let pad = layout.boundary_padding;
    store
        .children_of(parent_id)
        .map(|child| {
            let footprint = estimate_footprint(child, layout);
            Size::new(
                child.position.x + footprint.width + pad,
                child.position.y + footprint.height + pad,
            )
        })
        .fold(layout.min_container_size(), Size::max)
}
