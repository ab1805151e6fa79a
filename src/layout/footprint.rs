use super::LayoutConfig;
use crate::model::{Node, NodeType, Size};
use serde_json::Map;

/// Effective occupied size of `node`, the basis for all boundary math.
///
/// An explicit `size` wins. Otherwise the estimate follows the node type; the
/// switch and loop estimates read live config, so they track case count and
/// subflow size without any caching.
pub fn estimate_footprint(node: &Node, layout: &LayoutConfig) -> Size {
    if let Some(size) = node.size {
        return size;
    }

    let width = layout.default_node_width;
    match node.node_type {
        NodeType::Switch => {
            let rows = node.case_count() + 1;
            Size::new(
                width,
                layout.switch_row_height + rows as f64 * layout.switch_row_height,
            )
        }
        NodeType::Loop => {
            let subflow = node.subflow();
            Size::new(
                subflow.width,
                layout.header_height + subflow.height + layout.footer_height,
            )
        }
        NodeType::Start => Size::new(width, layout.start_height),
        NodeType::End => Size::new(width, layout.end_height),
        _ => Size::new(width, layout.default_node_height),
    }
}

/// Footprint of a node that does not exist yet, built from its default config.
pub fn estimate_fresh_footprint(
    node_type: NodeType,
    config: &Map<String, serde_json::Value>,
    layout: &LayoutConfig,
) -> Size {
    let probe = Node::new(String::new(), node_type, Default::default()).with_config(config.clone());
    estimate_footprint(&probe, layout)
}
