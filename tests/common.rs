//! Common test utilities for building editors and workflow documents.
use flowcanvas::layout::{ChildBounds, child_bounds, estimate_footprint, interior_size};
use flowcanvas::prelude::*;
use serde_json::json;

/// An editor with the built-in templates and default layout.
#[allow(dead_code)]
pub fn editor() -> GraphEditor {
    GraphEditor::new()
}

/// Start, a root loop at the origin and an end node, with the loop's id.
#[allow(dead_code)]
pub fn editor_with_loop() -> (GraphEditor, String) {
    let mut editor = editor();
    editor
        .add_node(NodeType::Start, Position::new(-300.0, 0.0), None)
        .expect("start");
    let lp = editor
        .add_node(NodeType::Loop, Position::new(0.0, 0.0), None)
        .expect("loop");
    editor
        .add_node(NodeType::End, Position::new(600.0, 0.0), None)
        .expect("end");
    (editor, lp.id)
}

/// Adds a node of `node_type` inside `parent` at `position`, returning its id.
#[allow(dead_code)]
pub fn add_child(editor: &mut GraphEditor, parent: &str, node_type: NodeType, position: Position) -> String {
    editor
        .add_node(node_type, position, Some(parent))
        .expect("child added")
        .id
}

/// Current clamp bounds for `child_id` inside its parent.
#[allow(dead_code)]
pub fn bounds_of(editor: &GraphEditor, child_id: &str) -> ChildBounds {
    let child = editor.node(child_id).expect("child exists");
    let parent_id = child.parent_id.as_deref().expect("child has a parent");
    let parent = editor.node(parent_id).expect("parent exists");
    child_bounds(
        interior_size(parent, editor.layout()),
        estimate_footprint(child, editor.layout()),
        editor.layout(),
    )
}

/// Ids listed in a loop's `config.subflow.nodes`, in mirror order.
#[allow(dead_code)]
pub fn mirrored_node_ids(editor: &GraphEditor, loop_id: &str) -> Vec<String> {
    editor
        .node(loop_id)
        .expect("loop exists")
        .subflow()
        .nodes
        .into_iter()
        .map(|n| n.id)
        .collect()
}

/// `(source, sourceHandle, target)` triples in a loop's `config.subflow.edges`.
#[allow(dead_code)]
pub fn mirrored_routes(editor: &GraphEditor, loop_id: &str) -> Vec<(String, Option<String>, String)> {
    editor
        .node(loop_id)
        .expect("loop exists")
        .subflow()
        .edges
        .into_iter()
        .map(|e| (e.source, e.source_handle, e.target))
        .collect()
}

/// A small, well-formed document: start -> loop -> end, with one HTTP node
/// in the loop body wired from the entry port.
#[allow(dead_code)]
pub const SIMPLE_WORKFLOW_JSON: &str = r#"{
  "name": "Order sync",
  "version": 1,
  "nodes": [
    { "id": "start", "type": "START", "position": { "x": 0, "y": 0 }, "label": "Start" },
    {
      "id": "loop",
      "type": "LOOP",
      "position": { "x": 0, "y": 120 },
      "label": "Loop",
      "config": {
        "mode": "WHILE",
        "subflow": { "width": 320, "height": 154, "nodes": [], "edges": [] }
      }
    },
    {
      "id": "fetch",
      "type": "HTTP",
      "position": { "x": 40, "y": 60 },
      "parentId": "loop",
      "label": "HTTP",
      "config": { "url": "https://example.com/orders", "method": "GET" }
    },
    { "id": "end", "type": "END", "position": { "x": 0, "y": 500 }, "label": "End" }
  ],
  "edges": [
    { "id": "e1", "source": "start", "target": "loop" },
    { "id": "e2", "source": "loop", "target": "fetch", "sourceHandle": "entry-out" },
    { "id": "e3", "source": "loop", "target": "end" }
  ]
}"#;

/// A raw node value for hand-built documents.
#[allow(dead_code)]
pub fn raw_node(id: &str, node_type: &str, parent: Option<&str>) -> serde_json::Value {
    let mut node = json!({
        "id": id,
        "type": node_type,
        "position": { "x": 40, "y": 60 }
    });
    if let Some(parent) = parent {
        node["parentId"] = json!(parent);
    }
    node
}
