//! Keeps each loop's `config.subflow.nodes` / `edges` in step with the store.
//!
//! The mirror is a projection: it is recomputed from the flat store on every
//! structural change and written back in one step, never patched in place.

use crate::model::{Edge, Node};
use crate::store::GraphStore;
use ahash::AHashMap;
use itertools::Itertools;
use tracing::debug;

/// The loop an edge belongs to, if it is scoped to one.
///
/// Entry edges belong to their source loop; edges between two children of the
/// same loop belong to that loop.
pub fn edge_scope(store: &GraphStore, edge: &Edge) -> Option<String> {
    let target_parent = store.node(&edge.target)?.parent_id.as_deref();
    if edge.is_entry() {
        return (target_parent == Some(edge.source.as_str())).then(|| edge.source.clone());
    }
    let source_parent = store.node(&edge.source)?.parent_id.as_deref();
    match (source_parent, target_parent) {
        (Some(s), Some(t)) if s == t => Some(s.to_string()),
        _ => None,
    }
}

/// Children of `loop_id`, de-duplicated by id. A later record with the same id
/// replaces the earlier one but keeps the slot where the id was first seen.
pub fn project_nodes(store: &GraphStore, loop_id: &str) -> Vec<Node> {
    let mut slots: AHashMap<&str, usize> = AHashMap::new();
    let mut nodes: Vec<Node> = Vec::new();
    for child in store.children_of(loop_id) {
        match slots.get(child.id.as_str()) {
            Some(&slot) => nodes[slot] = child.clone(),
            None => {
                slots.insert(child.id.as_str(), nodes.len());
                nodes.push(child.clone());
            }
        }
    }
    nodes
}

/// Edges scoped to `loop_id`, keeping the first edge for each
/// `(source, source_handle, target)` route.
pub fn project_edges(store: &GraphStore, loop_id: &str) -> Vec<Edge> {
    store
        .edges()
        .iter()
        .filter(|e| edge_scope(store, e).as_deref() == Some(loop_id))
        .unique_by(|e| (e.source.clone(), e.source_handle.clone(), e.target.clone()))
        .cloned()
        .collect()
}

/// Recomputes and stores the mirror of a single loop. Returns whether anything
/// changed; a missing or non-loop id is left alone.
pub(crate) fn refresh(store: &mut GraphStore, loop_id: &str) -> Result<bool, serde_json::Error> {
    let nodes = project_nodes(store, loop_id);
    let edges = project_edges(store, loop_id);

    let Some(container) = store.node_mut(loop_id) else {
        return Ok(false);
    };
    if !container.node_type.is_container() {
        return Ok(false);
    }

    let mut subflow = container.subflow();
    if subflow.nodes == nodes && subflow.edges == edges {
        return Ok(false);
    }
    subflow.nodes = nodes;
    subflow.edges = edges;
    subflow.write_into(&mut container.config)?;
    debug!(
        loop_id,
        nodes = subflow.nodes.len(),
        edges = subflow.edges.len(),
        "subflow mirror refreshed"
    );
    Ok(true)
}

/// Refreshes `loop_id` and then every enclosing loop, innermost first, since an
/// outer mirror embeds the inner loop's config.
pub(crate) fn refresh_chain(store: &mut GraphStore, loop_id: &str) -> Result<(), serde_json::Error> {
    refresh(store, loop_id)?;
    for ancestor in store.ancestors_of(loop_id) {
        refresh(store, &ancestor)?;
    }
    Ok(())
}

/// Recomputes every loop mirror in the store, deepest loops first.
pub(crate) fn refresh_all(store: &mut GraphStore) -> Result<(), serde_json::Error> {
    let loops: Vec<(usize, String)> = store
        .nodes()
        .iter()
        .filter(|n| n.node_type.is_container())
        .map(|n| (store.depth(&n.id), n.id.clone()))
        .sorted_by(|a, b| b.0.cmp(&a.0))
        .collect();
    for (_, loop_id) in loops {
        refresh(store, &loop_id)?;
    }
    Ok(())
}
