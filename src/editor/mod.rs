//! The graph mutation API.
//!
//! [`GraphEditor`] owns the store and is the only writer. Every operation runs
//! to completion as one state transition: containment is clamped, edges are
//! validated and the affected loop mirrors are recomputed before it returns.

mod builder;
mod drag;
mod drop;
mod notice;
mod selection;

pub use builder::EditorBuilder;
pub use drag::{DragOutcome, DragState};
pub use drop::{DropEvent, DropOutcome};
pub use notice::{DEFAULT_NOTICE_DURATION, Notice, NoticeBoard, NoticeKind};
pub use selection::Selection;

use crate::connection::validate_connection;
use crate::error::{EditorError, ImportError};
use crate::id::new_id;
use crate::layout::{LayoutConfig, clamp_into, required_container_size};
use crate::mirror;
use crate::model::{
    Connection, Edge, Node, NodeType, Position, SUBFLOW_KEY, Size, Workflow, case_handle,
};
use crate::store::GraphStore;
use crate::templates::ConfigProvider;
use crate::validation::{self, ValidationIssue};
use ahash::AHashSet;
use itertools::Itertools;
use serde_json::{Map, Value, json};
use std::time::Instant;
use tracing::{debug, warn};

/// What the properties panel should show for a node.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Ready {
        node_id: String,
        node_type: NodeType,
        label: Option<String>,
        config: Map<String, Value>,
        doc_path: String,
    },
    /// The config provider has no template for this type; the panel shows a
    /// placeholder instead of a form.
    ConfigurationMissing { node_id: String, node_type: NodeType },
}

/// Single entry point for every graph mutation.
pub struct GraphEditor {
    name: String,
    version: u32,
    store: GraphStore,
    layout: LayoutConfig,
    provider: Box<dyn ConfigProvider>,
    selection: Selection,
    drag: DragState,
    drops: drop::DropDispatcher,
    notices: NoticeBoard,
}

impl Default for GraphEditor {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GraphEditor {
    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.store.node(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.node.as_deref().and_then(|id| self.store.node(id))
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.dismiss();
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    // --- Nodes ---

    /// Creates a node of `node_type` with a fresh id and a private copy of the
    /// type's default config.
    ///
    /// With a parent, the position is clamped into the parent's interior. At
    /// root scope a second start or end node is refused.
    pub fn add_node(
        &mut self,
        node_type: NodeType,
        position: Position,
        parent_id: Option<&str>,
    ) -> Result<Node, EditorError> {
        ensure_finite(position)?;
        let mut node = Node::new(new_id(), node_type, position);
        node.label = Some(node_type.default_label().to_string());
        node.config = self.provider.default_config(node_type).unwrap_or_default();

        match parent_id {
            Some(pid) => {
                let container = self.container(pid)?;
                node.position = clamp_into(container, &node, position, &self.layout);
                node.parent_id = Some(pid.to_string());
            }
            None => self.ensure_unique_root(node_type)?,
        }

        debug!(
            node_id = %node.id,
            node_type = %node_type,
            parent_id = ?parent_id,
            x = node.position.x,
            y = node.position.y,
            "node added"
        );
        self.store.push_node(node.clone());
        if let Some(pid) = parent_id {
            mirror::refresh_chain(&mut self.store, pid)?;
        }
        Ok(node)
    }

    /// Moves a node. Children of a loop are clamped into its interior; root
    /// nodes go exactly where asked. Returns the committed position.
    pub fn move_node(&mut self, id: &str, proposed: Position) -> Result<Position, EditorError> {
        let node = self.existing(id)?;
        ensure_finite(proposed)?;
        let parent_id = node.parent_id.clone();
        let committed = match parent_id.as_deref().and_then(|pid| self.store.node(pid)) {
            Some(parent) => clamp_into(parent, node, proposed, &self.layout),
            None => proposed,
        };

        if let Some(node) = self.store.node_mut(id) {
            node.position = committed;
        }
        if let Some(pid) = parent_id {
            mirror::refresh_chain(&mut self.store, &pid)?;
        }
        Ok(committed)
    }

    /// Resizes a loop's interior. The request is raised to what the current
    /// children need and to the configured minimum, never lowered; children
    /// are then pulled back inside the new bounds. Returns the committed size.
    ///
    /// A non-finite component of the request keeps the current value.
    pub fn resize_container(&mut self, id: &str, proposed: Size) -> Result<Size, EditorError> {
        let current = self.container(id)?.subflow().size();
        let required = required_container_size(&self.store, id, &self.layout);
        let mut committed = proposed
            .or_finite(current)
            .max(required)
            .max(self.layout.min_container_size());
        self.set_subflow_size(id, committed)?;
        let moved = self.reclamp_children(id);

        // Children pinned to the minimum inset can need more room than before.
        let settled = required_container_size(&self.store, id, &self.layout);
        if settled.width > committed.width || settled.height > committed.height {
            committed = committed.max(settled);
            self.set_subflow_size(id, committed)?;
        }

        self.reclamp_in_parent(id);
        mirror::refresh_chain(&mut self.store, id)?;
        debug!(
            node_id = id,
            width = committed.width,
            height = committed.height,
            children_moved = moved,
            "container resized"
        );
        Ok(committed)
    }

    /// Deletes a node together with everything nested inside it and every
    /// edge touching any of them. Returns the ids of all removed nodes.
    pub fn remove_node(&mut self, id: &str) -> Result<Vec<String>, EditorError> {
        let parent_id = self.existing(id)?.parent_id.clone();
        let mut removed = vec![id.to_string()];
        removed.extend(self.store.descendants_of(id));
        let doomed: AHashSet<String> = removed.iter().cloned().collect();

        let edges = self
            .store
            .take_edges(|e| doomed.contains(&e.source) || doomed.contains(&e.target));
        for edge in &edges {
            self.selection.edges.remove(&edge.id);
        }
        self.store.remove_nodes(&doomed);

        if self
            .selection
            .node
            .as_ref()
            .is_some_and(|selected| doomed.contains(selected))
        {
            self.selection.node = None;
        }
        if matches!(&self.drag, DragState::Dragging { node_id } if doomed.contains(node_id)) {
            self.drag = DragState::Idle;
        }
        if let Some(pid) = parent_id {
            mirror::refresh_chain(&mut self.store, &pid)?;
        }

        debug!(
            node_id = id,
            nodes = removed.len(),
            edges = edges.len(),
            "node removed"
        );
        Ok(removed)
    }

    /// Merges a config patch from the properties form into the node's config.
    ///
    /// Top-level keys are replaced. `subflow` is merged one level deeper so
    /// loop settings never clobber the mirror; `subflow.nodes` and
    /// `subflow.edges` are ignored, and a loop's `subflow.width`/`height`
    /// go through [`GraphEditor::resize_container`].
    pub fn update_config(&mut self, id: &str, mut patch: Map<String, Value>) -> Result<(), EditorError> {
        let is_container = self.existing(id)?.node_type.is_container();
        patch.remove("nodeType");
        patch.remove("nodeId");
        let subflow_patch = match patch.remove(SUBFLOW_KEY) {
            Some(Value::Object(map)) => Some(map),
            _ => None,
        };

        let mut requested_size = None;
        if let Some(node) = self.store.node_mut(id) {
            node.config.extend(patch);

            if let Some(sub) = subflow_patch {
                let current = node.subflow().size();
                let width = sub.get("width").and_then(Value::as_f64);
                let height = sub.get("height").and_then(Value::as_f64);
                if is_container && (width.is_some() || height.is_some()) {
                    requested_size = Some(Size::new(
                        width.unwrap_or(current.width),
                        height.unwrap_or(current.height),
                    ));
                }

                let entry = node
                    .config
                    .entry(SUBFLOW_KEY)
                    .or_insert_with(|| Value::Object(Map::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                if let Value::Object(existing) = entry {
                    for (key, value) in sub {
                        let derived = matches!(key.as_str(), "nodes" | "edges");
                        let sized = is_container && matches!(key.as_str(), "width" | "height");
                        if !derived && !sized {
                            existing.insert(key, value);
                        }
                    }
                }
            }
        }

        if let Some(size) = requested_size {
            self.resize_container(id, size)?;
        }
        self.reclamp_in_parent(id);
        self.refresh_enclosing(id)?;
        debug!(node_id = id, "config updated");
        Ok(())
    }

    // --- Switch branches ---

    /// Appends an empty branch to a switch node. Returns the new case count.
    pub fn add_case(&mut self, id: &str) -> Result<usize, EditorError> {
        let node = self.switch_mut(id)?;
        let mut cases = node
            .config
            .get("cases")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        cases.push(json!({
            "name": format!("case{}", cases.len() + 1),
            "condition": "",
            "target": ""
        }));
        let count = cases.len();
        node.config.insert("cases".to_string(), Value::Array(cases));

        self.reclamp_in_parent(id);
        self.refresh_enclosing(id)?;
        Ok(count)
    }

    /// Removes the branch at `index` and the edges leaving its handle. Other
    /// edges are left as they are. Returns how many edges were dropped.
    pub fn remove_case(&mut self, id: &str, index: usize) -> Result<usize, EditorError> {
        let node = self.switch_mut(id)?;
        let mut cases = node
            .config
            .get("cases")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if index >= cases.len() {
            return Err(EditorError::CaseOutOfRange {
                node_id: id.to_string(),
                index,
            });
        }
        cases.remove(index);
        node.config.insert("cases".to_string(), Value::Array(cases));

        let removed = self.delete_edges_from(id, &case_handle(index))?;
        self.reclamp_in_parent(id);
        self.refresh_enclosing(id)?;
        Ok(removed)
    }

    // --- Edges ---

    /// Validates and commits a connection. A rejection leaves the graph as it
    /// was and posts a transient notice carrying the reason.
    pub fn connect(&mut self, proposed: Connection) -> Result<Edge, EditorError> {
        self.connect_at(proposed, Instant::now())
    }

    /// [`GraphEditor::connect`] with an explicit clock for the notice timer.
    pub fn connect_at(&mut self, proposed: Connection, now: Instant) -> Result<Edge, EditorError> {
        let scope = match validate_connection(&proposed, &self.store.nodes_by_id()) {
            Ok(scope) => scope,
            Err(rejection) => {
                warn!(
                    source_id = %proposed.source,
                    target_id = %proposed.target,
                    reason = %rejection,
                    "connection rejected"
                );
                self.notices.post_transient_at(rejection.to_string(), now);
                return Err(rejection.into());
            }
        };

        if let Some(existing) = self.store.edges().iter().find(|e| proposed.matches(e)) {
            return Ok(existing.clone());
        }

        let edge = proposed.into_edge(new_id());
        debug!(
            edge_id = %edge.id,
            source_id = %edge.source,
            target_id = %edge.target,
            scope = ?scope,
            "edge added"
        );
        self.store.push_edge(edge.clone());
        if let Some(loop_id) = scope.loop_id() {
            mirror::refresh_chain(&mut self.store, loop_id)?;
        }
        Ok(edge)
    }

    /// Removes every edge leaving `node_id` through `source_handle`.
    pub fn delete_edges_from(&mut self, node_id: &str, source_handle: &str) -> Result<usize, EditorError> {
        let removed = self.drop_edges(|e| e.leaves_from(node_id, source_handle))?;
        Ok(removed.len())
    }

    pub fn remove_edge(&mut self, edge_id: &str) -> Result<Option<Edge>, EditorError> {
        Ok(self.drop_edges(|e| e.id == edge_id)?.into_iter().next())
    }

    /// Edges that no longer satisfy the connection rules, e.g. after one of
    /// their endpoints was moved into another loop. They are reported, not pruned.
    pub fn stale_edges(&self) -> Vec<&Edge> {
        validation::stale_edges(&self.store)
    }

    // --- Selection ---

    pub fn set_selected_node(&mut self, id: Option<String>) {
        self.selection.node = id;
    }

    pub fn set_selected_edges(&mut self, ids: impl IntoIterator<Item = String>) {
        self.selection.edges = ids.into_iter().collect();
    }

    /// A click on the empty canvas.
    pub fn pane_click(&mut self) {
        self.selection.clear();
    }

    pub fn panel_for(&self, id: &str) -> Result<PanelState, EditorError> {
        let node = self.existing(id)?;
        if self.provider.default_config(node.node_type).is_none() {
            return Ok(PanelState::ConfigurationMissing {
                node_id: node.id.clone(),
                node_type: node.node_type,
            });
        }
        Ok(PanelState::Ready {
            node_id: node.id.clone(),
            node_type: node.node_type,
            label: node.label.clone(),
            config: node.config.clone(),
            doc_path: self.provider.doc_path(node.node_type),
        })
    }

    // --- Whole-workflow operations ---

    pub fn validate(&self) -> Vec<ValidationIssue> {
        validation::validate_workflow(&self.store)
    }

    pub fn export(&self) -> Workflow {
        Workflow {
            name: self.name.clone(),
            version: self.version,
            nodes: self.store.nodes().to_vec(),
            edges: self.store.edges().to_vec(),
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        self.export().to_json_pretty()
    }

    /// Replaces the whole graph. A structurally invalid document is refused
    /// and the current graph stays as it was.
    pub fn load(&mut self, workflow: Workflow) -> Result<(), ImportError> {
        if let Err(e) = workflow.check_structure() {
            return Err(self.reject_import(e));
        }
        debug!(
            name = %workflow.name,
            nodes = workflow.nodes.len(),
            edges = workflow.edges.len(),
            "workflow loaded"
        );
        self.name = workflow.name;
        self.version = workflow.version;
        self.store = GraphStore::from_parts(workflow.nodes, workflow.edges);
        self.selection.clear();
        self.drag = DragState::Idle;
        Ok(())
    }

    pub fn load_json(&mut self, json: &str) -> Result<(), ImportError> {
        match serde_json::from_str::<Workflow>(json) {
            Ok(workflow) => self.load(workflow),
            Err(e) => Err(self.reject_import(e.into())),
        }
    }

    /// Recomputes every loop mirror from the store.
    pub fn normalize_mirrors(&mut self) -> Result<(), EditorError> {
        mirror::refresh_all(&mut self.store)?;
        Ok(())
    }

    /// Empties the workspace.
    pub fn clear(&mut self) {
        self.store.clear();
        self.selection.clear();
        self.drag = DragState::Idle;
        self.notices.dismiss();
        debug!("workspace cleared");
    }

    // --- Internals ---

    fn existing(&self, id: &str) -> Result<&Node, EditorError> {
        self.store.node(id).ok_or_else(|| EditorError::NodeNotFound {
            node_id: id.to_string(),
        })
    }

    fn container(&self, id: &str) -> Result<&Node, EditorError> {
        let node = self.existing(id)?;
        if !node.node_type.is_container() {
            return Err(EditorError::NotAContainer {
                node_id: id.to_string(),
            });
        }
        Ok(node)
    }

    fn switch_mut(&mut self, id: &str) -> Result<&mut Node, EditorError> {
        let node = self
            .store
            .node_mut(id)
            .ok_or_else(|| EditorError::NodeNotFound {
                node_id: id.to_string(),
            })?;
        if node.node_type != NodeType::Switch {
            return Err(EditorError::NotASwitch {
                node_id: id.to_string(),
            });
        }
        Ok(node)
    }

    fn ensure_unique_root(&mut self, node_type: NodeType) -> Result<(), EditorError> {
        let error = match node_type {
            NodeType::Start if self.store.root_count(NodeType::Start) > 0 => {
                EditorError::DuplicateStart
            }
            NodeType::End if self.store.root_count(NodeType::End) > 0 => EditorError::DuplicateEnd,
            _ => return Ok(()),
        };
        warn!(node_type = %node_type, "duplicate root node rejected");
        self.notices.post_blocking(error.to_string());
        Err(error)
    }

    fn reject_import(&mut self, error: ImportError) -> ImportError {
        warn!(error = %error, "workflow import rejected");
        self.notices.post_blocking(error.to_string());
        error
    }

    fn set_subflow_size(&mut self, id: &str, size: Size) -> Result<(), EditorError> {
        if let Some(node) = self.store.node_mut(id) {
            let mut subflow = node.subflow();
            subflow.width = size.width;
            subflow.height = size.height;
            subflow.write_into(&mut node.config)?;
        }
        Ok(())
    }

    /// Pulls every child of `container_id` back inside its current interior.
    fn reclamp_children(&mut self, container_id: &str) -> usize {
        let Some(container) = self.store.node(container_id) else {
            return 0;
        };
        let moves: Vec<(String, Position)> = self
            .store
            .children_of(container_id)
            .filter_map(|child| {
                let clamped = clamp_into(container, child, child.position, &self.layout);
                (clamped != child.position).then(|| (child.id.clone(), clamped))
            })
            .collect();

        for (child_id, position) in &moves {
            if let Some(child) = self.store.node_mut(child_id) {
                child.position = *position;
            }
        }
        moves.len()
    }

    /// Re-applies the parent's bounds after the node's own footprint changed.
    fn reclamp_in_parent(&mut self, id: &str) {
        let Some(node) = self.store.node(id) else {
            return;
        };
        let Some(parent) = node.parent_id.as_deref().and_then(|pid| self.store.node(pid)) else {
            return;
        };
        let current = node.position;
        let clamped = clamp_into(parent, node, current, &self.layout);
        if clamped != current {
            if let Some(node) = self.store.node_mut(id) {
                node.position = clamped;
            }
        }
    }

    /// Refreshes the mirrors of every loop enclosing `id`.
    fn refresh_enclosing(&mut self, id: &str) -> Result<(), EditorError> {
        if let Some(pid) = self.store.node(id).and_then(|n| n.parent_id.clone()) {
            mirror::refresh_chain(&mut self.store, &pid)?;
        }
        Ok(())
    }

    /// Removes the edges matching `predicate`, forgets them in the selection
    /// and refreshes the mirrors of the loops they belonged to.
    fn drop_edges(&mut self, predicate: impl Fn(&Edge) -> bool) -> Result<Vec<Edge>, EditorError> {
        let scopes: Vec<String> = self
            .store
            .edges()
            .iter()
            .filter(|&e| predicate(e))
            .filter_map(|e| mirror::edge_scope(&self.store, e))
            .unique()
            .collect();
        let removed = self.store.take_edges(&predicate);
        for edge in &removed {
            self.selection.edges.remove(&edge.id);
        }
        for loop_id in scopes {
            mirror::refresh_chain(&mut self.store, &loop_id)?;
        }
        Ok(removed)
    }
}

fn ensure_finite(position: Position) -> Result<(), EditorError> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(EditorError::NonFinitePosition {
            x: position.x,
            y: position.y,
        })
    }
}
