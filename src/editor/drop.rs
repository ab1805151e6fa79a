use super::GraphEditor;
use crate::error::EditorError;
use crate::layout::{clamp_child_position, container_at, estimate_fresh_footprint, interior_size};
use crate::model::{Node, NodeType, Position};
use tracing::debug;

/// A palette item released over the canvas.
///
/// `sequence` identifies the underlying pointer event. Every handler that sees
/// the same event passes the same sequence number, so only the first one acts.
#[derive(Debug, Clone, PartialEq)]
pub struct DropEvent {
    pub sequence: u64,
    pub node_type: NodeType,
    /// Canvas coordinates.
    pub point: Position,
}

impl DropEvent {
    pub fn new(sequence: u64, node_type: NodeType, point: Position) -> Self {
        Self {
            sequence,
            node_type,
            point,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Added(Node),
    /// A node of the same type already sits at that spot in the container.
    Duplicate,
    /// Another handler already processed this event.
    AlreadyClaimed,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct DropDispatcher {
    last_claimed: Option<u64>,
}

impl DropDispatcher {
    /// Claims `sequence`. Fails if it, or a later event, was already claimed.
    fn claim(&mut self, sequence: u64) -> bool {
        if self.last_claimed.is_some_and(|last| sequence <= last) {
            return false;
        }
        self.last_claimed = Some(sequence);
        true
    }
}

impl GraphEditor {
    /// Resolves the deepest loop under the drop point and adds the node there,
    /// or at the root when no loop interior is hit. The new node is selected.
    pub fn handle_drop(&mut self, event: DropEvent) -> Result<DropOutcome, EditorError> {
        if !self.drops.claim(event.sequence) {
            debug!(sequence = event.sequence, "drop already claimed");
            return Ok(DropOutcome::AlreadyClaimed);
        }

        let target = container_at(&self.store, event.point, &self.layout, |_| false);
        let node = match target {
            Some(container_id) => {
                let origin = self
                    .store
                    .absolute_position(&container_id)
                    .unwrap_or_default();
                let relative = event.point - origin;
                if self.is_duplicate_drop(&container_id, event.node_type, relative) {
                    debug!(
                        container_id = %container_id,
                        node_type = %event.node_type,
                        "duplicate drop ignored"
                    );
                    return Ok(DropOutcome::Duplicate);
                }
                self.add_node(event.node_type, relative, Some(container_id.as_str()))?
            }
            None => self.add_node(event.node_type, event.point, None)?,
        };

        self.selection.node = Some(node.id.clone());
        Ok(DropOutcome::Added(node))
    }

    /// True when a node of `node_type` already sits within the duplicate
    /// tolerance of where a fresh one would land in `container_id`.
    fn is_duplicate_drop(&self, container_id: &str, node_type: NodeType, relative: Position) -> bool {
        let Some(container) = self.store.node(container_id) else {
            return false;
        };
        let config = self.provider.default_config(node_type).unwrap_or_default();
        let landing = clamp_child_position(
            interior_size(container, &self.layout),
            estimate_fresh_footprint(node_type, &config, &self.layout),
            relative,
            &self.layout,
        );
        let tolerance = self.layout.duplicate_tolerance;
        self.store.children_of(container_id).any(|sibling| {
            sibling.node_type == node_type
                && (sibling.position.x - landing.x).abs() < tolerance
                && (sibling.position.y - landing.y).abs() < tolerance
        })
    }
}
