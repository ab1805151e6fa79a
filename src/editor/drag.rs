use super::{GraphEditor, ensure_finite};
use crate::error::EditorError;
use crate::layout::{clamp_into, container_at};
use crate::mirror;
use crate::model::Position;
use ahash::AHashSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { node_id: String },
}

/// What happened when a drag gesture ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    NotDragging,
    /// The node stayed in its scope.
    Settled { node_id: String, position: Position },
    /// The node was released over another loop's interior and moved into it.
    Reparented {
        node_id: String,
        container_id: String,
        position: Position,
    },
}

impl GraphEditor {
    pub fn begin_drag(&mut self, id: &str) -> Result<(), EditorError> {
        self.existing(id)?;
        self.drag = DragState::Dragging {
            node_id: id.to_string(),
        };
        Ok(())
    }

    /// Moves the dragged node, clamped like [`GraphEditor::move_node`].
    /// Returns `None` when no drag is in progress.
    pub fn drag_to(&mut self, proposed: Position) -> Result<Option<Position>, EditorError> {
        let DragState::Dragging { node_id } = &self.drag else {
            return Ok(None);
        };
        let node_id = node_id.clone();
        self.move_node(&node_id, proposed).map(Some)
    }

    /// Ends the drag with the pointer at canvas coordinates `pointer`.
    ///
    /// Releasing over the interior of a loop other than the current parent
    /// moves the node into that loop, keeping its absolute position as far as
    /// the new interior allows. The pointer only picks the target. Releasing
    /// anywhere else keeps it where
    /// the last [`GraphEditor::drag_to`] put it; nodes are never dragged back
    /// out to the root.
    pub fn end_drag(&mut self, pointer: Position) -> Result<DragOutcome, EditorError> {
        let DragState::Dragging { node_id } = std::mem::take(&mut self.drag) else {
            return Ok(DragOutcome::NotDragging);
        };
        let Some((parent_id, position)) = self
            .store
            .node(&node_id)
            .map(|n| (n.parent_id.clone(), n.position))
        else {
            return Ok(DragOutcome::NotDragging);
        };

        let mut excluded: AHashSet<String> = self.store.descendants_of(&node_id).into_iter().collect();
        excluded.insert(node_id.clone());
        let target = container_at(&self.store, pointer, &self.layout, |id| excluded.contains(id));

        match target {
            Some(container_id) if parent_id.as_deref() != Some(container_id.as_str()) => {
                let absolute = self.store.absolute_position(&node_id).unwrap_or(position);
                let position = self.reparent(&node_id, &container_id, absolute)?;
                Ok(DragOutcome::Reparented {
                    node_id,
                    container_id,
                    position,
                })
            }
            _ => Ok(DragOutcome::Settled { node_id, position }),
        }
    }

    /// Moves `id` into `container_id`, placing it at the canvas point
    /// `canvas_point` expressed relative to the container and clamped into
    /// its interior. Returns the committed relative position.
    ///
    /// Edges are left untouched; any that now cross loop boundaries show up
    /// in [`GraphEditor::stale_edges`].
    pub fn reparent(
        &mut self,
        id: &str,
        container_id: &str,
        canvas_point: Position,
    ) -> Result<Position, EditorError> {
        let old_parent = self.existing(id)?.parent_id.clone();
        ensure_finite(canvas_point)?;
        self.container(container_id)?;
        if id == container_id || self.store.descendants_of(id).iter().any(|d| d == container_id) {
            return Err(EditorError::InvalidReparent {
                node_id: id.to_string(),
                container_id: container_id.to_string(),
            });
        }

        let origin = self
            .store
            .absolute_position(container_id)
            .unwrap_or_default();
        let position = match (self.store.node(container_id), self.store.node(id)) {
            (Some(container), Some(node)) => {
                clamp_into(container, node, canvas_point - origin, &self.layout)
            }
            _ => canvas_point - origin,
        };

        if let Some(node) = self.store.node_mut(id) {
            node.parent_id = Some(container_id.to_string());
            node.position = position;
        }
        if let Some(old) = old_parent {
            mirror::refresh_chain(&mut self.store, &old)?;
        }
        mirror::refresh_chain(&mut self.store, container_id)?;

        debug!(
            node_id = id,
            container_id,
            x = position.x,
            y = position.y,
            "node reparented"
        );
        Ok(position)
    }
}
