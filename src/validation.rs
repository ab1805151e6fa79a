//! Whole-workflow lint, run before export or from the command line.

use crate::connection::validate_connection;
use crate::error::ConnectionRejection;
use crate::model::{Connection, Edge, NodeType};
use crate::store::GraphStore;
use ahash::AHashSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("The workflow has no start node")]
    MissingStart,

    #[error("The workflow has {0} start nodes")]
    MultipleStart(usize),

    #[error("The workflow has no end node")]
    MissingEnd,

    #[error("The workflow has {0} end nodes")]
    MultipleEnd(usize),

    #[error("Node '{label}' ({node_id}) is not connected to anything")]
    DanglingNode { node_id: String, label: String },

    #[error("Edge '{edge_id}' references missing node '{node_id}'")]
    DanglingEdge { edge_id: String, node_id: String },

    #[error("Edge '{edge_id}' is no longer valid: {reason}")]
    CrossScopeEdge {
        edge_id: String,
        reason: ConnectionRejection,
    },
}

/// Lints the store. An empty result means the workflow is well formed.
pub fn validate_workflow(store: &GraphStore) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match store.root_count(NodeType::Start) {
        0 => issues.push(ValidationIssue::MissingStart),
        1 => {}
        n => issues.push(ValidationIssue::MultipleStart(n)),
    }
    match store.root_count(NodeType::End) {
        0 => issues.push(ValidationIssue::MissingEnd),
        1 => {}
        n => issues.push(ValidationIssue::MultipleEnd(n)),
    }

    let connected: AHashSet<&str> = store
        .edges()
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();
    issues.extend(
        store
            .nodes()
            .iter()
            .filter(|n| n.is_root())
            .filter(|n| !matches!(n.node_type, NodeType::Start | NodeType::End))
            .filter(|n| !connected.contains(n.id.as_str()))
            .map(|n| ValidationIssue::DanglingNode {
                node_id: n.id.clone(),
                label: n
                    .label
                    .clone()
                    .unwrap_or_else(|| n.node_type.default_label().to_string()),
            }),
    );

    let by_id = store.nodes_by_id();
    for edge in store.edges() {
        match validate_connection(&Connection::from(edge), &by_id) {
            Ok(_) => {}
            Err(ConnectionRejection::UnknownEndpoint { node_id }) => {
                issues.push(ValidationIssue::DanglingEdge {
                    edge_id: edge.id.clone(),
                    node_id,
                });
            }
            Err(reason) => issues.push(ValidationIssue::CrossScopeEdge {
                edge_id: edge.id.clone(),
                reason,
            }),
        }
    }

    issues
}

/// Edges whose endpoints exist but which would be refused if drawn today.
pub fn stale_edges(store: &GraphStore) -> Vec<&Edge> {
    let by_id = store.nodes_by_id();
    store
        .edges()
        .iter()
        .filter(|e| {
            matches!(
                validate_connection(&Connection::from(*e), &by_id),
                Err(reason) if !matches!(reason, ConnectionRejection::UnknownEndpoint { .. })
            )
        })
        .collect()
}
