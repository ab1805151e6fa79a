use crate::error::ConnectionRejection;
use crate::model::{Connection, Node, NodeType};
use ahash::AHashMap;

/// Where an accepted connection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionScope {
    /// Between two root-scope nodes.
    Root,
    /// From a loop's internal start port to one of its direct children.
    Entry { loop_id: String },
    /// Between two siblings inside the same loop.
    Interior { loop_id: String },
}

impl ConnectionScope {
    /// The loop whose mirror must record this connection, if any.
    pub fn loop_id(&self) -> Option<&str> {
        match self {
            ConnectionScope::Root => None,
            ConnectionScope::Entry { loop_id } | ConnectionScope::Interior { loop_id } => {
                Some(loop_id)
            }
        }
    }
}

/// Decides whether `proposed` may become an edge.
///
/// Pure and deterministic; rules are checked in order and the first match
/// decides. Self-loops, port compatibility and cycles are not checked.
pub fn validate_connection(
    proposed: &Connection,
    nodes_by_id: &AHashMap<&str, &Node>,
) -> Result<ConnectionScope, ConnectionRejection> {
    let lookup = |id: &str| {
        nodes_by_id
            .get(id)
            .copied()
            .ok_or_else(|| ConnectionRejection::UnknownEndpoint {
                node_id: id.to_string(),
            })
    };
    let source = lookup(&proposed.source)?;
    let target = lookup(&proposed.target)?;

    if source.node_type == NodeType::End {
        return Err(ConnectionRejection::EndHasNoOutputs);
    }

    let source_parent = source.parent_id.as_deref();
    let target_parent = target.parent_id.as_deref();

    if proposed.is_entry() {
        return if target_parent == Some(proposed.source.as_str()) {
            Ok(ConnectionScope::Entry {
                loop_id: proposed.source.clone(),
            })
        } else {
            Err(ConnectionRejection::EntryOutsideLoop)
        };
    }

    match (source_parent, target_parent) {
        (Some(s), Some(t)) if s == t => Ok(ConnectionScope::Interior {
            loop_id: s.to_string(),
        }),
        (None, Some(_)) => Err(ConnectionRejection::IntoLoopInterior),
        (Some(_), None) => Err(ConnectionRejection::OutOfLoopInterior),
        (Some(_), Some(_)) => Err(ConnectionRejection::AcrossLoops),
        (None, None) => Ok(ConnectionScope::Root),
    }
}
