use super::edge::Edge;
use super::node::{Node, NodeType};
use crate::error::ImportError;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_WORKFLOW_NAME: &str = "New workflow";
pub const CURRENT_VERSION: u32 = 1;

fn default_name() -> String {
    DEFAULT_WORKFLOW_NAME.to_string()
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// The exported form of a whole canvas: `{ name, version, nodes, edges }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: CURRENT_VERSION,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl Workflow {
    /// Parses a document and checks its structure. Nothing is returned unless
    /// the whole document is usable.
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        let workflow: Workflow = serde_json::from_str(json)?;
        workflow.check_structure()?;
        Ok(workflow)
    }

    /// Load a workflow document from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Verifies the invariants an editor relies on: unique ids, parents that
    /// exist and are loops, no containment cycles, edges between known nodes,
    /// and at most one root-scope start and end.
    pub fn check_structure(&self) -> Result<(), ImportError> {
        if let Some(id) = self.nodes.iter().map(|n| n.id.as_str()).duplicates().next() {
            return Err(ImportError::DuplicateNodeId(id.to_string()));
        }

        let by_id: AHashMap<&str, &Node> = self.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        for node in &self.nodes {
            let Some(parent_id) = node.parent_id.as_deref() else {
                continue;
            };
            let parent = by_id
                .get(parent_id)
                .ok_or_else(|| ImportError::DanglingParent {
                    node_id: node.id.clone(),
                    parent_id: parent_id.to_string(),
                })?;
            if !parent.node_type.is_container() {
                return Err(ImportError::ParentNotLoop {
                    node_id: node.id.clone(),
                    parent_id: parent_id.to_string(),
                });
            }

            // Every parent exists at this point, so a chain longer than the
            // node count must revisit a node.
            let mut cursor = node.parent_id.as_deref();
            let mut steps = 0;
            while let Some(current) = cursor {
                if current == node.id || steps > self.nodes.len() {
                    return Err(ImportError::ParentCycle(node.id.clone()));
                }
                cursor = by_id.get(current).and_then(|n| n.parent_id.as_deref());
                steps += 1;
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !by_id.contains_key(endpoint.as_str()) {
                    return Err(ImportError::DanglingEdge {
                        edge_id: edge.id.clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
        }

        let root_count = |t: NodeType| {
            self.nodes
                .iter()
                .filter(|n| n.is_root() && n.node_type == t)
                .count()
        };
        if root_count(NodeType::Start) > 1 {
            return Err(ImportError::DuplicateStart);
        }
        if root_count(NodeType::End) > 1 {
            return Err(ImportError::DuplicateEnd);
        }

        Ok(())
    }
}
