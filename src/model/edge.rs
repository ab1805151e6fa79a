use serde::{Deserialize, Serialize};

/// Source handle of a loop's internal start port.
pub const ENTRY_HANDLE: &str = "entry-out";

/// Source handle of a switch node's fallback branch.
pub const DEFAULT_BRANCH_HANDLE: &str = "default";

/// Source handle of the switch branch at `index`.
pub fn case_handle(index: usize) -> String {
    format!("case-{}", index)
}

/// A directed connection between two node ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    pub fn leaves_from(&self, node_id: &str, source_handle: &str) -> bool {
        self.source == node_id && self.source_handle.as_deref() == Some(source_handle)
    }

    pub fn is_entry(&self) -> bool {
        self.source_handle.as_deref() == Some(ENTRY_HANDLE)
    }
}

/// A connection the user is trying to make, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    pub target: String,
    #[serde(default)]
    pub target_handle: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    pub fn from_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    pub fn to_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    pub fn is_entry(&self) -> bool {
        self.source_handle.as_deref() == Some(ENTRY_HANDLE)
    }

    /// True when `edge` already links the same ports.
    pub fn matches(&self, edge: &Edge) -> bool {
        edge.source == self.source
            && edge.target == self.target
            && edge.source_handle == self.source_handle
            && edge.target_handle == self.target_handle
    }

    pub fn into_edge(self, id: String) -> Edge {
        Edge {
            id,
            source: self.source,
            target: self.target,
            source_handle: self.source_handle,
            target_handle: self.target_handle,
        }
    }
}

impl From<&Edge> for Connection {
    fn from(edge: &Edge) -> Self {
        Self {
            source: edge.source.clone(),
            source_handle: edge.source_handle.clone(),
            target: edge.target.clone(),
            target_handle: edge.target_handle.clone(),
        }
    }
}
