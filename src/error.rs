use thiserror::Error;

/// Errors raised by the graph mutation API when a structural invariant would break.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("The workflow can only contain one start node")]
    DuplicateStart,

    #[error("The workflow can only contain one end node")]
    DuplicateEnd,

    #[error("Node '{node_id}' not found")]
    NodeNotFound { node_id: String },

    #[error("Node '{node_id}' is not a loop container")]
    NotAContainer { node_id: String },

    #[error("Node '{node_id}' cannot be moved into container '{container_id}'")]
    InvalidReparent {
        node_id: String,
        container_id: String,
    },

    #[error("Position ({x}, {y}) is not a finite canvas coordinate")]
    NonFinitePosition { x: f64, y: f64 },

    #[error("Node '{node_id}' is not a switch")]
    NotASwitch { node_id: String },

    #[error("Switch node '{node_id}' has no case at index {index}")]
    CaseOutOfRange { node_id: String, index: usize },

    #[error(transparent)]
    ConnectionRejected(#[from] ConnectionRejection),

    #[error("Failed to serialize node data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a proposed connection was refused.
///
/// The `Display` output is the message shown to the user in the transient notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionRejection {
    #[error("end node cannot have outgoing connections")]
    EndHasNoOutputs,

    #[error("loop entry can only connect to nodes inside the same loop")]
    EntryOutsideLoop,

    #[error("cannot connect from outside a loop into its interior")]
    IntoLoopInterior,

    #[error("cannot connect from inside a loop to the outside")]
    OutOfLoopInterior,

    #[error("cannot connect nodes belonging to different loops")]
    AcrossLoops,

    #[error("node '{node_id}' does not exist")]
    UnknownEndpoint { node_id: String },
}

/// Errors that can occur while importing a workflow document.
///
/// Import is all-or-nothing: any of these leaves the current graph untouched.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to parse workflow JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Node id '{0}' appears more than once")]
    DuplicateNodeId(String),

    #[error("Node '{node_id}' references missing parent '{parent_id}'")]
    DanglingParent { node_id: String, parent_id: String },

    #[error("Node '{node_id}' has parent '{parent_id}', which is not a loop")]
    ParentNotLoop { node_id: String, parent_id: String },

    #[error("Node '{0}' is nested inside itself")]
    ParentCycle(String),

    #[error("Edge '{edge_id}' references missing node '{node_id}'")]
    DanglingEdge { edge_id: String, node_id: String },

    #[error("The workflow contains more than one start node")]
    DuplicateStart,

    #[error("The workflow contains more than one end node")]
    DuplicateEnd,
}
