//! Prelude module for convenient imports
//!
//! Re-exports the types needed to drive the editor without importing each
//! module individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use flowcanvas::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let workflow = Workflow::from_file("path/to/workflow.json")?;
//!
//! let mut editor = GraphEditor::new();
//! editor.load(workflow)?;
//! editor.normalize_mirrors()?;
//!
//! for issue in editor.validate() {
//!     println!("{issue}");
//! }
//! # Ok(())
//! # }
//! ```

// Editing façade
pub use crate::editor::{
    DragOutcome, DropEvent, DropOutcome, EditorBuilder, GraphEditor, Notice, NoticeKind, PanelState,
};

// Graph model
pub use crate::model::{
    Connection, DEFAULT_BRANCH_HANDLE, ENTRY_HANDLE, Edge, Node, NodeType, Position, Size, Workflow,
    case_handle,
};
pub use crate::store::GraphStore;

// Rules and configuration
pub use crate::connection::ConnectionScope;
pub use crate::layout::LayoutConfig;
pub use crate::templates::{ConfigProvider, TemplateRegistry};
pub use crate::validation::ValidationIssue;

// Error types
pub use crate::error::{ConnectionRejection, EditorError, ImportError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
