//! # Flowcanvas - Nested Workflow Graph Editing Model
//!
//! **Flowcanvas** is the editing core behind a visual workflow canvas: business
//! process graphs made of HTTP calls, SQL and Redis operations, scripts,
//! conditional branches, loops and variable assignments. It owns the graph and
//! keeps it valid while a user drops, drags, resizes, connects and configures
//! nodes. Rendering and forms live elsewhere and talk to it only through
//! [`editor::GraphEditor`].
//!
//! ## Concepts
//!
//! 1.  **Flat store**: every node and edge lives in one ordered list. Nesting is
//!     expressed through `Node::parent_id`, which always points at a `LOOP` node.
//! 2.  **Containment**: a child's position is relative to its loop and is clamped
//!     into the loop's interior whenever it is placed, moved or its loop is resized.
//! 3.  **Connection rules**: edges may not cross loop boundaries, except for the
//!     loop's own entry port reaching its direct children.
//! 4.  **Subflow mirror**: each loop carries `config.subflow.nodes` / `edges`, a
//!     derived copy of its body recomputed after every structural change.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowcanvas::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut editor = GraphEditor::builder().with_name("Nightly sync").build();
//!
//!     let start = editor.add_node(NodeType::Start, Position::new(0.0, 0.0), None)?;
//!     let body = editor.add_node(NodeType::Loop, Position::new(0.0, 120.0), None)?;
//!     let fetch = editor.add_node(NodeType::Http, Position::new(40.0, 60.0), Some(body.id.as_str()))?;
//!
//!     editor.connect(Connection::new(&start.id, &body.id))?;
//!     editor.connect(Connection::new(&body.id, &fetch.id).from_handle(ENTRY_HANDLE))?;
//!
//!     // Edges may not leave a loop's interior.
//!     let end = editor.add_node(NodeType::End, Position::new(0.0, 400.0), None)?;
//!     assert!(editor.connect(Connection::new(&fetch.id, &end.id)).is_err());
//!
//!     for issue in editor.validate() {
//!         println!("{issue}");
//!     }
//!     println!("{}", editor.export_json()?);
//!     Ok(())
//! }
//! ```

pub mod connection;
pub mod editor;
pub mod error;
pub mod id;
pub mod layout;
pub mod mirror;
pub mod model;
pub mod prelude;
pub mod store;
pub mod templates;
pub mod validation;
