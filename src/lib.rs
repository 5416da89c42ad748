//! # Mindflow - Node Graph Editing Engine
//!
//! **Mindflow** is the document core of a flowchart / mind-map editor. It keeps a
//! graph of nodes wired port-to-port, derives which nodes are "unlocked" by the
//! completion of their upstream nodes, orders the graph for linear export, and
//! records every change in a snapshot-based undo/redo history.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Document**: Parse a saved project with [`document::load_document`].
//!     Older or hand-edited files are sanitized and stripped of dangling references.
//! 2.  **Edit**: Create an [`Editor`](editor::Editor) and send it [`Command`](commands::Command)s.
//!     Each accepted command becomes exactly one undo step; rejected commands change
//!     nothing and show up in the activity log.
//! 3.  **Inspect**: Read the live state and its derived activation status. The
//!     derived state is rebuilt after every change and is never stored.
//! 4.  **Export**: Produce an ordered export (optionally restricted to one flow)
//!     and render it as HTML, or save the whole document as JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mindflow::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut editor = Editor::new(EditorConfig::default());
//!
//!     // Two nodes: a starter and a normal node.
//!     editor.execute(Command::AddNode { template: NodeTemplate::Starter, pos: Point::new(0.0, 0.0) })?;
//!     editor.execute(Command::AddNode { template: NodeTemplate::Normal, pos: Point::new(0.0, 200.0) })?;
//!
//!     // Wire node 1 into node 2 and complete node 1.
//!     editor.execute(Command::Connect {
//!         from: PortRef::new(1, "out_1"),
//!         to: PortRef::new(2, "in_1"),
//!     })?;
//!     editor.execute(Command::ToggleComplete(1))?;
//!
//!     let unlocked = editor.status(2).map_or(false, |s| s.is_condition_met);
//!     println!("Node 2 unlocked: {}", unlocked);
//!
//!     // Undo the completion; node 2 is locked again.
//!     editor.undo();
//!
//!     let export = editor.export(None)?;
//!     std::fs::write("flow.html", export.to_html())?;
//!     Ok(())
//! }
//! ```

pub mod activity;
pub mod commands;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod export;
pub mod history;
pub mod linearize;
pub mod model;
pub mod prelude;
pub mod status;
