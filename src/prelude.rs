//! Prelude module for convenient imports
//!
//! Re-exports the types most programs need to load, edit and export a
//! document.
//!
//! # Example
//!
//! ```rust,no_run
//! use mindflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/project.json")?;
//! let doc = load_document(&json)?;
//! let mut editor = Editor::from_document(doc, EditorConfig::default());
//!
//! editor.execute(Command::ReorganizeOrder)?;
//! println!("{}", editor.export_json()?);
//! # Ok(())
//! # }
//! ```

// Editing
pub use crate::commands::{Clipboard, Command, CommandContext};
pub use crate::config::{EditorConfig, OutputFanOut};
pub use crate::editor::{Editor, Modal, ResizeHandle, Selection};

// Document model
pub use crate::model::{
    CanvasObject, Connection, CoreState, DocumentSettings, InputLogic, Mininode, Node, NodeId,
    NodeTemplate, Point, Port, PortRef, PortSide, Size,
};

// Derived data and ordering
pub use crate::linearize::{Linearizer, TieBreak};
pub use crate::status::{DerivedState, NodeStatus};

// Persistence and export
pub use crate::document::{SaveData, load_document};
pub use crate::export::{Export, ordered_export, selection_export};

// Logging
pub use crate::activity::{ActivityLog, LogLevel};

// Error types
pub use crate::error::{CommandError, DocumentError, EditorError, ExportError, LinearizeError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
