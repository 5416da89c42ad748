use crate::commands::Command;
use crate::model::{MininodeId, NodeId};
use std::collections::BTreeSet;

/// A dialog on the editor's modal stack, with the data its action needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    EditNode(NodeId),
    EditMininode(MininodeId),
    ConfirmDeleteSelection(BTreeSet<NodeId>),
    ConfirmMarkAllIncomplete,
    ConfirmDeleteMininode(MininodeId),
    ConfirmDeleteCanvasObjects(BTreeSet<String>),
    /// Several flows end in the graph; the user picks one (or all) to export.
    SelectEndNode { candidates: Vec<NodeId> },
    /// Replace the open document with `content`.
    ConfirmImport { content: String },
    ConfirmNewCanvas,
    Settings,
}

impl Modal {
    /// The command a plain confirmation runs, for dialogs that map to one.
    pub fn command(&self) -> Option<Command> {
        match self {
            Modal::ConfirmDeleteSelection(ids) => Some(Command::DeleteNodes(ids.clone())),
            Modal::ConfirmMarkAllIncomplete => Some(Command::MarkAllIncomplete),
            Modal::ConfirmDeleteMininode(id) => Some(Command::DeleteMininode(*id)),
            Modal::ConfirmDeleteCanvasObjects(ids) => {
                Some(Command::DeleteCanvasObjects(ids.clone()))
            }
            _ => None,
        }
    }

    /// Dialogs whose action needs a form submission rather than a yes/no.
    pub fn needs_input(&self) -> bool {
        matches!(
            self,
            Modal::EditNode(_)
                | Modal::EditMininode(_)
                | Modal::SelectEndNode { .. }
                | Modal::Settings
        )
    }
}
