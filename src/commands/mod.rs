//! Document commands.
//!
//! Every command is a pure function from the current [`CoreState`] to either
//! the next state or a [`CommandError`]. Commands never touch history or
//! derived data; the [`Editor`](crate::editor::Editor) commits their result.

use crate::activity::LogLevel;
use crate::config::{EditorConfig, OutputFanOut};
use crate::error::CommandError;
use crate::model::{
    CanvasObject, Connection, CoreState, DocumentSettings, Mininode, MininodeId, Node, NodeId,
    NodeTemplate, Point, PortRef, PortSide, Size, StylePatch,
};
use std::collections::BTreeSet;

pub mod canvas;
pub mod clipboard;
pub mod connection;
pub mod mininode;
pub mod node;
pub mod order;

pub use clipboard::Clipboard;

/// Settings a command needs beyond the document itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandContext {
    pub fan_out: OutputFanOut,
    pub node_size: Size,
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for CommandContext {
    fn from(config: &EditorConfig) -> Self {
        Self {
            fan_out: config.output_fan_out,
            node_size: config.default_node_size,
        }
    }
}

/// A successfully computed next state with its log line.
#[derive(Debug, Clone)]
pub struct Applied {
    pub state: CoreState,
    pub message: String,
    pub level: LogLevel,
}

impl Applied {
    pub(crate) fn success(state: CoreState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
            level: LogLevel::Success,
        }
    }

    pub(crate) fn info(state: CoreState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
            level: LogLevel::Info,
        }
    }

    pub(crate) fn warning(state: CoreState, message: impl Into<String>) -> Self {
        Self {
            state,
            message: message.into(),
            level: LogLevel::Warning,
        }
    }
}

/// Every undoable document operation.
#[derive(Debug, Clone)]
pub enum Command {
    AddNode {
        template: NodeTemplate,
        pos: Point,
    },
    /// Creates a node centered on `center` and wires `from` into its first input.
    AddNodeAndConnect {
        template: NodeTemplate,
        center: Point,
        from: PortRef,
    },
    UpdateNode(Node),
    ToggleComplete(NodeId),
    TogglePin(NodeId),
    MarkAllIncomplete,
    DeleteNodes(BTreeSet<NodeId>),
    AddPort {
        node: NodeId,
        side: PortSide,
    },
    DeletePort {
        node: NodeId,
        port: String,
    },
    Connect {
        from: PortRef,
        to: PortRef,
    },
    Disconnect(Connection),
    ToggleWireless(Connection),
    InsertNodeInConnection(Connection),
    ReorganizeOrder,
    ReorganizeSelection(BTreeSet<NodeId>),
    AddMininode {
        parent: NodeId,
    },
    UpdateMininode(Mininode),
    DeleteMininode(MininodeId),
    MoveMininode {
        id: MininodeId,
        new_parent: NodeId,
    },
    AddCanvasObject(CanvasObject),
    UpdateCanvasObject(CanvasObject),
    DeleteCanvasObjects(BTreeSet<String>),
    StyleCanvasObjects {
        ids: BTreeSet<String>,
        patch: StylePatch,
    },
    ToggleSwarm(String),
    Paste {
        clipboard: Clipboard,
        at: Point,
    },
    UpdateSettings(DocumentSettings),
    RenameCanvas(String),
}

impl Command {
    pub fn delete_node(id: NodeId) -> Self {
        Command::DeleteNodes(BTreeSet::from([id]))
    }

    pub fn apply(&self, state: &CoreState, ctx: &CommandContext) -> Result<Applied, CommandError> {
        match self {
            Command::AddNode { template, pos } => node::add_node(state, ctx, *template, *pos),
            Command::AddNodeAndConnect {
                template,
                center,
                from,
            } => node::add_node_and_connect(state, ctx, *template, *center, from),
            Command::UpdateNode(updated) => node::update_node(state, updated),
            Command::ToggleComplete(id) => node::toggle_complete(state, *id),
            Command::TogglePin(id) => node::toggle_pin(state, *id),
            Command::MarkAllIncomplete => node::mark_all_incomplete(state),
            Command::DeleteNodes(ids) => node::delete_nodes(state, ids),
            Command::AddPort { node, side } => node::add_port(state, *node, *side),
            Command::DeletePort { node, port } => node::delete_port(state, *node, port),
            Command::Connect { from, to } => connection::connect(state, ctx, from, to),
            Command::Disconnect(conn) => connection::disconnect(state, conn),
            Command::ToggleWireless(conn) => connection::toggle_wireless(state, conn),
            Command::InsertNodeInConnection(conn) => {
                connection::insert_node(state, ctx, conn)
            }
            Command::ReorganizeOrder => order::reorganize(state),
            Command::ReorganizeSelection(ids) => order::reorganize_selection(state, ids),
            Command::AddMininode { parent } => mininode::add(state, *parent),
            Command::UpdateMininode(m) => mininode::update(state, m),
            Command::DeleteMininode(id) => mininode::delete(state, *id),
            Command::MoveMininode { id, new_parent } => {
                mininode::move_to(state, *id, *new_parent)
            }
            Command::AddCanvasObject(obj) => canvas::add(state, obj),
            Command::UpdateCanvasObject(obj) => canvas::update(state, obj),
            Command::DeleteCanvasObjects(ids) => canvas::delete(state, ids),
            Command::StyleCanvasObjects { ids, patch } => canvas::restyle(state, ids, patch),
            Command::ToggleSwarm(id) => canvas::toggle_swarm(state, id),
            Command::Paste { clipboard, at } => clipboard.paste_into(state, *at),
            Command::UpdateSettings(settings) => {
                let mut next = state.clone();
                next.settings = settings.clone();
                Ok(Applied::success(next, "Settings saved."))
            }
            Command::RenameCanvas(title) => {
                let title = title.trim();
                if title == state.settings.canvas_title {
                    return Err(CommandError::Unchanged);
                }
                let mut next = state.clone();
                next.settings.canvas_title = title.to_string();
                Ok(Applied::info(next, format!("Canvas renamed to '{}'.", title)))
            }
        }
    }
}
