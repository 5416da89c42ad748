use crate::model::{MininodeId, NodeId};
use thiserror::Error;

/// Reasons a command is rejected before it changes any state.
///
/// These are user-facing validation outcomes, never fatal errors. The editor
/// reports them through its activity log and leaves history untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Cannot connect node {0} to itself")]
    SelfConnection(NodeId),

    #[error("Input port '{port}' of node {node} is already occupied")]
    InputPortOccupied { node: NodeId, port: String },

    #[error("Output port '{port}' of node {node} is already in use")]
    OutputPortOccupied { node: NodeId, port: String },

    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Port '{port}' not found on node {node}")]
    PortNotFound { node: NodeId, port: String },

    #[error("Connection {from_node}:{from_port} -> {to_node}:{to_port} not found")]
    ConnectionNotFound {
        from_node: NodeId,
        from_port: String,
        to_node: NodeId,
        to_port: String,
    },

    #[error("Mininode {0} not found")]
    MininodeNotFound(MininodeId),

    #[error("Canvas object '{0}' not found")]
    CanvasObjectNotFound(String),

    #[error("Canvas object '{0}' already exists")]
    DuplicateCanvasObject(String),

    #[error("Node {0} is pinned and cannot be moved or resized")]
    NodePinned(NodeId),

    #[error("Cannot connect to a node without input ports")]
    NoInputPorts,

    #[error("{0}")]
    Cycle(#[from] LinearizeError),

    #[error("Nothing is selected")]
    EmptySelection,

    #[error("The command would not change the document")]
    Unchanged,

    #[error("Another gesture is already in progress")]
    GestureInProgress,

    #[error("No gesture is in progress")]
    NoGesture,

    #[error("Clipboard is empty")]
    EmptyClipboard,

    #[error("No free {0} left")]
    IdSpaceExhausted(&'static str),
}

impl CommandError {
    /// Rejections that should not produce a user-visible log entry.
    pub fn is_silent(&self) -> bool {
        matches!(self, CommandError::Unchanged)
    }
}

/// Failure of the strict topological linearization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinearizeError {
    #[error("A cycle was detected among nodes {unvisited:?}")]
    Cycle {
        /// Ids that could not be placed, in ascending order.
        unvisited: Vec<NodeId>,
    },
}

impl LinearizeError {
    pub fn unvisited(&self) -> &[NodeId] {
        match self {
            LinearizeError::Cycle { unvisited } => unvisited,
        }
    }
}

/// Errors at the document load/save boundary.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to parse project JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project document must be a JSON object")]
    NotAnObject,

    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while preparing an export.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Terminal node {0} not found")]
    TerminalNotFound(NodeId),

    #[error("Nothing is selected for export")]
    EmptySelection,
}

/// Errors while loading an editor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Everything an [`Editor`](crate::editor::Editor) operation can fail with.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("No dialog is open")]
    NoModal,

    #[error("The open dialog needs input; submit it instead of confirming")]
    ModalNeedsInput,
}
