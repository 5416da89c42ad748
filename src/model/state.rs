use super::canvas::CanvasObject;
use super::connection::Connection;
use super::mininode::{Mininode, MininodeId};
use super::node::{Node, NodeId};
use serde::{Deserialize, Serialize};

pub const DEFAULT_NODE_COLOR: &str = "#475569";
pub const DEFAULT_BACKGROUND_COLOR: &str = "#202c3c";
pub const DEFAULT_GRID_COLOR: &str = "#3b4a60";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckboxPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Edit,
    #[default]
    Split,
    Preview,
}

/// Document-level settings stored alongside the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    pub canvas_title: String,
    pub node_color: String,
    pub background_color: String,
    pub grid_color: String,
    pub show_mininode_previews: bool,
    pub checkbox_position: CheckboxPosition,
    pub context_menu_enabled: bool,
    pub default_editor_mode: EditorMode,
    pub autosave_enabled: bool,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            canvas_title: "Untitled".to_string(),
            node_color: DEFAULT_NODE_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            grid_color: DEFAULT_GRID_COLOR.to_string(),
            show_mininode_previews: false,
            checkbox_position: CheckboxPosition::Left,
            context_menu_enabled: true,
            default_editor_mode: EditorMode::Split,
            autosave_enabled: false,
        }
    }
}

/// The snapshot unit of undo/redo: everything that defines a document.
///
/// Holds no derived data. Activation status and lookup indices are rebuilt
/// from it by [`crate::status::DerivedState::compute`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreState {
    pub nodes: Vec<Node>,
    pub mininodes: Vec<Mininode>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub canvas_objects: Vec<CanvasObject>,
    #[serde(flatten)]
    pub settings: DocumentSettings,
}

impl CoreState {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn mininode(&self, id: MininodeId) -> Option<&Mininode> {
        self.mininodes.iter().find(|m| m.id == id)
    }

    pub fn canvas_object(&self, id: &str) -> Option<&CanvasObject> {
        self.canvas_objects.iter().find(|o| o.id() == id)
    }

    /// Keeps the first node and mininode for each id, drops self-connections
    /// and connections whose endpoints no longer exist, keeps only the first
    /// inbound connection per input port, and drops mininodes without a parent.
    ///
    /// Returns the number of removed records.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.nodes.len() + self.connections.len() + self.mininodes.len();

        let mut node_ids = ahash::AHashSet::new();
        self.nodes.retain(|n| node_ids.insert(n.id));
        let mut mininode_ids = ahash::AHashSet::new();
        self.mininodes.retain(|m| mininode_ids.insert(m.id));

        let nodes = &self.nodes;
        let mut occupied = ahash::AHashSet::new();
        self.connections.retain(|c| {
            let from_ok = nodes
                .iter()
                .any(|n| n.id == c.from_node && n.has_output(&c.from_port_id));
            let to_ok = nodes
                .iter()
                .any(|n| n.id == c.to_node && n.has_input(&c.to_port_id));
            c.from_node != c.to_node
                && from_ok
                && to_ok
                && occupied.insert((c.to_node, c.to_port_id.clone()))
        });
        self.mininodes
            .retain(|m| nodes.iter().any(|n| n.id == m.parent_id));
        before - (self.nodes.len() + self.connections.len() + self.mininodes.len())
    }
}
