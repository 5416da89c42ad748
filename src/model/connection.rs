use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// One end of a connection: a port on a specific node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortRef {
    pub node: NodeId,
    pub port: String,
}

impl PortRef {
    pub fn new(node: NodeId, port: impl Into<String>) -> Self {
        Self {
            node,
            port: port.into(),
        }
    }
}

/// A directed port-to-port edge.
///
/// A connection is identified by its four endpoint fields; `is_wireless` only
/// changes how it is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub from_node: NodeId,
    pub from_port_id: String,
    pub to_node: NodeId,
    pub to_port_id: String,
    #[serde(default)]
    pub is_wireless: bool,
}

impl Connection {
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self {
            from_node: from.node,
            from_port_id: from.port,
            to_node: to.node,
            to_port_id: to.port,
            is_wireless: false,
        }
    }

    pub fn source(&self) -> PortRef {
        PortRef::new(self.from_node, self.from_port_id.clone())
    }

    pub fn target(&self) -> PortRef {
        PortRef::new(self.to_node, self.to_port_id.clone())
    }

    /// Endpoint equality, ignoring presentation flags.
    pub fn same_endpoints(&self, other: &Connection) -> bool {
        self.from_node == other.from_node
            && self.from_port_id == other.from_port_id
            && self.to_node == other.to_node
            && self.to_port_id == other.to_port_id
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.from_node == node || self.to_node == node
    }

    pub fn leaves(&self, port: &PortRef) -> bool {
        self.from_node == port.node && self.from_port_id == port.port
    }

    pub fn enters(&self, port: &PortRef) -> bool {
        self.to_node == port.node && self.to_port_id == port.port
    }
}
