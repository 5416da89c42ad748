use super::Applied;
use crate::error::CommandError;
use crate::model::{Connection, CoreState, Node, NodeId, Point, next_node_id};
use ahash::AHashMap;
use std::collections::BTreeSet;

/// Nodes and their internal connections copied from a selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl Clipboard {
    /// Copies the selected nodes and the connections running between them.
    pub fn copy(state: &CoreState, ids: &BTreeSet<NodeId>) -> Option<Self> {
        let nodes: Vec<Node> = state
            .nodes
            .iter()
            .filter(|n| ids.contains(&n.id))
            .cloned()
            .collect();
        if nodes.is_empty() {
            return None;
        }
        let connections = state
            .connections
            .iter()
            .filter(|c| ids.contains(&c.from_node) && ids.contains(&c.to_node))
            .cloned()
            .collect();
        Some(Self { nodes, connections })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a copy with fresh ids, its top-left corner moved to `at`.
    ///
    /// Pasted nodes start incomplete.
    pub fn paste_into(&self, state: &CoreState, at: Point) -> Result<Applied, CommandError> {
        if self.is_empty() {
            return Err(CommandError::EmptyClipboard);
        }
        let min_x = self.nodes.iter().map(|n| n.pos.x).fold(f64::INFINITY, f64::min);
        let min_y = self.nodes.iter().map(|n| n.pos.y).fold(f64::INFINITY, f64::min);

        let mut next = state.clone();
        let mut id_map: AHashMap<NodeId, NodeId> = AHashMap::new();
        for node in &self.nodes {
            let id =
                next_node_id(&next.nodes).ok_or(CommandError::IdSpaceExhausted("node id"))?;
            id_map.insert(node.id, id);
            next.nodes.push(Node {
                id,
                pos: Point::new(node.pos.x - min_x + at.x, node.pos.y - min_y + at.y),
                is_complete: false,
                ..node.clone()
            });
        }
        for conn in &self.connections {
            if let (Some(from), Some(to)) = (id_map.get(&conn.from_node), id_map.get(&conn.to_node))
            {
                next.connections.push(Connection {
                    from_node: *from,
                    to_node: *to,
                    ..conn.clone()
                });
            }
        }
        Ok(Applied::success(
            next,
            format!("{} node(s) pasted from the clipboard.", self.nodes.len()),
        ))
    }
}
