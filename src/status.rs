//! Activation status derived from the node graph.
//!
//! A node's status says which of its input ports carry a completed upstream
//! node and whether its AND/OR condition is currently satisfied. Status is a
//! pure function of the nodes and connections: it is never stored in a
//! snapshot and is rebuilt in full after every change.

use crate::model::{Connection, CoreState, InputLogic, Mininode, MininodeId, Node, NodeId};
use ahash::{AHashMap, AHashSet};
use std::collections::{BTreeMap, BTreeSet};

/// Activation status of a single node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeStatus {
    /// Input ports whose inbound connection comes from a completed node.
    pub active_inputs: BTreeSet<String>,
    /// Whether the node's input condition is met.
    pub is_condition_met: bool,
}

/// Status of every node, keyed by id.
pub type StatusMap = BTreeMap<NodeId, NodeStatus>;

/// Computes the activation status of every node.
///
/// Rules:
/// * a node without input ports is always ready;
/// * `AND` is met when every *wired* input port is active. With nothing wired
///   this is vacuously true;
/// * `OR` is met when at least one input port is active.
///
/// Connections pointing at unknown nodes are ignored.
pub fn compute_status(nodes: &[Node], connections: &[Connection]) -> StatusMap {
    let completed: AHashSet<NodeId> = nodes
        .iter()
        .filter(|n| n.is_complete)
        .map(|n| n.id)
        .collect();

    let mut incoming: AHashMap<NodeId, Vec<&Connection>> = AHashMap::new();
    for conn in connections {
        incoming.entry(conn.to_node).or_default().push(conn);
    }

    nodes
        .iter()
        .map(|node| {
            let inbound = incoming.get(&node.id).map(Vec::as_slice).unwrap_or(&[]);
            let connected: BTreeSet<&str> =
                inbound.iter().map(|c| c.to_port_id.as_str()).collect();
            let active_inputs: BTreeSet<String> = inbound
                .iter()
                .filter(|c| completed.contains(&c.from_node))
                .map(|c| c.to_port_id.clone())
                .collect();

            let is_condition_met = if node.inputs.is_empty() {
                true
            } else {
                match node.input_logic {
                    InputLogic::And => connected.len() == active_inputs.len(),
                    InputLogic::Or => !active_inputs.is_empty(),
                }
            };

            (
                node.id,
                NodeStatus {
                    active_inputs,
                    is_condition_met,
                },
            )
        })
        .collect()
}

/// Everything the editor derives from a [`CoreState`]: activation status plus
/// the lookup indices used by commands and exports.
#[derive(Debug, Clone, Default)]
pub struct DerivedState {
    pub status: StatusMap,
    node_index: AHashMap<NodeId, usize>,
    mininodes_by_parent: AHashMap<NodeId, Vec<MininodeId>>,
}

impl DerivedState {
    pub fn compute(state: &CoreState) -> Self {
        let node_index = state
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, n)| (n.id, idx))
            .collect();
        Self {
            status: compute_status(&state.nodes, &state.connections),
            node_index,
            mininodes_by_parent: group_mininodes(&state.mininodes),
        }
    }

    pub fn status_of(&self, id: NodeId) -> Option<&NodeStatus> {
        self.status.get(&id)
    }

    /// Position of a node inside `CoreState::nodes`.
    pub fn node_index(&self, id: NodeId) -> Option<usize> {
        self.node_index.get(&id).copied()
    }

    pub fn mininodes_of(&self, parent: NodeId) -> &[MininodeId] {
        self.mininodes_by_parent
            .get(&parent)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn group_mininodes(mininodes: &[Mininode]) -> AHashMap<NodeId, Vec<MininodeId>> {
    let mut grouped: AHashMap<NodeId, Vec<MininodeId>> = AHashMap::new();
    for m in mininodes {
        grouped.entry(m.parent_id).or_default().push(m.id);
    }
    grouped
}
