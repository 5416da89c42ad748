//! Topological ordering of nodes.
//!
//! Kahn's algorithm with deterministic tie-breaks. Two policies sit on top of
//! the same ordering:
//!
//! * [`Linearizer::strict`] reports a cycle as an error and produces no order;
//! * [`Linearizer::with_fallback`] degrades to a plain `order_index` sort over
//!   every node and records the cycle it hit.

use crate::error::LinearizeError;
use crate::model::{Connection, Node, NodeId};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::{BTreeSet, VecDeque};

/// Key used to order nodes that become ready at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    /// Ascending `order_index`. Used by ordered export.
    OrderIndex,
    /// Top-to-bottom, then left-to-right. Used by reorganize.
    Position,
}

impl TieBreak {
    pub fn compare(self, a: &Node, b: &Node) -> Ordering {
        match self {
            TieBreak::OrderIndex => a.order_index.cmp(&b.order_index),
            TieBreak::Position => a
                .pos
                .y
                .total_cmp(&b.pos.y)
                .then_with(|| a.pos.x.total_cmp(&b.pos.x)),
        }
    }
}

/// Result of the soft policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linearization {
    pub order: Vec<NodeId>,
    /// Set when a cycle forced the `order_index` fallback.
    pub cycle: Option<LinearizeError>,
}

impl Linearization {
    pub fn is_degraded(&self) -> bool {
        self.cycle.is_some()
    }
}

/// Orders a set of nodes consistently with the direction of their connections.
pub struct Linearizer<'a> {
    nodes: &'a [Node],
    connections: &'a [Connection],
    subset: Option<BTreeSet<NodeId>>,
    tie_break: TieBreak,
}

impl<'a> Linearizer<'a> {
    pub fn new(nodes: &'a [Node], connections: &'a [Connection], tie_break: TieBreak) -> Self {
        Self {
            nodes,
            connections,
            subset: None,
            tie_break,
        }
    }

    /// Restricts ordering to `ids`. Connections leaving the subset are ignored.
    pub fn restrict_to(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.subset = Some(ids.into_iter().collect());
        self
    }

    /// Restricts ordering to the flow that ends at `terminal`.
    pub fn ending_at(self, terminal: NodeId) -> Self {
        let flow = ancestors(terminal, self.connections);
        self.restrict_to(flow)
    }

    fn members(&self) -> Vec<&'a Node> {
        match &self.subset {
            Some(ids) => self.nodes.iter().filter(|n| ids.contains(&n.id)).collect(),
            None => self.nodes.iter().collect(),
        }
    }

    /// Returns the topological order, or the ids that could not be placed.
    ///
    /// Out-edges of a node are released in the declaration order of its output
    /// ports. Nodes released by the same step are queued sorted by the tie-break
    /// key; equal keys keep port order.
    pub fn strict(&self) -> Result<Vec<NodeId>, LinearizeError> {
        let members = self.members();
        let by_id: AHashMap<NodeId, &Node> = members.iter().map(|n| (n.id, *n)).collect();

        let mut in_degree: AHashMap<NodeId, usize> = members.iter().map(|n| (n.id, 0)).collect();
        let mut out_edges: AHashMap<NodeId, Vec<&Connection>> = AHashMap::new();
        for conn in self.connections {
            if by_id.contains_key(&conn.from_node) && by_id.contains_key(&conn.to_node) {
                out_edges.entry(conn.from_node).or_default().push(conn);
                *in_degree.entry(conn.to_node).or_default() += 1;
            }
        }

        let mut seeds: Vec<&Node> = members
            .iter()
            .copied()
            .filter(|n| in_degree.get(&n.id) == Some(&0))
            .collect();
        seeds.sort_by(|a, b| self.tie_break.compare(a, b));
        let mut queue: VecDeque<&Node> = seeds.into();

        let mut order = Vec::with_capacity(members.len());
        while let Some(node) = queue.pop_front() {
            order.push(node.id);

            let mut edges = out_edges.remove(&node.id).unwrap_or_default();
            edges.sort_by_key(|c| node.output_rank(&c.from_port_id).unwrap_or(usize::MAX));

            let mut released = Vec::new();
            for conn in edges {
                if let Some(degree) = in_degree.get_mut(&conn.to_node) {
                    *degree -= 1;
                    if *degree == 0 {
                        if let Some(target) = by_id.get(&conn.to_node) {
                            released.push(*target);
                        }
                    }
                }
            }
            released.sort_by(|a, b| self.tie_break.compare(a, b));
            queue.extend(released);
        }

        if order.len() < members.len() {
            let placed: AHashSet<NodeId> = order.iter().copied().collect();
            let unvisited = members
                .iter()
                .map(|n| n.id)
                .filter(|id| !placed.contains(id))
                .sorted()
                .collect();
            return Err(LinearizeError::Cycle { unvisited });
        }
        Ok(order)
    }

    /// Like [`strict`](Self::strict), but on a cycle falls back to sorting
    /// *all* nodes (ignoring any restriction) by `order_index`.
    pub fn with_fallback(&self) -> Linearization {
        match self.strict() {
            Ok(order) => Linearization { order, cycle: None },
            Err(cycle) => {
                tracing::warn!(
                    unvisited = ?cycle.unvisited(),
                    "cycle detected, falling back to order_index ordering"
                );
                Linearization {
                    order: order_index_sort(self.nodes),
                    cycle: Some(cycle),
                }
            }
        }
    }
}

/// Node ids sorted by `order_index`; equal keys keep document order.
pub fn order_index_sort(nodes: &[Node]) -> Vec<NodeId> {
    nodes
        .iter()
        .sorted_by_key(|n| n.order_index)
        .map(|n| n.id)
        .collect()
}

/// Every node from which `terminal` can be reached, `terminal` included.
///
/// Breadth-first walk over inbound connections.
pub fn ancestors(terminal: NodeId, connections: &[Connection]) -> BTreeSet<NodeId> {
    let mut inbound: AHashMap<NodeId, Vec<NodeId>> = AHashMap::new();
    for conn in connections {
        inbound.entry(conn.to_node).or_default().push(conn.from_node);
    }

    let mut visited = BTreeSet::new();
    let mut queue = VecDeque::from([terminal]);
    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(sources) = inbound.get(&current) {
            queue.extend(sources.iter().filter(|id| !visited.contains(*id)));
        }
    }
    visited
}

/// Nodes with no outgoing connections, in document order.
pub fn end_nodes(nodes: &[Node], connections: &[Connection]) -> Vec<NodeId> {
    let sources: AHashSet<NodeId> = connections.iter().map(|c| c.from_node).collect();
    nodes
        .iter()
        .map(|n| n.id)
        .filter(|id| !sources.contains(id))
        .collect()
}
