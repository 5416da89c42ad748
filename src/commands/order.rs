use super::Applied;
use crate::error::CommandError;
use crate::linearize::{Linearizer, TieBreak};
use crate::model::{CoreState, NodeId};
use ahash::AHashMap;
use std::collections::BTreeSet;

fn assign(state: &CoreState, order: &[NodeId], floor: i64) -> CoreState {
    let ranks: AHashMap<NodeId, i64> = order
        .iter()
        .enumerate()
        .map(|(rank, id)| (*id, floor + rank as i64))
        .collect();
    let mut next = state.clone();
    for node in &mut next.nodes {
        if let Some(rank) = ranks.get(&node.id) {
            node.order_index = *rank;
        }
    }
    next
}

/// Renumbers every node `1..=N` in topological order, breaking ties by position.
///
/// A cycle rejects the command; there is no fallback ordering here.
pub fn reorganize(state: &CoreState) -> Result<Applied, CommandError> {
    let order = Linearizer::new(&state.nodes, &state.connections, TieBreak::Position).strict()?;
    Ok(Applied::success(
        assign(state, &order, 1),
        "Order index of all nodes reorganized.",
    ))
}

/// Renumbers the selected nodes densely, starting at the lowest order index
/// already present in the selection. Other nodes keep their index.
pub fn reorganize_selection(
    state: &CoreState,
    ids: &BTreeSet<NodeId>,
) -> Result<Applied, CommandError> {
    let floor = state
        .nodes
        .iter()
        .filter(|n| ids.contains(&n.id))
        .map(|n| n.order_index)
        .min()
        .ok_or(CommandError::EmptySelection)?;
    let order = Linearizer::new(&state.nodes, &state.connections, TieBreak::Position)
        .restrict_to(ids.iter().copied())
        .strict()?;
    Ok(Applied::success(
        assign(state, &order, floor),
        format!("Order index reorganized for {} selected nodes.", order.len()),
    ))
}
