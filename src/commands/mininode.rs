use super::Applied;
use crate::error::CommandError;
use crate::model::{CoreState, Mininode, MininodeId, NodeId, next_mininode_id};

fn node_title(state: &CoreState, id: NodeId) -> Result<String, CommandError> {
    state
        .node(id)
        .map(|n| n.title.clone())
        .ok_or(CommandError::NodeNotFound(id))
}

pub fn add(state: &CoreState, parent: NodeId) -> Result<Applied, CommandError> {
    let parent_title = node_title(state, parent)?;
    let id = next_mininode_id(&state.mininodes)
        .ok_or(CommandError::IdSpaceExhausted("mininode id"))?;
    let mininode = Mininode::new(id, parent);
    let message = format!(
        "Mininode '{}' attached to '{}'.",
        mininode.title, parent_title
    );
    let mut next = state.clone();
    next.mininodes.push(mininode);
    Ok(Applied::success(next, message))
}

pub fn update(state: &CoreState, updated: &Mininode) -> Result<Applied, CommandError> {
    state
        .mininode(updated.id)
        .ok_or(CommandError::MininodeNotFound(updated.id))?;
    node_title(state, updated.parent_id)?;
    let mut next = state.clone();
    if let Some(slot) = next.mininodes.iter_mut().find(|m| m.id == updated.id) {
        *slot = updated.clone();
    }
    Ok(Applied::info(
        next,
        format!("Mininode '{}' saved.", updated.title),
    ))
}

pub fn delete(state: &CoreState, id: MininodeId) -> Result<Applied, CommandError> {
    let removed = state
        .mininode(id)
        .ok_or(CommandError::MininodeNotFound(id))?;
    let message = format!("Mininode '{}' deleted.", removed.title);
    let mut next = state.clone();
    next.mininodes.retain(|m| m.id != id);
    Ok(Applied::warning(next, message))
}

/// Re-parents a mininode. Moving onto its current parent changes nothing.
pub fn move_to(
    state: &CoreState,
    id: MininodeId,
    new_parent: NodeId,
) -> Result<Applied, CommandError> {
    let mininode = state
        .mininode(id)
        .ok_or(CommandError::MininodeNotFound(id))?;
    if mininode.parent_id == new_parent {
        return Err(CommandError::Unchanged);
    }
    let to_title = node_title(state, new_parent)?;
    let from_title = node_title(state, mininode.parent_id).unwrap_or_default();
    let message = format!(
        "Mininode '{}' moved from '{}' to '{}'.",
        mininode.title, from_title, to_title
    );

    let mut next = state.clone();
    if let Some(slot) = next.mininodes.iter_mut().find(|m| m.id == id) {
        slot.parent_id = new_parent;
    }
    Ok(Applied::success(next, message))
}
