use super::{Applied, CommandContext, connection};
use crate::error::CommandError;
use crate::model::{
    Connection, CoreState, Node, NodeId, NodeTemplate, Point, Port, PortRef, PortSide,
    next_node_id, next_order_index,
};
use std::collections::BTreeSet;

fn find_node(state: &CoreState, id: NodeId) -> Result<&Node, CommandError> {
    state.node(id).ok_or(CommandError::NodeNotFound(id))
}

fn with_node(
    state: &CoreState,
    id: NodeId,
    edit: impl FnOnce(&mut Node),
) -> Result<(CoreState, Node), CommandError> {
    let mut next = state.clone();
    let node = next.node_mut(id).ok_or(CommandError::NodeNotFound(id))?;
    edit(node);
    let edited = node.clone();
    Ok((next, edited))
}

/// Fresh node id and order index for a node appended to `state`.
pub(super) fn allocate(state: &CoreState) -> Result<(NodeId, i64), CommandError> {
    let id = next_node_id(&state.nodes).ok_or(CommandError::IdSpaceExhausted("node id"))?;
    let order = next_order_index(&state.nodes)
        .ok_or(CommandError::IdSpaceExhausted("order index"))?;
    Ok((id, order))
}

fn instantiate(
    state: &CoreState,
    ctx: &CommandContext,
    template: NodeTemplate,
) -> Result<Node, CommandError> {
    let (id, order) = allocate(state)?;
    Ok(template.instantiate(id, order, &state.settings.node_color, ctx.node_size))
}

pub fn add_node(
    state: &CoreState,
    ctx: &CommandContext,
    template: NodeTemplate,
    pos: Point,
) -> Result<Applied, CommandError> {
    let mut node = instantiate(state, ctx, template)?;
    node.pos = pos;
    let message = format!("Node '{}' created.", node.title);
    let mut next = state.clone();
    next.nodes.push(node);
    Ok(Applied::success(next, message))
}

pub fn add_node_and_connect(
    state: &CoreState,
    ctx: &CommandContext,
    template: NodeTemplate,
    center: Point,
    from: &PortRef,
) -> Result<Applied, CommandError> {
    let mut node = instantiate(state, ctx, template)?;
    node.pos = center.offset(-node.size.width / 2.0, -node.size.height / 2.0);
    let first_input = node
        .inputs
        .first()
        .map(|p| p.id.clone())
        .ok_or(CommandError::NoInputPorts)?;

    let mut staged = state.clone();
    let to = PortRef::new(node.id, first_input);
    let title = node.title.clone();
    staged.nodes.push(node);
    connection::validate(&staged, ctx, from, &to)?;
    staged.connections.push(Connection::new(from.clone(), to));

    let source_title = find_node(state, from.node)?.title.clone();
    Ok(Applied::success(
        staged,
        format!("Node '{}' created and connected from '{}'.", title, source_title),
    ))
}

/// Replaces a node with an edited copy.
///
/// Title, description and port names are trimmed, ports left without a name
/// are dropped, the size is rounded, and connections to dropped ports go away.
pub fn update_node(state: &CoreState, updated: &Node) -> Result<Applied, CommandError> {
    find_node(state, updated.id)?;
    let clean_ports = |ports: &[Port]| -> Vec<Port> {
        ports
            .iter()
            .map(|p| Port::new(p.id.clone(), p.name.trim()))
            .filter(|p| !p.name.is_empty())
            .collect()
    };
    let mut cleaned = updated.clone();
    cleaned.title = updated.title.trim().to_string();
    cleaned.description = updated.description.trim().to_string();
    cleaned.inputs = clean_ports(&updated.inputs);
    cleaned.outputs = clean_ports(&updated.outputs);
    cleaned.size.width = updated.size.width.round();
    cleaned.size.height = updated.size.height.round();

    let message = format!("Node '{}' (ID: {}) updated.", cleaned.title, cleaned.id);
    let mut next = state.clone();
    if let Some(slot) = next.node_mut(cleaned.id) {
        *slot = cleaned;
    }
    let nodes = &next.nodes;
    next.connections.retain(|c| {
        let from_ok = nodes
            .iter()
            .any(|n| n.id == c.from_node && n.has_output(&c.from_port_id));
        let to_ok = nodes
            .iter()
            .any(|n| n.id == c.to_node && n.has_input(&c.to_port_id));
        from_ok && to_ok
    });
    Ok(Applied::info(next, message))
}

pub fn toggle_complete(state: &CoreState, id: NodeId) -> Result<Applied, CommandError> {
    let (next, node) = with_node(state, id, |n| n.is_complete = !n.is_complete)?;
    let status = if node.is_complete {
        "complete"
    } else {
        "incomplete"
    };
    Ok(Applied::info(
        next,
        format!("Node '{}' marked as {}.", node.title, status),
    ))
}

pub fn toggle_pin(state: &CoreState, id: NodeId) -> Result<Applied, CommandError> {
    let (next, node) = with_node(state, id, |n| n.is_pinned = !n.is_pinned)?;
    let status = if node.is_pinned { "pinned" } else { "unpinned" };
    Ok(Applied::info(next, format!("Node '{}' {}.", node.title, status)))
}

pub fn mark_all_incomplete(state: &CoreState) -> Result<Applied, CommandError> {
    if state.nodes.iter().all(|n| !n.is_complete) {
        return Err(CommandError::Unchanged);
    }
    let mut next = state.clone();
    for node in &mut next.nodes {
        node.is_complete = false;
    }
    Ok(Applied::warning(next, "All nodes were reset to incomplete."))
}

/// Removes nodes together with their connections and mininodes in one step.
pub fn delete_nodes(state: &CoreState, ids: &BTreeSet<NodeId>) -> Result<Applied, CommandError> {
    let Some(first) = ids.first() else {
        return Err(CommandError::EmptySelection);
    };
    let existing: BTreeSet<NodeId> = ids
        .iter()
        .copied()
        .filter(|id| state.node(*id).is_some())
        .collect();
    if existing.is_empty() {
        return Err(CommandError::NodeNotFound(*first));
    }

    let mut next = state.clone();
    next.nodes.retain(|n| !existing.contains(&n.id));
    next.connections
        .retain(|c| !existing.contains(&c.from_node) && !existing.contains(&c.to_node));
    next.mininodes.retain(|m| !existing.contains(&m.parent_id));

    let message = match existing.iter().next() {
        Some(id) if existing.len() == 1 => {
            let title = state.node(*id).map(|n| n.title.as_str()).unwrap_or("");
            format!("Node '{}' deleted.", title)
        }
        _ => format!("{} nodes deleted.", existing.len()),
    };
    Ok(Applied::warning(next, message))
}

pub fn add_port(state: &CoreState, id: NodeId, side: PortSide) -> Result<Applied, CommandError> {
    let (next, _) = with_node(state, id, |n| {
        let port = Port::new(n.fresh_port_id(side), "New");
        n.ports_mut(side).push(port);
    })?;
    let label = match side {
        PortSide::Input => "Input",
        PortSide::Output => "Output",
    };
    Ok(Applied::success(next, format!("{} port added to node.", label)))
}

/// Removes a port and every connection attached to it.
pub fn delete_port(state: &CoreState, id: NodeId, port: &str) -> Result<Applied, CommandError> {
    let node = find_node(state, id)?;
    if !node.has_input(port) && !node.has_output(port) {
        return Err(CommandError::PortNotFound {
            node: id,
            port: port.to_string(),
        });
    }
    let (mut next, _) = with_node(state, id, |n| {
        n.inputs.retain(|p| p.id != port);
        n.outputs.retain(|p| p.id != port);
    })?;
    let target = PortRef::new(id, port);
    next.connections
        .retain(|c| !c.leaves(&target) && !c.enters(&target));
    Ok(Applied::warning(next, "Port deleted."))
}
