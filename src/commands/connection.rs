use super::{Applied, CommandContext, node};
use crate::config::OutputFanOut;
use crate::error::CommandError;
use crate::model::{Connection, CoreState, InputLogic, Node, Point, Port, PortRef, PortSide};

/// Checks whether a new connection `from -> to` may be added.
///
/// Rejects self-connections, unknown endpoints, an occupied input port, and,
/// under [`OutputFanOut::Single`], an output port that already has a wire.
pub fn validate(
    state: &CoreState,
    ctx: &CommandContext,
    from: &PortRef,
    to: &PortRef,
) -> Result<(), CommandError> {
    if from.node == to.node {
        return Err(CommandError::SelfConnection(from.node));
    }
    let source = state
        .node(from.node)
        .ok_or(CommandError::NodeNotFound(from.node))?;
    if !source.has_output(&from.port) {
        return Err(CommandError::PortNotFound {
            node: from.node,
            port: from.port.clone(),
        });
    }
    let target = state
        .node(to.node)
        .ok_or(CommandError::NodeNotFound(to.node))?;
    if !target.has_input(&to.port) {
        return Err(CommandError::PortNotFound {
            node: to.node,
            port: to.port.clone(),
        });
    }

    if state.connections.iter().any(|c| c.enters(to)) {
        return Err(CommandError::InputPortOccupied {
            node: to.node,
            port: to.port.clone(),
        });
    }
    if ctx.fan_out == OutputFanOut::Single && state.connections.iter().any(|c| c.leaves(from)) {
        return Err(CommandError::OutputPortOccupied {
            node: from.node,
            port: from.port.clone(),
        });
    }
    Ok(())
}

fn endpoints(state: &CoreState, conn: &Connection) -> (String, String) {
    let title = |id| {
        state
            .node(id)
            .map(|n| n.title.clone())
            .unwrap_or_else(|| format!("#{}", id))
    };
    (title(conn.from_node), title(conn.to_node))
}

fn not_found(conn: &Connection) -> CommandError {
    CommandError::ConnectionNotFound {
        from_node: conn.from_node,
        from_port: conn.from_port_id.clone(),
        to_node: conn.to_node,
        to_port: conn.to_port_id.clone(),
    }
}

pub fn connect(
    state: &CoreState,
    ctx: &CommandContext,
    from: &PortRef,
    to: &PortRef,
) -> Result<Applied, CommandError> {
    validate(state, ctx, from, to)?;
    let conn = Connection::new(from.clone(), to.clone());
    let (source, target) = endpoints(state, &conn);
    let mut next = state.clone();
    next.connections.push(conn);
    Ok(Applied::success(
        next,
        format!("Connection established: '{}' -> '{}'.", source, target),
    ))
}

pub fn disconnect(state: &CoreState, conn: &Connection) -> Result<Applied, CommandError> {
    let mut next = state.clone();
    let before = next.connections.len();
    next.connections.retain(|c| !c.same_endpoints(conn));
    if next.connections.len() == before {
        return Err(not_found(conn));
    }
    let (source, target) = endpoints(state, conn);
    Ok(Applied::warning(
        next,
        format!("Connection removed: '{}' -> '{}'.", source, target),
    ))
}

pub fn toggle_wireless(state: &CoreState, conn: &Connection) -> Result<Applied, CommandError> {
    let mut next = state.clone();
    let target = next
        .connections
        .iter_mut()
        .find(|c| c.same_endpoints(conn))
        .ok_or_else(|| not_found(conn))?;
    target.is_wireless = !target.is_wireless;
    let mode = if target.is_wireless {
        "wireless"
    } else {
        "wired"
    };
    let (source, dest) = endpoints(state, conn);
    Ok(Applied::info(
        next,
        format!(
            "Connection between '{}' and '{}' switched to {}.",
            source, dest, mode
        ),
    ))
}

/// Splits `A -> B` into `A -> new -> B` with a fresh node at the midpoint.
///
/// Both halves keep the original wireless flag.
pub fn insert_node(
    state: &CoreState,
    ctx: &CommandContext,
    conn: &Connection,
) -> Result<Applied, CommandError> {
    let existing = state
        .connections
        .iter()
        .find(|c| c.same_endpoints(conn))
        .ok_or_else(|| not_found(conn))?;
    let from = state
        .node(existing.from_node)
        .ok_or(CommandError::NodeNotFound(existing.from_node))?;
    let to = state
        .node(existing.to_node)
        .ok_or(CommandError::NodeNotFound(existing.to_node))?;
    let from_rank = from
        .output_rank(&existing.from_port_id)
        .ok_or_else(|| CommandError::PortNotFound {
            node: from.id,
            port: existing.from_port_id.clone(),
        })?;
    let to_rank = to
        .inputs
        .iter()
        .position(|p| p.id == existing.to_port_id)
        .ok_or_else(|| CommandError::PortNotFound {
            node: to.id,
            port: existing.to_port_id.clone(),
        })?;

    let from_y = from.pos.y + from.port_y(PortSide::Output, from_rank);
    let to_y = to.pos.y + to.port_y(PortSide::Input, to_rank);
    let mid = Point::new(
        (from.pos.x + from.size.width + to.pos.x) / 2.0,
        (from_y + to_y) / 2.0,
    );

    let (id, order_index) = node::allocate(state)?;
    let size = ctx.node_size;
    let node = Node {
        pos: mid.offset(-size.width / 2.0, -size.height / 2.0),
        color: state.settings.node_color.clone(),
        size,
        inputs: vec![Port::new("in_1", "I")],
        outputs: vec![Port::new("out_1", "O")],
        input_logic: InputLogic::And,
        order_index,
        ..Node::new(id, "Intermediate Node")
    };

    let first = Connection {
        is_wireless: existing.is_wireless,
        ..Connection::new(existing.source(), PortRef::new(id, "in_1"))
    };
    let second = Connection {
        is_wireless: existing.is_wireless,
        ..Connection::new(PortRef::new(id, "out_1"), existing.target())
    };

    let message = format!("Node '{}' inserted into a connection.", node.title);
    let mut next = state.clone();
    next.connections.retain(|c| !c.same_endpoints(conn));
    next.connections.push(first);
    next.connections.push(second);
    next.nodes.push(node);
    Ok(Applied::success(next, message))
}
