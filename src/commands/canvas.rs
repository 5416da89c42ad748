use super::Applied;
use crate::error::CommandError;
use crate::model::{CanvasObject, CoreState, StylePatch};
use std::collections::BTreeSet;

pub fn add(state: &CoreState, obj: &CanvasObject) -> Result<Applied, CommandError> {
    if state.canvas_object(obj.id()).is_some() {
        return Err(CommandError::DuplicateCanvasObject(obj.id().to_string()));
    }
    let mut next = state.clone();
    next.canvas_objects.push(obj.clone());
    Ok(Applied::info(next, "Drawing object created."))
}

pub fn update(state: &CoreState, obj: &CanvasObject) -> Result<Applied, CommandError> {
    let mut next = state.clone();
    let slot = next
        .canvas_objects
        .iter_mut()
        .find(|o| o.id() == obj.id())
        .ok_or_else(|| CommandError::CanvasObjectNotFound(obj.id().to_string()))?;
    *slot = obj.clone();
    Ok(Applied::success(next, "Drawing object updated."))
}

pub fn delete(state: &CoreState, ids: &BTreeSet<String>) -> Result<Applied, CommandError> {
    if ids.is_empty() {
        return Err(CommandError::EmptySelection);
    }
    let mut next = state.clone();
    next.canvas_objects.retain(|o| !ids.contains(o.id()));
    let removed = state.canvas_objects.len() - next.canvas_objects.len();
    if removed == 0 {
        let missing = ids.iter().next().cloned().unwrap_or_default();
        return Err(CommandError::CanvasObjectNotFound(missing));
    }
    Ok(Applied::warning(
        next,
        format!("{} drawing object(s) deleted.", removed),
    ))
}

pub fn restyle(
    state: &CoreState,
    ids: &BTreeSet<String>,
    patch: &StylePatch,
) -> Result<Applied, CommandError> {
    if ids.is_empty() {
        return Err(CommandError::EmptySelection);
    }
    let mut next = state.clone();
    for obj in next
        .canvas_objects
        .iter_mut()
        .filter(|o| ids.contains(o.id()))
    {
        obj.apply_style(patch);
    }
    if next == *state {
        return Err(CommandError::Unchanged);
    }
    Ok(Applied::info(next, "Drawing style updated."))
}

/// Flips a rectangle between a plain shape and a swarm container.
pub fn toggle_swarm(state: &CoreState, id: &str) -> Result<Applied, CommandError> {
    let mut next = state.clone();
    let obj = next
        .canvas_objects
        .iter_mut()
        .find(|o| o.id() == id)
        .ok_or_else(|| CommandError::CanvasObjectNotFound(id.to_string()))?;
    let CanvasObject::Rect(shape) = obj else {
        return Err(CommandError::Unchanged);
    };
    shape.is_swarm = !shape.is_swarm;
    let kind = if shape.is_swarm { "swarm" } else { "shape" };
    Ok(Applied::success(
        next,
        format!("Object converted into a {}.", kind),
    ))
}
