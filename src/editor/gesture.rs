use crate::config::EditorConfig;
use crate::model::{CoreState, NodeId, Point, Size};

/// Edge or corner grabbed by a resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Right,
    Bottom,
    BottomRight,
}

impl ResizeHandle {
    fn widens(self) -> bool {
        matches!(self, ResizeHandle::Right | ResizeHandle::BottomRight)
    }

    fn heightens(self) -> bool {
        matches!(self, ResizeHandle::Bottom | ResizeHandle::BottomRight)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GestureKind {
    MoveNodes(Vec<NodeId>),
    ResizeNode { node: NodeId, handle: ResizeHandle },
    MoveObjects(Vec<String>),
}

/// An uncommitted pointer interaction.
///
/// Every update is recomputed from `baseline`, so the live state never drifts
/// from what the pointer delta implies and cancelling is a plain restore.
#[derive(Debug, Clone)]
pub struct Gesture {
    pub kind: GestureKind,
    pub origin: Point,
    pub baseline: CoreState,
}

impl Gesture {
    pub fn new(kind: GestureKind, origin: Point, baseline: CoreState) -> Self {
        Self {
            kind,
            origin,
            baseline,
        }
    }

    /// The live state for the pointer at `pointer`.
    pub fn project(&self, pointer: Point, config: &EditorConfig) -> CoreState {
        let dx = pointer.x - self.origin.x;
        let dy = pointer.y - self.origin.y;
        let mut next = self.baseline.clone();
        match &self.kind {
            GestureKind::MoveNodes(ids) => {
                for node in next.nodes.iter_mut().filter(|n| ids.contains(&n.id)) {
                    node.pos = node.pos.offset(dx, dy);
                }
            }
            GestureKind::ResizeNode { node, handle } => {
                if let Some(node) = next.node_mut(*node) {
                    node.size = resized(node.size, *handle, dx, dy, config);
                }
            }
            GestureKind::MoveObjects(ids) => {
                for obj in next
                    .canvas_objects
                    .iter_mut()
                    .filter(|o| ids.iter().any(|id| id == o.id()))
                {
                    obj.translate(dx, dy);
                }
            }
        }
        next
    }
}

fn snap(value: f64, grid: f64) -> f64 {
    if grid > 0.0 {
        (value / grid).round() * grid
    } else {
        value
    }
}

fn resized(start: Size, handle: ResizeHandle, dx: f64, dy: f64, config: &EditorConfig) -> Size {
    let mut size = start;
    if handle.widens() {
        size.width = snap(start.width + dx, config.grid_snap).max(config.min_node_width);
    }
    if handle.heightens() {
        size.height = snap(start.height + dy, config.grid_snap).max(config.min_node_height);
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_snaps_and_clamps() {
        let config = EditorConfig::default();
        let start = Size::new(180.0, 80.0);
        let grown = resized(start, ResizeHandle::BottomRight, 23.0, 6.0, &config);
        assert_eq!(grown, Size::new(200.0, 90.0));

        let shrunk = resized(start, ResizeHandle::Right, -500.0, -500.0, &config);
        assert_eq!(shrunk, Size::new(100.0, 80.0));
    }
}
