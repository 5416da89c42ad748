//! Common test utilities for building documents.
use mindflow::prelude::*;

/// A node with the given input ports and a single `out_1` output.
#[allow(dead_code)]
pub fn node_with_inputs(id: NodeId, logic: InputLogic, inputs: &[&str]) -> Node {
    Node {
        input_logic: logic,
        inputs: inputs.iter().map(|p| Port::new(*p, *p)).collect(),
        ..Node::new(id, format!("Node {}", id))
    }
}

#[allow(dead_code)]
pub fn wire(from: NodeId, from_port: &str, to: NodeId, to_port: &str) -> Connection {
    Connection::new(PortRef::new(from, from_port), PortRef::new(to, to_port))
}

/// The reference scenario:
///
/// * node 1 has no inputs and is complete,
/// * node 2 (AND) takes one input from 1 and is incomplete,
/// * node 3 (OR) takes inputs from 1 and 2.
#[allow(dead_code)]
pub fn create_scenario() -> CoreState {
    let mut starter = node_with_inputs(1, InputLogic::And, &[]);
    starter.is_complete = true;
    CoreState {
        nodes: vec![
            starter,
            node_with_inputs(2, InputLogic::And, &["in_1"]),
            node_with_inputs(3, InputLogic::Or, &["in_1", "in_2"]),
        ],
        connections: vec![
            wire(1, "out_1", 2, "in_1"),
            wire(1, "out_1", 3, "in_1"),
            wire(2, "out_1", 3, "in_2"),
        ],
        ..CoreState::default()
    }
}

/// A straight chain `1 -> 2 -> ... -> n`, laid out top to bottom.
#[allow(dead_code)]
pub fn create_chain(n: NodeId) -> CoreState {
    let nodes = (1..=n)
        .map(|id| Node {
            pos: Point::new(0.0, id as f64 * 100.0),
            ..node_with_inputs(id, InputLogic::And, &["in_1"])
        })
        .collect();
    let connections = (1..n).map(|id| wire(id, "out_1", id + 1, "in_1")).collect();
    CoreState {
        nodes,
        connections,
        ..CoreState::default()
    }
}

/// Three nodes wired `1 -> 2 -> 3 -> 1`.
#[allow(dead_code)]
pub fn create_cycle() -> CoreState {
    let mut state = create_chain(3);
    state.connections.push(wire(3, "out_1", 1, "in_1"));
    state
}

#[allow(dead_code)]
pub fn editor_with(state: CoreState) -> Editor {
    Editor::with_state(state, EditorConfig::default())
}

/// A saved document in the current schema, as the editor writes it.
#[allow(dead_code)]
pub const SCENARIO_JSON: &str = r##"{
  "nodes": [
    {"id": 1, "pos": {"x": 0, "y": 0}, "title": "Start", "description": "", "color": "#475569",
     "size": {"width": 180, "height": 80}, "inputs": [], "outputs": [{"id": "out_1", "name": "Output"}],
     "isComplete": true, "inputLogic": "AND", "difficulty": 1, "isPinned": false, "orderIndex": 1, "time": 0},
    {"id": 2, "pos": {"x": 0, "y": 150}, "title": "Middle", "description": "", "color": "#475569",
     "size": {"width": 180, "height": 80}, "inputs": [{"id": "in_1", "name": "Input"}],
     "outputs": [{"id": "out_1", "name": "Output"}],
     "isComplete": false, "inputLogic": "AND", "difficulty": 2, "isPinned": false, "orderIndex": 2, "time": 15},
    {"id": 3, "pos": {"x": 0, "y": 300}, "title": "End", "description": "", "color": "#475569",
     "size": {"width": 180, "height": 80},
     "inputs": [{"id": "in_1", "name": "A"}, {"id": "in_2", "name": "B"}], "outputs": [],
     "isComplete": false, "inputLogic": "OR", "difficulty": 1, "isPinned": false, "orderIndex": 3, "time": 0}
  ],
  "mininodes": [
    {"id": 1001, "parentId": 2, "title": "notes.txt", "content": "a < b", "icon": "txt", "pos": {"x": 0, "y": 0}}
  ],
  "connections": [
    {"fromNode": 1, "fromPortId": "out_1", "toNode": 2, "toPortId": "in_1", "isWireless": false},
    {"fromNode": 1, "fromPortId": "out_1", "toNode": 3, "toPortId": "in_1", "isWireless": false},
    {"fromNode": 2, "fromPortId": "out_1", "toNode": 3, "toPortId": "in_2", "isWireless": true}
  ],
  "canvasObjects": [],
  "canvasTitle": "Scenario",
  "nodeColor": "#475569",
  "backgroundColor": "#202c3c",
  "gridColor": "#3b4a60",
  "showMininodePreviews": false,
  "checkboxPosition": "left",
  "contextMenuEnabled": true,
  "defaultEditorMode": "split",
  "autosaveEnabled": false,
  "schemaVersion": 6
}"##;

#[allow(dead_code)]
pub fn rect(id: &str, x: f64, y: f64) -> CanvasObject {
    CanvasObject::Rect(mindflow::model::Shape {
        id: id.to_string(),
        pos: Point::new(x, y),
        size: Size::new(100.0, 60.0),
        fill_color: "#000000".to_string(),
        stroke_color: "#ffffff".to_string(),
        stroke_width: 2.0,
        fill_opacity: None,
        stroke_opacity: None,
        is_swarm: false,
    })
}
