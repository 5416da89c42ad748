use serde::{Deserialize, Serialize};

/// Identifier of a node. Fresh ids are `max(existing) + 1`, starting at 1.
pub type NodeId = u32;

/// A point on the canvas, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 180.0,
            height: 80.0,
        }
    }
}

/// A named connection point on one side of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    pub name: String,
}

impl Port {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Which port list of a node an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    Input,
    Output,
}

impl PortSide {
    fn prefix(self) -> &'static str {
        match self {
            PortSide::Input => "in",
            PortSide::Output => "out",
        }
    }
}

/// How a node combines the completion state of its wired input ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InputLogic {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

/// A graph vertex representing one step of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub pos: Point,
    pub title: String,
    pub description: String,
    pub color: String,
    pub size: Size,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    pub is_complete: bool,
    pub input_logic: InputLogic,
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    pub is_pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<String>,
    pub order_index: i64,
    /// Estimated effort in minutes.
    #[serde(default)]
    pub time: u32,
}

fn default_difficulty() -> u32 {
    1
}

impl Node {
    /// Creates a plain node with one input and one output port.
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            pos: Point::default(),
            title: title.into(),
            description: String::new(),
            color: crate::model::DEFAULT_NODE_COLOR.to_string(),
            size: Size::default(),
            inputs: vec![Port::new("in_1", "Input")],
            outputs: vec![Port::new("out_1", "Output")],
            is_complete: false,
            input_logic: InputLogic::And,
            difficulty: 1,
            icon: None,
            icon_color: None,
            is_pinned: false,
            synthesis: None,
            order_index: id as i64,
            time: 0,
        }
    }

    pub fn ports(&self, side: PortSide) -> &[Port] {
        match side {
            PortSide::Input => &self.inputs,
            PortSide::Output => &self.outputs,
        }
    }

    pub fn ports_mut(&mut self, side: PortSide) -> &mut Vec<Port> {
        match side {
            PortSide::Input => &mut self.inputs,
            PortSide::Output => &mut self.outputs,
        }
    }

    pub fn has_input(&self, port_id: &str) -> bool {
        self.inputs.iter().any(|p| p.id == port_id)
    }

    pub fn has_output(&self, port_id: &str) -> bool {
        self.outputs.iter().any(|p| p.id == port_id)
    }

    /// Position of an output port in declaration order.
    pub fn output_rank(&self, port_id: &str) -> Option<usize> {
        self.outputs.iter().position(|p| p.id == port_id)
    }

    /// Returns a port id for `side` that is not used by any port of this node.
    ///
    /// Ids take the form `in_<n>` / `out_<n>` with the smallest free `n`, so the
    /// result only depends on the node itself.
    pub fn fresh_port_id(&self, side: PortSide) -> String {
        let prefix = side.prefix();
        (1..)
            .map(|n| format!("{}_{}", prefix, n))
            .find(|candidate| {
                !self
                    .inputs
                    .iter()
                    .chain(self.outputs.iter())
                    .any(|p| &p.id == candidate)
            })
            .unwrap_or_else(|| format!("{}_0", prefix))
    }

    /// Vertical offset of a port's anchor relative to the node's top edge.
    pub fn port_y(&self, side: PortSide, index: usize) -> f64 {
        let total = self.ports(side).len();
        if total <= 1 {
            return self.size.height / 2.0;
        }
        (self.size.height / (total as f64 + 1.0)) * (index as f64 + 1.0)
    }
}

/// Starting shapes offered by the "add node" commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeTemplate {
    #[default]
    Normal,
    Starter,
    Finish,
    And,
    Or,
    Empty,
}

impl NodeTemplate {
    /// Builds a node for this template with ids `id` and `order_index`.
    pub fn instantiate(self, id: NodeId, order_index: i64, color: &str, size: Size) -> Node {
        let mut node = Node {
            color: color.to_string(),
            size,
            order_index,
            ..Node::new(id, "New Node")
        };
        let pair = || {
            vec![
                Port::new("in_1", "Input A"),
                Port::new("in_2", "Input B"),
            ]
        };
        match self {
            NodeTemplate::Normal => {}
            NodeTemplate::Starter => {
                node.title = "Start Node".to_string();
                node.inputs.clear();
            }
            NodeTemplate::Finish => {
                node.title = "Finish Node".to_string();
                node.outputs.clear();
            }
            NodeTemplate::And => {
                node.title = "AND Node".to_string();
                node.icon = Some("node-and".to_string());
                node.inputs = pair();
                node.input_logic = InputLogic::And;
            }
            NodeTemplate::Or => {
                node.title = "OR Node".to_string();
                node.icon = Some("node-or".to_string());
                node.inputs = pair();
                node.input_logic = InputLogic::Or;
            }
            NodeTemplate::Empty => {
                node.title = "Empty Node".to_string();
                node.inputs.clear();
                node.outputs.clear();
            }
        }
        node
    }
}

/// Next free node id: `max + 1`, or 1 for an empty graph.
///
/// `None` once the largest id is `NodeId::MAX`.
pub fn next_node_id(nodes: &[Node]) -> Option<NodeId> {
    match nodes.iter().map(|n| n.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}

/// Next order index: `max + 1`, or 1 for an empty graph.
pub fn next_order_index(nodes: &[Node]) -> Option<i64> {
    match nodes.iter().map(|n| n.order_index).max() {
        Some(max) => max.checked_add(1),
        None => Some(1),
    }
}
