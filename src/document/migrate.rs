//! Lenient reader for old or hand-edited documents.
//!
//! Missing fields get defaults, malformed enums are coerced, and records that
//! cannot be identified are dropped. Duplicate ids and dangling references are
//! removed afterwards by [`CoreState::prune_dangling`].

use super::{SCHEMA_VERSION, SaveData};
use crate::model::{
    CanvasObject, CheckboxPosition, Connection, CoreState, DEFAULT_NODE_COLOR, DocumentSettings,
    EditorMode, InputLogic, Mininode, MininodeIcon, Node, NodeId, Point, Port, Size,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

type Object = Map<String, Value>;

fn text(obj: &Object, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn text_or(obj: &Object, key: &str, default: &str) -> String {
    text(obj, key).unwrap_or_else(|| default.to_string())
}

fn flag(obj: &Object, key: &str, default: bool) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(default)
}

fn id(obj: &Object, key: &str) -> Option<u32> {
    obj.get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

fn typed<T: DeserializeOwned>(obj: &Object, key: &str) -> Option<T> {
    obj.get(key)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn objects<'a>(root: &'a Object, key: &str) -> impl Iterator<Item = &'a Object> {
    root.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn ports(obj: &Object, key: &str) -> Vec<Port> {
    obj.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|p| serde_json::from_value::<Port>(p.clone()).ok())
        .filter(|p| !p.id.is_empty())
        .collect()
}

fn node(obj: &Object, id: NodeId) -> Node {
    let input_logic = match obj.get("inputLogic").and_then(Value::as_str) {
        Some("OR") => InputLogic::Or,
        _ => InputLogic::And,
    };
    Node {
        id,
        pos: typed::<Point>(obj, "pos").unwrap_or_default(),
        title: text_or(obj, "title", "Untitled Node"),
        description: text_or(obj, "description", ""),
        color: text_or(obj, "color", DEFAULT_NODE_COLOR),
        size: typed::<Size>(obj, "size").unwrap_or_default(),
        inputs: ports(obj, "inputs"),
        outputs: ports(obj, "outputs"),
        is_complete: flag(obj, "isComplete", false),
        input_logic,
        difficulty: id_or(obj, "difficulty", 1),
        icon: text(obj, "icon"),
        icon_color: text(obj, "iconColor"),
        is_pinned: flag(obj, "isPinned", false),
        synthesis: text(obj, "synthesis"),
        order_index: obj
            .get("orderIndex")
            .and_then(Value::as_i64)
            .unwrap_or(i64::from(id)),
        time: id_or(obj, "time", 0),
    }
}

fn id_or(obj: &Object, key: &str, default: u32) -> u32 {
    id(obj, key).unwrap_or(default)
}

fn mininode(obj: &Object) -> Option<Mininode> {
    Some(Mininode {
        id: id(obj, "id")?,
        parent_id: id(obj, "parentId")?,
        title: text_or(obj, "title", "untitled.txt"),
        content: text_or(obj, "content", ""),
        icon: obj
            .get("icon")
            .and_then(Value::as_str)
            .and_then(MininodeIcon::from_tag)
            .unwrap_or_default(),
        pos: typed::<Point>(obj, "pos").unwrap_or_default(),
    })
}

fn connection(obj: &Object) -> Option<Connection> {
    Some(Connection {
        from_node: id(obj, "fromNode")?,
        from_port_id: text(obj, "fromPortId")?,
        to_node: id(obj, "toNode")?,
        to_port_id: text(obj, "toPortId")?,
        is_wireless: flag(obj, "isWireless", false),
    })
}

fn settings(root: &Object) -> DocumentSettings {
    let defaults = DocumentSettings::default();
    DocumentSettings {
        canvas_title: text_or(root, "canvasTitle", &defaults.canvas_title),
        node_color: text_or(root, "nodeColor", &defaults.node_color),
        background_color: text_or(root, "backgroundColor", &defaults.background_color),
        grid_color: text_or(root, "gridColor", &defaults.grid_color),
        show_mininode_previews: flag(
            root,
            "showMininodePreviews",
            defaults.show_mininode_previews,
        ),
        checkbox_position: typed::<CheckboxPosition>(root, "checkboxPosition")
            .unwrap_or_default(),
        context_menu_enabled: flag(root, "contextMenuEnabled", defaults.context_menu_enabled),
        default_editor_mode: typed::<EditorMode>(root, "defaultEditorMode").unwrap_or_default(),
        autosave_enabled: flag(root, "autosaveEnabled", defaults.autosave_enabled),
    }
}

/// Builds a document from loosely structured JSON. Never fails; anything
/// unusable is replaced by a default or dropped.
pub fn sanitize(value: &Value) -> SaveData {
    let empty = Object::new();
    let root = value.as_object().unwrap_or(&empty);

    let nodes = objects(root, "nodes")
        .filter_map(|obj| id(obj, "id").map(|node_id| node(obj, node_id)))
        .collect();

    let state = CoreState {
        nodes,
        mininodes: objects(root, "mininodes").filter_map(mininode).collect(),
        connections: objects(root, "connections").filter_map(connection).collect(),
        canvas_objects: objects(root, "canvasObjects")
            .filter_map(|obj| serde_json::from_value::<CanvasObject>(Value::Object(obj.clone())).ok())
            .collect(),
        settings: settings(root),
    };

    SaveData {
        state,
        schema_version: SCHEMA_VERSION,
        icon: text(root, "icon"),
    }
}
