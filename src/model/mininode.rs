use super::node::{NodeId, Point};
use serde::{Deserialize, Serialize};

pub type MininodeId = u32;

/// Id handed out when a document has no mininodes yet.
pub const FIRST_MININODE_ID: MininodeId = 1001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MininodeIcon {
    #[default]
    Txt,
    Py,
    Js,
    Html,
    Css,
    Json,
    Bat,
    Ps1,
    Generic,
    Php,
    Cmd,
}

impl MininodeIcon {
    /// Parses the serialized tag, returning `None` for unknown icons.
    pub fn from_tag(tag: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(tag.to_string())).ok()
    }
}

/// A small note or snippet owned by exactly one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mininode {
    pub id: MininodeId,
    pub parent_id: NodeId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub icon: MininodeIcon,
    /// Offset from the parent's bottom-center anchor.
    #[serde(default)]
    pub pos: Point,
}

impl Mininode {
    pub fn new(id: MininodeId, parent_id: NodeId) -> Self {
        Self {
            id,
            parent_id,
            title: "new_note.txt".to_string(),
            content: String::new(),
            icon: MininodeIcon::Txt,
            pos: Point::default(),
        }
    }
}

pub fn next_mininode_id(mininodes: &[Mininode]) -> Option<MininodeId> {
    match mininodes.iter().map(|m| m.id).max() {
        Some(max) => max.checked_add(1),
        None => Some(FIRST_MININODE_ID),
    }
}
