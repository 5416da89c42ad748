use super::node::{Point, Size};
use serde::{Deserialize, Serialize};

/// A freeform drawing primitive. Independent of the node graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CanvasObject {
    Rect(Shape),
    Ellipse(Shape),
    Line(Line),
    Text(TextBox),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub id: String,
    pub pos: Point,
    pub size: Size,
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
    #[serde(default)]
    pub is_swarm: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: String,
    pub start: Point,
    pub end: Point,
    pub stroke_color: String,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_opacity: Option<f64>,
    #[serde(default)]
    pub start_arrow: bool,
    #[serde(default)]
    pub end_arrow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBox {
    pub id: String,
    pub pos: Point,
    pub text: String,
    pub font_size: f64,
    pub color: String,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub text_align: TextAlign,
}

/// Partial style update applied to a selection of canvas objects.
///
/// Fields that do not apply to an object's kind are ignored for that object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StylePatch {
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub fill_opacity: Option<f64>,
    pub stroke_opacity: Option<f64>,
}

impl CanvasObject {
    pub fn id(&self) -> &str {
        match self {
            CanvasObject::Rect(s) | CanvasObject::Ellipse(s) => &s.id,
            CanvasObject::Line(l) => &l.id,
            CanvasObject::Text(t) => &t.id,
        }
    }

    /// Moves the object by a delta.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            CanvasObject::Rect(s) | CanvasObject::Ellipse(s) => s.pos = s.pos.offset(dx, dy),
            CanvasObject::Line(l) => {
                l.start = l.start.offset(dx, dy);
                l.end = l.end.offset(dx, dy);
            }
            CanvasObject::Text(t) => t.pos = t.pos.offset(dx, dy),
        }
    }

    pub fn apply_style(&mut self, patch: &StylePatch) {
        match self {
            CanvasObject::Rect(s) | CanvasObject::Ellipse(s) => {
                if let Some(c) = &patch.fill_color {
                    s.fill_color = c.clone();
                }
                if let Some(c) = &patch.stroke_color {
                    s.stroke_color = c.clone();
                }
                if let Some(w) = patch.stroke_width {
                    s.stroke_width = w;
                }
                if patch.fill_opacity.is_some() {
                    s.fill_opacity = patch.fill_opacity;
                }
                if patch.stroke_opacity.is_some() {
                    s.stroke_opacity = patch.stroke_opacity;
                }
            }
            CanvasObject::Line(l) => {
                if let Some(c) = &patch.stroke_color {
                    l.stroke_color = c.clone();
                }
                if let Some(w) = patch.stroke_width {
                    l.stroke_width = w;
                }
            }
            CanvasObject::Text(_) => {}
        }
    }
}
