//! Linear exports of a document.
//!
//! An export is a title plus a numbered sequence of nodes, each carrying its
//! mininodes. [`ordered_export`] follows graph topology and degrades to an
//! `order_index` sort when the graph has a cycle; [`selection_export`] only
//! sorts by `order_index`. [`Export::to_html`] renders either one.

use crate::error::{ExportError, LinearizeError};
use crate::linearize::{Linearizer, TieBreak};
use crate::model::{CoreState, Mininode, Node, NodeId};
use std::collections::BTreeSet;

/// One exported node with its display-only sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportEntry {
    /// Position in the export, starting at 1.
    pub sequence: usize,
    pub node: Node,
    pub mininodes: Vec<Mininode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub title: String,
    pub entries: Vec<ExportEntry>,
    /// The cycle that forced the `order_index` fallback, if any.
    pub degraded: Option<LinearizeError>,
}

impl Export {
    fn build(state: &CoreState, title: String, ids: &[NodeId], degraded: Option<LinearizeError>) -> Self {
        let entries = ids
            .iter()
            .filter_map(|id| state.node(*id))
            .enumerate()
            .map(|(i, node)| ExportEntry {
                sequence: i + 1,
                node: node.clone(),
                mininodes: state
                    .mininodes
                    .iter()
                    .filter(|m| m.parent_id == node.id)
                    .cloned()
                    .collect(),
            })
            .collect();
        Self {
            title,
            entries,
            degraded,
        }
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.entries.iter().map(|e| e.node.id).collect()
    }

    /// Renders a standalone HTML page. All document text is escaped.
    pub fn to_html(&self) -> String {
        let title = escape_html(&self.title);
        let mut html = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
             <div class=\"container\">\n<h1>{title}</h1>\n"
        );
        for entry in &self.entries {
            let node = &entry.node;
            html.push_str(&format!(
                "<div class=\"node\" style=\"border-left: 5px solid {};\">\n<h2>{}. {}</h2>\n",
                escape_html(&node.color),
                entry.sequence,
                escape_html(&node.title)
            ));
            for paragraph in node
                .description
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
            {
                html.push_str(&format!("<p>{}</p>\n", escape_html(paragraph)));
            }
            if !entry.mininodes.is_empty() {
                html.push_str("<div class=\"mininodes-section\">\n");
                for mini in &entry.mininodes {
                    html.push_str(&format!(
                        "<div class=\"mininode\">\n<div class=\"mininode-header\">{}</div>\n\
                         <pre><code>{}</code></pre>\n</div>\n",
                        escape_html(&mini.title),
                        escape_html(&mini.content)
                    ));
                }
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n");
        }
        html.push_str("</div>\n</body>\n</html>\n");
        html
    }
}

const STYLE: &str = "body { font-family: -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, sans-serif; \
line-height: 1.6; color: #e4e4e7; background-color: #18181b; margin: 0; padding: 2rem; } \
.container { max-width: 800px; margin: 0 auto; } \
.node { border: 1px solid #3f3f46; border-radius: 8px; margin-bottom: 2rem; padding: 1.5rem; background-color: #27272a; } \
h1, h2 { color: #22d3ee; border-bottom: 1px solid #3f3f46; padding-bottom: 0.5rem; } \
h1 { font-size: 2.5em; text-align: center; border: none; } \
pre { background-color: #3f3f46; padding: 1em; border-radius: 6px; white-space: pre-wrap; } \
.mininode { border: 1px dashed #52525b; border-radius: 6px; margin-top: 1rem; } \
.mininode-header { background-color: #3f3f46; padding: 0.5rem 1rem; font-family: monospace; font-weight: bold; }";

/// Escapes the five HTML-significant characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Exports the whole graph, or just the flow ending at `terminal`.
///
/// A cycle does not fail the export: the order falls back to every node of the
/// document sorted by `order_index`, and [`Export::degraded`] is set.
pub fn ordered_export(state: &CoreState, terminal: Option<NodeId>) -> Result<Export, ExportError> {
    let canvas = &state.settings.canvas_title;
    let mut linearizer = Linearizer::new(&state.nodes, &state.connections, TieBreak::OrderIndex);
    let title = match terminal {
        Some(id) => {
            let node = state.node(id).ok_or(ExportError::TerminalNotFound(id))?;
            linearizer = linearizer.ending_at(id);
            format!("{} (Flow: {})", canvas, node.title)
        }
        None => canvas.clone(),
    };

    let linearization = linearizer.with_fallback();
    Ok(Export::build(
        state,
        title,
        &linearization.order,
        linearization.cycle,
    ))
}

/// Exports the selected nodes sorted by `order_index`.
pub fn selection_export(state: &CoreState, ids: &BTreeSet<NodeId>) -> Result<Export, ExportError> {
    let mut nodes: Vec<&Node> = state.nodes.iter().filter(|n| ids.contains(&n.id)).collect();
    if nodes.is_empty() {
        return Err(ExportError::EmptySelection);
    }
    nodes.sort_by_key(|n| n.order_index);
    let order: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
    Ok(Export::build(
        state,
        format!("{} (Selection)", state.settings.canvas_title),
        &order,
        None,
    ))
}
