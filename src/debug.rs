//! Diagnostic dumps of node trees.
//!
//! `outline` renders a compact indented view for quick inspection and
//! snapshot tests; `to_json` serializes the structural fields (matcher
//! state is never included).

use crate::ast::{NodeKind, NodeRef};
use crate::tree::child_nodes;

fn label(node: &NodeRef) -> String {
    let borrowed = node.borrow();
    match &borrowed.kind {
        NodeKind::Name { id, .. } => format!("Name({})", id),
        NodeKind::Num { n } => format!("Num({})", n),
        NodeKind::Str { s } => format!("Str({:?})", s),
        NodeKind::FunctionDef { name, .. } => format!("FunctionDef({})", name),
        NodeKind::ClassDef { name, .. } => format!("ClassDef({})", name),
        NodeKind::Attribute { attr, .. } => format!("Attribute(.{})", attr),
        NodeKind::Keyword { arg, .. } => format!("keyword({})", arg),
        NodeKind::Alias { name, asname } => match asname {
            Some(asname) => format!("alias({} as {})", name, asname),
            None => format!("alias({})", name),
        },
        NodeKind::SyntaxFreeLine { comment, .. } => match comment {
            Some(text) => format!("SyntaxFreeLine(#{})", text),
            None => "SyntaxFreeLine".to_string(),
        },
        _ => borrowed.kind_name().to_string(),
    }
}

fn write_outline(node: &NodeRef, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(&label(node));
    out.push('\n');
    for (_, child) in child_nodes(&node.borrow()) {
        write_outline(&child, depth + 1, out);
    }
}

/// Indented one-line-per-node view of a tree.
pub fn outline(node: &NodeRef) -> String {
    let mut out = String::new();
    write_outline(node, 0, &mut out);
    out
}

/// Structural JSON dump of a tree.
pub fn to_json(node: &NodeRef) -> serde_json::Value {
    serde_json::to_value(&*node.borrow()).unwrap_or(serde_json::Value::Null)
}
