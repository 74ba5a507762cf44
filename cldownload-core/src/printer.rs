//! Tree Printer.
//!
//! Renders nodes one per line as `name (id)` (or `id (name)`), children below
//! their parent behind a connector. Siblings are sorted by canonical
//! identifier so that output does not depend on the order the API used.

use std::cmp::Ordering;

use crate::identity::{canonical_id, display_string, IdentityMode};
use crate::node::Node;
use crate::tree::Tree;

pub const CONNECTOR: &str = "\\____ ";
const INDENT: &str = "      ";

/// Render `node` and everything below it.
pub fn render_node(node: &Node, mode: IdentityMode) -> String {
    let mut out = String::new();
    render_into(node, mode, 0, &mut out);
    out
}

/// Render each node as an independent tree, without a shared root line.
pub fn render_forest(nodes: &[Node], mode: IdentityMode) -> String {
    sorted(nodes, mode)
        .into_iter()
        .map(|node| render_node(node, mode))
        .collect()
}

impl Tree {
    /// Render the top-level folders and files of this tree.
    pub fn render(&self) -> String {
        render_forest(self.root().children(), self.mode())
    }
}

fn render_into(node: &Node, mode: IdentityMode, depth: usize, out: &mut String) {
    if depth > 0 {
        out.push_str(&INDENT.repeat(depth - 1));
        out.push_str(CONNECTOR);
    }
    out.push_str(&display_string(node, mode));
    out.push('\n');
    for child in sorted(node.children(), mode) {
        render_into(child, mode, depth + 1, out);
    }
}

fn sorted(nodes: &[Node], mode: IdentityMode) -> Vec<&Node> {
    let mut ordered: Vec<&Node> = nodes.iter().collect();
    ordered.sort_by(|a, b| compare(a, b, mode));
    ordered
}

fn compare(a: &Node, b: &Node, mode: IdentityMode) -> Ordering {
    canonical_id(a, mode)
        .cmp(canonical_id(b, mode))
        .then_with(|| display_string(a, mode).cmp(&display_string(b, mode)))
}
