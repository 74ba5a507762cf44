//! Tree Builder.
//!
//! A [`Tree`] wraps the top-level folders and files of one request under a
//! synthetic root folder. The root's id and name are both the caller's label
//! (the destination path in save mode), so it can be addressed like any other
//! node but it never contributes a path segment.

use crate::contract::RemoteNode;
use crate::error::TreeError;
use crate::identity::{canonical_id, IdentityMode};
use crate::node::{FolderNode, Node};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Tree {
    root: Node,
    mode: IdentityMode,
}

/// A node located by [`Tree::find_node`] together with its path.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath<'t> {
    pub node: &'t Node,
    /// Canonical identifiers from a top-level node down to `node`, inclusive.
    /// Empty when `node` is the root.
    pub segments: Vec<String>,
}

impl Tree {
    pub fn build(root_label: Option<String>, children: Vec<Node>, mode: IdentityMode) -> Self {
        debug!(
            root = root_label.as_deref().unwrap_or_default(),
            top_level = children.len(),
            ?mode,
            "Building tree"
        );
        let root = Node::Folder(FolderNode {
            id: root_label.clone(),
            name: root_label,
            children,
            raw: Value::Null,
        });
        Self { root, mode }
    }

    pub fn from_remote(root_label: Option<String>, items: Vec<RemoteNode>, mode: IdentityMode) -> Self {
        Self::build(root_label, items.into_iter().map(Node::from).collect(), mode)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn mode(&self) -> IdentityMode {
        self.mode
    }

    /// The label the root was built with.
    pub fn root_label(&self) -> Option<&str> {
        self.root.id()
    }

    /// Depth-first, pre-order search for the first node whose canonical
    /// identifier equals `identifier`.
    pub fn find_node(&self, identifier: &str) -> Result<FoundPath<'_>, TreeError> {
        if canonical_id(&self.root, self.mode) == identifier {
            return Ok(FoundPath {
                node: &self.root,
                segments: Vec::new(),
            });
        }
        let mut trail = Vec::new();
        match descend(&self.root, identifier, self.mode, &mut trail) {
            Some(node) => Ok(FoundPath {
                node,
                segments: trail,
            }),
            None => Err(TreeError::NotFound {
                identifier: identifier.to_owned(),
            }),
        }
    }
}

fn descend<'t>(
    folder: &'t Node,
    identifier: &str,
    mode: IdentityMode,
    trail: &mut Vec<String>,
) -> Option<&'t Node> {
    for child in folder.children() {
        let key = canonical_id(child, mode);
        trail.push(key.to_owned());
        if key == identifier {
            return Some(child);
        }
        if let Some(found) = descend(child, identifier, mode, trail) {
            return Some(found);
        }
        trail.pop();
    }
    None
}
