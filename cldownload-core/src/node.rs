//! Tree nodes.
//!
//! A [`Node`] is either a [`FileNode`] or a [`FolderNode`]. The kind is decided
//! once, when a [`RemoteNode`] is converted: an object that carries a children
//! attribute is a folder, even when that attribute is an empty list. Names play
//! no part in the decision.

use serde_json::Value;

use crate::contract::RemoteNode;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    File(FileNode),
    Folder(FolderNode),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileNode {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderNode {
    pub id: Option<String>,
    pub name: Option<String>,
    pub children: Vec<Node>,
    /// The folder object as received, written out as the sidecar metadata file.
    pub raw: Value,
}

impl Node {
    pub fn id(&self) -> Option<&str> {
        match self {
            Node::File(file) => file.id.as_deref(),
            Node::Folder(folder) => folder.id.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Node::File(file) => file.name.as_deref(),
            Node::Folder(folder) => folder.name.as_deref(),
        }
    }

    /// Children of a folder; always empty for a file.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::File(_) => &[],
            Node::Folder(folder) => &folder.children,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Node::Folder(_))
    }
}

impl From<RemoteNode> for Node {
    fn from(remote: RemoteNode) -> Self {
        // Serializing a RemoteNode only involves strings, maps and JSON values.
        let raw = serde_json::to_value(&remote).unwrap_or_default();
        match remote.files {
            Some(children) => Node::Folder(FolderNode {
                id: remote.id,
                name: remote.name,
                children: children.into_iter().map(Node::from).collect(),
                raw,
            }),
            None => Node::File(FileNode {
                id: remote.id,
                name: remote.name,
            }),
        }
    }
}
