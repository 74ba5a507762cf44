//! Identity Resolver: which attribute names a node.

use crate::node::Node;

/// Selects whether nodes are addressed by their server ID or their name.
///
/// Fixed for one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityMode {
    ById,
    #[default]
    ByName,
}

impl IdentityMode {
    pub fn from_by_id(by_id: bool) -> Self {
        if by_id {
            IdentityMode::ById
        } else {
            IdentityMode::ByName
        }
    }
}

/// The lookup key of `node`: its id or its name. Missing attributes yield "".
pub fn canonical_id(node: &Node, mode: IdentityMode) -> &str {
    let key = match mode {
        IdentityMode::ById => node.id(),
        IdentityMode::ByName => node.name(),
    };
    key.unwrap_or_default()
}

/// `"<id> (<name>)"` or `"<name> (<id>)"` depending on `mode`.
///
/// Returns an empty string when the node has neither attribute.
pub fn display_string(node: &Node, mode: IdentityMode) -> String {
    display_parts(node.id(), node.name(), mode)
}

pub(crate) fn display_parts(id: Option<&str>, name: Option<&str>, mode: IdentityMode) -> String {
    if id.is_none() && name.is_none() {
        return String::new();
    }
    let (primary, secondary) = match mode {
        IdentityMode::ById => (id, name),
        IdentityMode::ByName => (name, id),
    };
    format!(
        "{} ({})",
        primary.unwrap_or_default(),
        secondary.unwrap_or_default()
    )
}
