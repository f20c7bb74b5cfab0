//! Edge types for the mind map.

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Directed parent → child edge.
///
/// Implements `Ord` for deterministic ordering: (source, target, id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Edge identifier, `e-{source}-{target}` with `-` and `%` in the
    /// endpoint ids percent-escaped, so distinct endpoint pairs never share
    /// an id.
    pub id: String,
    /// Parent node.
    pub source: NodeId,
    /// Child node.
    pub target: NodeId,
}

impl Edge {
    /// Create an edge with the conventional id.
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: format!("e-{}-{}", escape_id(source.as_str()), escape_id(target.as_str())),
            source,
            target,
        }
    }

    /// Whether either endpoint is in the given predicate set.
    pub fn touches(&self, mut contains: impl FnMut(&NodeId) -> bool) -> bool {
        contains(&self.source) || contains(&self.target)
    }
}

/// Escape the id separator so the id encoding stays injective.
fn escape_id(id: &str) -> std::borrow::Cow<'_, str> {
    if !id.contains(['-', '%']) {
        return std::borrow::Cow::Borrowed(id);
    }
    let mut out = String::with_capacity(id.len() + 4);
    for c in id.chars() {
        match c {
            '%' => out.push_str("%25"),
            '-' => out.push_str("%2D"),
            c => out.push(c),
        }
    }
    std::borrow::Cow::Owned(out)
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.source
            .cmp(&other.source)
            .then_with(|| self.target.cmp(&other.target))
            .then_with(|| self.id.cmp(&other.id))
    }
}
