//! Derived collapse state.
//!
//! Collapse is never stored on a node. It is recomputed from the current
//! visibility set every time it is asked for, so it cannot drift.

use crate::resolver::DescendantResolver;
use crate::types::{Edge, NodeId};
use crate::visibility::VisibilitySet;

/// Answers "is this node collapsed" and "how many nodes hang below it".
#[derive(Debug, Clone)]
pub struct CollapseEvaluator<'a> {
    resolver: DescendantResolver<'a>,
    hidden: &'a VisibilitySet,
}

impl<'a> CollapseEvaluator<'a> {
    /// Evaluate against an edge slice and a visibility set.
    pub fn new(edges: &'a [Edge], hidden: &'a VisibilitySet) -> Self {
        Self {
            resolver: DescendantResolver::new(edges),
            hidden,
        }
    }

    /// A node is collapsed iff it has children and every direct child is hidden.
    pub fn is_collapsed(&self, node_id: &NodeId) -> bool {
        let children = self.resolver.children_of(node_id);
        !children.is_empty() && children.iter().all(|child| self.hidden.contains(child))
    }

    /// Total transitive descendant count (the expand badge value).
    pub fn descendant_count(&self, node_id: &NodeId) -> usize {
        self.resolver.descendant_count(node_id)
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &DescendantResolver<'a> {
        &self.resolver
    }
}
