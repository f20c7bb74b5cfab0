//! Visible projection of the full model.
//!
//! ## Algorithm
//!
//! 1. Visible nodes are the nodes whose id is not hidden
//! 2. Visible edges are the edges whose endpoints are both visible, so hiding
//!    a subtree also hides its connecting edges
//! 3. Each visible node is decorated with the mode, its derived collapse
//!    state and its transitive descendant count; counts for the whole tree
//!    come from one bottom-up pass
//!
//! The projection is a disposable view. It is rebuilt after every store,
//! visibility or mode change and never written back.

use serde::Serialize;
use std::collections::HashSet;

use crate::collapse::CollapseEvaluator;
use crate::session::NodeActions;
use crate::types::{Edge, Mode, Node, NodeId};
use crate::visibility::VisibilitySet;

/// A visible node plus everything the node component needs to draw itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewNode {
    /// Snapshot of the stored node.
    #[serde(flatten)]
    pub node: Node,
    /// Session mode at projection time.
    pub mode: Mode,
    /// Whether every direct child is hidden.
    pub is_collapsed: bool,
    /// Transitive descendant count.
    pub children_count: usize,
    /// Whether the node is the pending inline-rename target.
    pub editing: bool,
    /// Mutation callbacks bound to this node.
    #[serde(skip)]
    pub actions: Option<NodeActions>,
}

impl ViewNode {
    /// The node id.
    pub fn id(&self) -> &NodeId {
        &self.node.id
    }

    /// Whether the collapse toggle should be offered.
    pub fn can_collapse(&self) -> bool {
        self.children_count > 0
    }
}

/// Node and edge subset handed to the rendering surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewProjection {
    /// Visible nodes in store order.
    pub nodes: Vec<ViewNode>,
    /// Visible edges in store order.
    pub edges: Vec<Edge>,
}

impl ViewProjection {
    /// Look up a visible node.
    pub fn node(&self, node_id: &NodeId) -> Option<&ViewNode> {
        self.nodes.iter().find(|n| n.id() == node_id)
    }

    /// Whether a node is visible.
    pub fn is_visible(&self, node_id: &NodeId) -> bool {
        self.node(node_id).is_some()
    }

    /// Visible node ids in order.
    pub fn node_ids(&self) -> Vec<&NodeId> {
        self.nodes.iter().map(ViewNode::id).collect()
    }

    /// Mark the inline-rename target, if visible.
    pub fn mark_editing(&mut self, node_id: &NodeId) {
        for node in &mut self.nodes {
            node.editing = node.id() == node_id;
        }
    }

    /// Attach callbacks to every visible node.
    pub fn bind(&mut self, mut binder: impl FnMut(&NodeId) -> NodeActions) {
        for node in &mut self.nodes {
            node.actions = Some(binder(&node.node.id));
        }
    }
}

/// Build the visible projection.
pub fn project(nodes: &[Node], edges: &[Edge], hidden: &VisibilitySet, mode: Mode) -> ViewProjection {
    let evaluator = CollapseEvaluator::new(edges, hidden);
    let counts = evaluator.resolver().descendant_counts();

    let visible_nodes: Vec<ViewNode> = nodes
        .iter()
        .filter(|n| !hidden.contains(&n.id))
        .map(|n| ViewNode {
            node: n.clone(),
            mode,
            is_collapsed: evaluator.is_collapsed(&n.id),
            children_count: counts.get(&n.id).copied().unwrap_or(0),
            editing: false,
            actions: None,
        })
        .collect();

    let visible_ids: HashSet<&NodeId> = visible_nodes.iter().map(ViewNode::id).collect();
    let visible_edges: Vec<Edge> = edges
        .iter()
        .filter(|e| visible_ids.contains(&e.source) && visible_ids.contains(&e.target))
        .cloned()
        .collect();

    ViewProjection {
        nodes: visible_nodes,
        edges: visible_edges,
    }
}
