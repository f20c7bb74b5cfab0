//! The authoritative node/edge store.

use std::collections::BTreeSet;

use crate::config::PlacementConfig;
use crate::resolver::DescendantResolver;
use crate::types::{Edge, Node, NodeId, Position, SavePayload, SeedError, SeedNode, Side};
use crate::visibility::VisibilitySet;

use super::placement::place_child;
use super::GraphError;

/// Nodes and edges removed by a subtree deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Ids of removed nodes (the target plus its descendants).
    pub removed_nodes: BTreeSet<NodeId>,
    /// Number of removed edges.
    pub removed_edges: usize,
    /// Number of ids dropped from the visibility set.
    pub forgotten_hidden: usize,
}

impl DeleteOutcome {
    /// Whether anything was removed.
    pub fn is_empty(&self) -> bool {
        self.removed_nodes.is_empty()
    }
}

/// Owner of every node and edge, hidden ones included.
///
/// The edge set forms a rooted out-tree: the root has no incoming edge and
/// every other node has exactly one. Mutations preserve this by construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    /// Build a store from a hierarchical seed.
    pub fn from_seed(seed: &SeedNode, placement: &PlacementConfig) -> Result<Self, SeedError> {
        let (nodes, edges) = seed.flatten(placement.x_offset, placement.y_offset)?;
        Ok(Self { nodes, edges })
    }

    /// Build a store from raw arrays.
    ///
    /// The arrays are taken as-is; callers are responsible for the tree shape.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Whether a node exists.
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.get_node(node_id).is_some()
    }

    /// Look up a node.
    pub fn get_node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == node_id)
    }

    fn get_node_mut(&mut self, node_id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == node_id)
    }

    /// Outgoing edges of a node, in insertion order.
    pub fn child_edges_of<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| &e.source == node_id)
    }

    /// Resolver over the current edge set.
    pub fn resolver(&self) -> DescendantResolver<'_> {
        DescendantResolver::new(&self.edges)
    }

    /// Add a placeholder child under `parent_id`.
    ///
    /// Returns `None` without touching the store if the parent does not exist.
    pub fn add_child(&mut self, parent_id: &NodeId, placement: &PlacementConfig) -> Option<NodeId> {
        let Some(parent) = self.get_node(parent_id) else {
            tracing::debug!(parent = %parent_id, "add_child ignored, parent not found");
            return None;
        };
        let parent_position = parent.position;
        let sibling_count = self.child_edges_of(parent_id).count();

        let id = NodeId::generate();
        let position = place_child(parent_position, sibling_count, placement);

        self.nodes.push(Node::new(id.clone(), placement.placeholder_label.as_str(), position));
        self.edges.push(Edge::new(parent_id.clone(), id.clone()));

        tracing::debug!(
            parent = %parent_id,
            child = %id,
            siblings = sibling_count,
            "added child node"
        );
        Some(id)
    }

    /// Remove a node, all of its descendants, and every edge touching them.
    ///
    /// Removed ids are also dropped from `hidden`. Deleting the root is
    /// refused. An unknown id removes nothing.
    pub fn delete_subtree(
        &mut self,
        node_id: &NodeId,
        hidden: &mut VisibilitySet,
    ) -> Result<DeleteOutcome, GraphError> {
        if node_id.is_root() {
            return Err(GraphError::RootDeletion);
        }

        let mut to_delete = self.resolver().descendants_of(node_id);
        to_delete.insert(node_id.clone());

        let nodes_before = self.nodes.len();
        let edges_before = self.edges.len();

        let mut removed_nodes = BTreeSet::new();
        self.nodes.retain(|n| {
            if to_delete.contains(&n.id) {
                removed_nodes.insert(n.id.clone());
                false
            } else {
                true
            }
        });
        self.edges
            .retain(|e| !e.touches(|id| to_delete.contains(id)));

        let forgotten_hidden = hidden.forget(&to_delete);

        let outcome = DeleteOutcome {
            removed_nodes,
            removed_edges: edges_before - self.edges.len(),
            forgotten_hidden,
        };
        debug_assert_eq!(nodes_before - self.nodes.len(), outcome.removed_nodes.len());

        tracing::debug!(
            node = %node_id,
            removed_nodes = outcome.removed_nodes.len(),
            removed_edges = outcome.removed_edges,
            forgotten_hidden,
            "deleted subtree"
        );
        Ok(outcome)
    }

    /// Replace a node's label.
    ///
    /// The label is trimmed. Returns `false` and leaves the node untouched if
    /// the node is missing, or the trimmed label is empty or unchanged.
    pub fn relabel(&mut self, node_id: &NodeId, new_label: &str) -> bool {
        let trimmed = new_label.trim();
        let Some(node) = self.get_node_mut(node_id) else {
            tracing::debug!(node = %node_id, "relabel ignored, node not found");
            return false;
        };
        if trimmed.is_empty() || trimmed == node.label {
            tracing::debug!(node = %node_id, "relabel ignored, label empty or unchanged");
            return false;
        }

        node.label = trimmed.to_string();
        tracing::debug!(node = %node_id, label = %node.label, "relabeled node");
        true
    }

    /// Write layout results back in one pass over the nodes.
    ///
    /// Nodes `position_of` has no answer for keep their geometry. Returns
    /// how many nodes were updated.
    pub(crate) fn write_geometry(
        &mut self,
        mut position_of: impl FnMut(&NodeId) -> Option<Position>,
        parent_link_side: Side,
        child_link_side: Side,
    ) -> usize {
        let mut updated = 0;
        for node in &mut self.nodes {
            if let Some(position) = position_of(&node.id) {
                node.position = position;
                node.parent_link_side = parent_link_side;
                node.child_link_side = child_link_side;
                updated += 1;
            }
        }
        updated
    }

    /// Minimal payload for the save collaborator.
    pub fn to_payload(&self) -> SavePayload {
        SavePayload::from_graph(&self.nodes, &self.edges)
    }
}
