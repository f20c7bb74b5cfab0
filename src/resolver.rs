//! Descendant resolution over parent → child edges.
//!
//! Every "how many nodes hang below this one" question in the crate goes
//! through [`DescendantResolver`]: collapse, delete, and the expand badge
//! count all share this single traversal.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::types::{Edge, NodeId};

/// Children adjacency built once from an edge slice.
///
/// ## Algorithm
///
/// Breadth-first from the start node's direct children, following outgoing
/// edges only. Visited ids (the start node included) are tracked, so an edge
/// set that accidentally contains a cycle still terminates and never reports
/// the start node as its own descendant. O(V + E) per query.
#[derive(Debug, Clone)]
pub struct DescendantResolver<'a> {
    children: HashMap<&'a NodeId, Vec<&'a NodeId>>,
}

impl<'a> DescendantResolver<'a> {
    /// Build the adjacency for an edge slice.
    pub fn new(edges: &'a [Edge]) -> Self {
        let mut children: HashMap<&'a NodeId, Vec<&'a NodeId>> = HashMap::new();
        for edge in edges {
            children.entry(&edge.source).or_default().push(&edge.target);
        }
        Self { children }
    }

    /// Direct children of a node, in edge order.
    pub fn children_of(&self, node_id: &NodeId) -> &[&'a NodeId] {
        self.children
            .get(node_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the node has at least one outgoing edge.
    pub fn has_children(&self, node_id: &NodeId) -> bool {
        !self.children_of(node_id).is_empty()
    }

    /// Every id reachable from `node_id`, excluding `node_id` itself.
    pub fn descendants_of(&self, node_id: &NodeId) -> BTreeSet<NodeId> {
        self.walk(node_id).into_iter().cloned().collect()
    }

    /// Size of [`descendants_of`](Self::descendants_of) without cloning ids.
    pub fn descendant_count(&self, node_id: &NodeId) -> usize {
        self.walk(node_id).len()
    }

    /// Descendant count of every node with children, in one pass.
    ///
    /// When every node has at most one parent the counts are summed
    /// bottom-up over each tree, O(V + E) in total. Nodes that cannot be
    /// summed that way (shared children, cycles) fall back to
    /// [`descendant_count`](Self::descendant_count), so the answer always
    /// matches the per-node query. Leaves are absent from the map.
    pub fn descendant_counts(&self) -> HashMap<&'a NodeId, usize> {
        let mut in_degree: HashMap<&'a NodeId, usize> = HashMap::new();
        for targets in self.children.values() {
            for target in targets {
                *in_degree.entry(*target).or_default() += 1;
            }
        }

        let mut counts: HashMap<&'a NodeId, usize> = HashMap::with_capacity(self.children.len());
        if in_degree.values().all(|&d| d <= 1) {
            let roots = self
                .children
                .keys()
                .copied()
                .filter(|id| !in_degree.contains_key(id));
            for root in roots {
                self.sum_tree(root, &mut counts);
            }
        }

        // Shared children or cycles: answer those per node.
        for &source in self.children.keys() {
            if !counts.contains_key(source) {
                counts.insert(source, self.descendant_count(source));
            }
        }
        counts.retain(|_, count| *count > 0);
        counts
    }

    /// Post-order over a tree rooted at `root`, storing subtree sizes.
    fn sum_tree(&self, root: &'a NodeId, counts: &mut HashMap<&'a NodeId, usize>) {
        // (node, index of the next child to enter)
        let mut stack: Vec<(&'a NodeId, usize)> = vec![(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            if let Some(&child) = self.children_of(node).get(frame.1) {
                frame.1 += 1;
                stack.push((child, 0));
                continue;
            }

            stack.pop();
            let below: usize = self
                .children_of(node)
                .iter()
                .map(|child| 1 + counts.get(child).copied().unwrap_or(0))
                .sum();
            counts.insert(node, below);
        }
    }

    fn walk(&self, node_id: &NodeId) -> Vec<&'a NodeId> {
        let mut found: Vec<&'a NodeId> = Vec::new();
        let mut visited: HashSet<&NodeId> = HashSet::new();
        visited.insert(node_id);

        let mut queue: VecDeque<&'a NodeId> = self.children_of(node_id).iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            found.push(current);
            queue.extend(self.children_of(current).iter().copied());
        }
        found
    }
}

/// One-shot descendant query over an edge slice.
pub fn descendants_of(edges: &[Edge], node_id: &NodeId) -> BTreeSet<NodeId> {
    DescendantResolver::new(edges).descendants_of(node_id)
}
