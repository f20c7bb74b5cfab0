//! Hierarchical seed input.
//!
//! A seed is the nested `{ id, label, children }` structure a mind map starts
//! from. It is flattened exactly once into node and edge arrays.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::edge::Edge;
use super::node::{Node, NodeId, Position};

/// Error raised while converting a seed into a graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeedError {
    /// The top-level seed node is not the reserved root.
    #[error("Seed root must have id \"root\", found {0:?}")]
    RootIdMismatch(String),
    /// Two seed nodes share an id.
    #[error("Duplicate node id in seed: {0}")]
    DuplicateId(String),
    /// A seed node has an empty id.
    #[error("Seed node with empty id under parent {0}")]
    EmptyId(String),
    /// The seed JSON could not be parsed.
    #[error("Invalid seed JSON: {0}")]
    Parse(String),
}

/// One node of the hierarchical seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedNode {
    /// Node id.
    pub id: String,
    /// Node label.
    pub label: String,
    /// Ordered children.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SeedNode>,
}

impl SeedNode {
    /// Create a leaf seed node.
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: Vec::new(),
        }
    }

    /// Create a seed node with children.
    pub fn branch(id: impl Into<String>, label: impl Into<String>, children: Vec<SeedNode>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children,
        }
    }

    /// Parse a seed from JSON.
    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        serde_json::from_str(json).map_err(|e| SeedError::Parse(e.to_string()))
    }

    /// Total number of nodes in this seed, itself included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(seed) = stack.pop() {
            count += 1;
            stack.extend(seed.children.iter());
        }
        count
    }

    /// Flatten into node and edge arrays.
    ///
    /// Nodes come out in depth-first pre-order. The initial position of each
    /// node is `(depth * column_width, row * row_height)` where `row` is its
    /// pre-order leaf row; the startup layout pass replaces these.
    pub fn flatten(&self, column_width: f64, row_height: f64) -> Result<(Vec<Node>, Vec<Edge>), SeedError> {
        if self.id != crate::ROOT_NODE_ID {
            return Err(SeedError::RootIdMismatch(self.id.clone()));
        }

        let total = self.node_count();
        let mut nodes = Vec::with_capacity(total);
        let mut edges = Vec::with_capacity(total.saturating_sub(1));
        let mut seen: HashSet<&str> = HashSet::new();
        let mut row = 0usize;

        // (seed, parent, depth)
        let mut stack: Vec<(&SeedNode, Option<&str>, usize)> = vec![(self, None, 0)];
        while let Some((seed, parent, depth)) = stack.pop() {
            if seed.id.is_empty() {
                return Err(SeedError::EmptyId(parent.unwrap_or_default().to_string()));
            }
            if !seen.insert(seed.id.as_str()) {
                return Err(SeedError::DuplicateId(seed.id.clone()));
            }

            let position = Position::new(depth as f64 * column_width, row as f64 * row_height);
            if seed.children.is_empty() {
                row += 1;
            }
            nodes.push(Node::new(NodeId::new(seed.id.as_str()), seed.label.as_str(), position));
            if let Some(parent) = parent {
                edges.push(Edge::new(NodeId::new(parent), NodeId::new(seed.id.as_str())));
            }

            // Reverse so the first child is popped first.
            for child in seed.children.iter().rev() {
                stack.push((child, Some(seed.id.as_str()), depth + 1));
            }
        }

        Ok((nodes, edges))
    }

    /// The built-in sample map: a campus social app's feature outline.
    pub fn sample() -> Self {
        Self::branch(
            "root",
            "Campus Circle",
            vec![
                Self::branch(
                    "1",
                    "Home",
                    vec![
                        Self::branch(
                            "1-1",
                            "Trending Topics",
                            vec![Self::branch(
                                "1-1-1",
                                "Topic Picker",
                                vec![Self::leaf("1-1-1-1", "Topic Overview")],
                            )],
                        ),
                        Self::branch(
                            "1-2",
                            "Discover Topics",
                            vec![Self::leaf("1-2-1", "Topic Picker")],
                        ),
                    ],
                ),
                Self::leaf("2", "Friends' Topics"),
                Self::leaf("3", "Start a Topic"),
                Self::leaf("4", "Search"),
                Self::leaf("5", "Confession Wall"),
                Self::leaf("6", "Messages"),
                Self::branch(
                    "7",
                    "Nearby",
                    vec![
                        Self::leaf("7-1", "Nearby Posts"),
                        Self::leaf("7-2", "People Nearby"),
                    ],
                ),
                Self::leaf("8", "Profile"),
                Self::leaf("9", "Settings"),
            ],
        )
    }
}
