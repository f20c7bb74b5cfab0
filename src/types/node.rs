//! Node types for the mind map.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ROOT_NODE_ID;

/// Unique identifier for a node in the mind map tree.
///
/// Wraps a string and implements `Ord` for deterministic ordering.
/// The id of a node never changes once it is created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The reserved root id.
    pub fn root() -> Self {
        Self(ROOT_NODE_ID.to_string())
    }

    /// Generate a fresh, globally unique id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Whether this is the reserved root id.
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_NODE_ID
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Top-left position of a node on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Side of a node where a connection attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Top edge.
    Top,
    /// Bottom edge.
    Bottom,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

/// A labeled node in the mind map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Immutable identifier.
    pub id: NodeId,
    /// Display label.
    pub label: String,
    /// Top-left canvas position.
    pub position: Position,
    /// Side where the edge from the parent attaches.
    pub parent_link_side: Side,
    /// Side where edges to children attach.
    pub child_link_side: Side,
}

impl Node {
    /// Create a node with default left-to-right connection sides.
    pub fn new(id: NodeId, label: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            label: label.into(),
            position,
            parent_link_side: Side::Left,
            child_link_side: Side::Right,
        }
    }
}
