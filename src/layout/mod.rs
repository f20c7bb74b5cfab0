//! Layout contract and write-back.
//!
//! ```text
//! GraphStore (all nodes, hidden included) → LayoutRequest → LayoutEngine
//!                                                               ↓
//! GraphStore ← positions + connection sides ← LayoutAdapter ← LayoutResult
//! ```
//!
//! The engine is a black box that maps fixed-size nodes and edges to a center
//! point per node. The adapter owns everything else: feeding the full set,
//! converting centers to top-left corners, and writing back. Write-back takes
//! `&mut GraphStore`, so two passes over the same store cannot interleave.

pub mod tidy;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::config::LayoutConfig;
use crate::store::GraphStore;
use crate::types::{NodeId, Position, Side};

pub use tidy::TidyTreeLayout;

/// Error type for layout passes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The engine returned no position for a node it was given.
    #[error("Layout engine returned no position for node {0}")]
    MissingPosition(NodeId),
    /// The engine itself failed.
    #[error("Layout engine error: {0}")]
    Engine(String),
}

/// Flow direction of the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Root on the left, children flow right.
    #[default]
    LeftRight,
    /// Root on top, children flow down.
    TopBottom,
}

impl LayoutDirection {
    /// Parse `LR` / `TB` (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LR" => Some(Self::LeftRight),
            "TB" => Some(Self::TopBottom),
            _ => None,
        }
    }

    /// Whether ranks advance along the x axis.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::LeftRight)
    }

    /// Sides for (incoming, outgoing) connections.
    pub fn link_sides(&self) -> (Side, Side) {
        match self {
            Self::LeftRight => (Side::Left, Side::Right),
            Self::TopBottom => (Side::Top, Side::Bottom),
        }
    }
}

impl std::fmt::Display for LayoutDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LeftRight => write!(f, "LR"),
            Self::TopBottom => write!(f, "TB"),
        }
    }
}

/// A node as the engine sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    /// Node id.
    pub id: NodeId,
    /// Fixed width.
    pub width: f64,
    /// Fixed height.
    pub height: f64,
}

/// Input to a layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutRequest {
    /// Every node in store order.
    pub nodes: Vec<LayoutNode>,
    /// Every (source, target) pair in store order.
    pub edges: Vec<(NodeId, NodeId)>,
    /// Flow direction.
    pub direction: LayoutDirection,
    /// Gap between neighbours in a rank.
    pub node_sep: f64,
    /// Gap between ranks.
    pub rank_sep: f64,
}

impl LayoutRequest {
    /// Build a request over the full store.
    pub fn from_store(store: &GraphStore, config: &LayoutConfig) -> Self {
        Self {
            nodes: store
                .nodes()
                .iter()
                .map(|n| LayoutNode {
                    id: n.id.clone(),
                    width: config.node_width,
                    height: config.node_height,
                })
                .collect(),
            edges: store
                .edges()
                .iter()
                .map(|e| (e.source.clone(), e.target.clone()))
                .collect(),
            direction: config.direction,
            node_sep: config.node_sep,
            rank_sep: config.rank_sep,
        }
    }
}

/// Output of a layout engine: the center point of each node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    /// Node centers.
    pub centers: BTreeMap<NodeId, Position>,
}

/// Deterministic layout function.
pub trait LayoutEngine: Send + Sync {
    /// Compute a center point for every node in the request.
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResult, LayoutError>;
}

/// Summary of a completed layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutStats {
    /// Number of nodes positioned.
    pub nodes: usize,
    /// Number of edges fed to the engine.
    pub edges: usize,
}

/// Runs an engine over the full store and writes the result back.
#[derive(Clone)]
pub struct LayoutAdapter {
    engine: Arc<dyn LayoutEngine>,
    config: LayoutConfig,
}

impl std::fmt::Debug for LayoutAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutAdapter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LayoutAdapter {
    /// Create an adapter around any engine.
    pub fn new(engine: Arc<dyn LayoutEngine>, config: LayoutConfig) -> Self {
        Self { engine, config }
    }

    /// Adapter using the built-in tidy tree engine.
    pub fn tidy(config: LayoutConfig) -> Self {
        Self::new(Arc::new(TidyTreeLayout::new()), config)
    }

    /// Layout configuration.
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out every node (hidden ones included) and write positions and
    /// connection sides back.
    ///
    /// Write-back is all or nothing: if any node lacks a position the store
    /// is left untouched.
    pub fn apply(&self, store: &mut GraphStore) -> Result<LayoutStats, LayoutError> {
        let request = LayoutRequest::from_store(store, &self.config);
        let result = self.engine.layout(&request)?;

        let mut updates = HashMap::with_capacity(request.nodes.len());
        for node in &request.nodes {
            let center = result
                .centers
                .get(&node.id)
                .ok_or_else(|| LayoutError::MissingPosition(node.id.clone()))?;
            let top_left = Position::new(center.x - node.width / 2.0, center.y - node.height / 2.0);
            updates.insert(&node.id, top_left);
        }

        let (incoming, outgoing) = self.config.direction.link_sides();
        store.write_geometry(|id| updates.get(id).copied(), incoming, outgoing);

        let stats = LayoutStats {
            nodes: request.nodes.len(),
            edges: request.edges.len(),
        };
        tracing::info!(
            direction = %self.config.direction,
            nodes = stats.nodes,
            edges = stats.edges,
            "layout applied"
        );
        Ok(stats)
    }
}
