//! # mindmap-kernel
//!
//! Visibility and mutation engine for an interactive mind map.
//!
//! The kernel answers one question:
//!
//! > Given the full tree and what the user has collapsed, **which nodes and
//! > edges should be drawn**, and how does each edit change that answer?
//!
//! ## Core Contract
//!
//! 1. Hold the full model (nodes and parent → child edges) in a [`GraphStore`]
//! 2. Track hidden node ids in a [`VisibilitySet`]; collapse state is derived,
//!    never stored
//! 3. Project store + visibility + mode into a [`ViewProjection`] after every
//!    change
//! 4. Re-flow positions through a pluggable [`LayoutEngine`] at startup and
//!    after a successful save
//!
//! ## Architecture
//!
//! ```text
//! gesture → NodeActions / MindMapHandle → MindMap
//!                                           │
//!             GraphStore → VisibilitySet → project() → ViewProjection
//!                 ↑                                          │
//!           LayoutAdapter ← save (SaveBackend) ←─────────────┘
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same store + same hidden set + same mode → identical projection
//! - Descendant queries terminate on cyclic edges
//! - The built-in layout is a pure function of its request

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod store;
pub mod resolver;
pub mod collapse;
pub mod visibility;
pub mod projector;
pub mod layout;
pub mod persist;
pub mod canonical;
pub mod config;
pub mod session;

// Re-exports
pub use types::{
    Edge, Mode, Node, NodeId, PayloadEdge, PayloadNode, Position, SavePayload, SaveReceipt,
    SeedError, SeedNode, Side,
};
pub use store::{place_child, DeleteOutcome, GraphError, GraphStore};
pub use resolver::{descendants_of, DescendantResolver};
pub use collapse::CollapseEvaluator;
pub use visibility::{ToggleOutcome, VisibilitySet};
pub use projector::{project, ViewNode, ViewProjection};
pub use layout::{
    LayoutAdapter, LayoutDirection, LayoutEngine, LayoutError, LayoutNode, LayoutRequest,
    LayoutResult, LayoutStats, TidyTreeLayout,
};
pub use persist::{SaveBackend, SaveError, SimulatedSaveBackend};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use config::{LayoutConfig, MindMapConfig, PlacementConfig};
pub use session::{MindMap, MindMapHandle, NodeActions, Notice, NoticeLevel, SessionError};

/// Schema version for serialized projections and payloads.
/// Increment on breaking changes to any serialized type.
pub const MINDMAP_SCHEMA_VERSION: &str = "1.0.0";

/// Id of the node that can never be deleted.
pub const ROOT_NODE_ID: &str = "root";

/// Label given to freshly added children.
pub const PLACEHOLDER_LABEL: &str = "New Topic";
