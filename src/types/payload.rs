//! Outbound persistence payload.
//!
//! Positions are intentionally absent: layout is recomputed, not persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use super::edge::Edge;
use super::node::{Node, NodeId};

/// Minimal node record sent to the save collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadNode {
    /// Node id.
    pub id: NodeId,
    /// Node label.
    pub label: String,
}

/// Minimal edge record sent to the save collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEdge {
    /// Parent id.
    pub source: NodeId,
    /// Child id.
    pub target: NodeId,
}

/// Everything the save collaborator needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    /// All nodes, hidden ones included.
    pub nodes: Vec<PayloadNode>,
    /// All edges.
    pub edges: Vec<PayloadEdge>,
}

impl SavePayload {
    /// Build a payload from the full node and edge arrays.
    pub fn from_graph(nodes: &[Node], edges: &[Edge]) -> Self {
        Self {
            nodes: nodes
                .iter()
                .map(|n| PayloadNode {
                    id: n.id.clone(),
                    label: n.label.clone(),
                })
                .collect(),
            edges: edges
                .iter()
                .map(|e| PayloadEdge {
                    source: e.source.clone(),
                    target: e.target.clone(),
                })
                .collect(),
        }
    }

    /// Deterministic fingerprint of this payload (xxh64 of canonical JSON).
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }
}

/// Acknowledgement of a successful save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Fingerprint of the saved payload.
    pub fingerprint: String,
    /// Number of nodes saved.
    pub node_count: usize,
    /// Number of edges saved.
    pub edge_count: usize,
    /// When the save completed.
    pub saved_at: DateTime<Utc>,
}

impl SaveReceipt {
    /// Create a receipt for a payload, stamped now.
    pub fn for_payload(payload: &SavePayload) -> Self {
        Self {
            fingerprint: payload.fingerprint(),
            node_count: payload.nodes.len(),
            edge_count: payload.edges.len(),
            saved_at: Utc::now(),
        }
    }
}
