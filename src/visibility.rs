//! Hidden-id set and the collapse/expand toggle.
//!
//! Membership here only means "not displayed right now". A hidden node still
//! exists in the store.
//!
//! ## Toggle semantics
//!
//! | Current state | Action | Effect |
//! |---------------|--------|--------|
//! | no descendants | none | unchanged |
//! | collapsed | expand | direct children leave the set |
//! | expanded | collapse | every transitive descendant joins the set |
//!
//! Expand is one level deep: grandchildren hidden by an earlier, deeper
//! collapse stay hidden, so their parent re-surfaces looking collapsed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::collapse::CollapseEvaluator;
use crate::store::GraphStore;
use crate::types::NodeId;

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ToggleOutcome {
    /// The node has no descendants (or does not exist).
    Unchanged,
    /// Descendants were hidden.
    Collapsed {
        /// Number of ids added to the set.
        hidden: usize,
    },
    /// Direct children were revealed.
    Expanded {
        /// Number of ids removed from the set.
        revealed: usize,
    },
}

/// Ids currently excluded from display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilitySet {
    hidden: BTreeSet<NodeId>,
}

impl VisibilitySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from ids.
    pub fn from_ids(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            hidden: ids.into_iter().collect(),
        }
    }

    /// Whether a node is hidden.
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.hidden.contains(node_id)
    }

    /// Number of hidden ids.
    pub fn len(&self) -> usize {
        self.hidden.len()
    }

    /// Whether nothing is hidden.
    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }

    /// Hidden ids in order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeId> {
        self.hidden.iter()
    }

    /// Collapse or expand `node_id` against the current store.
    ///
    /// The new set is computed in full before it replaces the old one, so no
    /// reader can observe a half-applied toggle.
    pub fn toggle_collapse(&mut self, store: &GraphStore, node_id: &NodeId) -> ToggleOutcome {
        let evaluator = CollapseEvaluator::new(store.edges(), self);
        let resolver = evaluator.resolver();

        let descendants = resolver.descendants_of(node_id);
        if descendants.is_empty() {
            return ToggleOutcome::Unchanged;
        }

        let mut next = self.hidden.clone();
        let outcome = if evaluator.is_collapsed(node_id) {
            let revealed = resolver
                .children_of(node_id)
                .iter()
                .filter(|child| next.remove(**child))
                .count();
            ToggleOutcome::Expanded { revealed }
        } else {
            let before = next.len();
            next.extend(descendants);
            ToggleOutcome::Collapsed {
                hidden: next.len() - before,
            }
        };

        self.hidden = next;
        tracing::debug!(node = %node_id, ?outcome, hidden_total = self.hidden.len(), "toggled collapse");
        outcome
    }

    /// Drop ids from the set, returning how many were present.
    pub fn forget<'i>(&mut self, ids: impl IntoIterator<Item = &'i NodeId>) -> usize {
        ids.into_iter().filter(|id| self.hidden.remove(*id)).count()
    }

    /// Drop every id the store no longer contains.
    pub fn retain_existing(&mut self, store: &GraphStore) -> usize {
        let before = self.hidden.len();
        self.hidden.retain(|id| store.contains(id));
        before - self.hidden.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlacementConfig;
    use crate::types::SeedNode;

    /// root → A → B → C, plus root → D
    fn store() -> GraphStore {
        let seed = SeedNode::branch(
            "root",
            "Root",
            vec![
                SeedNode::branch(
                    "A",
                    "A",
                    vec![SeedNode::branch("B", "B", vec![SeedNode::leaf("C", "C")])],
                ),
                SeedNode::leaf("D", "D"),
            ],
        );
        GraphStore::from_seed(&seed, &PlacementConfig::default()).unwrap()
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_toggle_leaf_unchanged() {
        let store = store();
        let mut hidden = VisibilitySet::new();
        assert_eq!(hidden.toggle_collapse(&store, &id("D")), ToggleOutcome::Unchanged);
        assert_eq!(hidden.toggle_collapse(&store, &id("ghost")), ToggleOutcome::Unchanged);
        assert!(hidden.is_empty());
    }

    #[test]
    fn test_collapse_hides_all_descendants() {
        let store = store();
        let mut hidden = VisibilitySet::new();

        let outcome = hidden.toggle_collapse(&store, &id("A"));

        assert_eq!(outcome, ToggleOutcome::Collapsed { hidden: 2 });
        assert!(hidden.contains(&id("B")));
        assert!(hidden.contains(&id("C")));
        assert!(!hidden.contains(&id("D")));
    }

    #[test]
    fn test_expand_reveals_one_level() {
        let store = store();
        let mut hidden = VisibilitySet::new();

        hidden.toggle_collapse(&store, &id("A"));
        let outcome = hidden.toggle_collapse(&store, &id("A"));

        // B comes back, C stays hidden: B now looks collapsed.
        assert_eq!(outcome, ToggleOutcome::Expanded { revealed: 1 });
        assert!(!hidden.contains(&id("B")));
        assert!(hidden.contains(&id("C")));
        assert!(CollapseEvaluator::new(store.edges(), &hidden).is_collapsed(&id("B")));
    }

    #[test]
    fn test_nested_collapse_survives_ancestor_expand() {
        let store = store();
        let mut hidden = VisibilitySet::new();

        hidden.toggle_collapse(&store, &id("B"));
        hidden.toggle_collapse(&store, &id("A"));
        hidden.toggle_collapse(&store, &id("A"));

        assert_eq!(hidden, VisibilitySet::from_ids([id("C")]));
    }

    #[test]
    fn test_forget_and_retain_existing() {
        let store = store();
        let mut hidden = VisibilitySet::from_ids([id("B"), id("C"), id("gone")]);

        assert_eq!(hidden.retain_existing(&store), 1);
        assert_eq!(hidden.forget([&id("B"), &id("Z")]), 1);
        assert_eq!(hidden, VisibilitySet::from_ids([id("C")]));
    }
}
