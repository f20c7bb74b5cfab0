//! Session state: the single owner of a mind map.

use parking_lot::Mutex;
use std::sync::Weak;

use crate::config::MindMapConfig;
use crate::layout::{LayoutAdapter, LayoutStats};
use crate::persist::SaveError;
use crate::projector::{project, ViewProjection};
use crate::store::{DeleteOutcome, GraphError, GraphStore};
use crate::types::{Mode, NodeId, SavePayload, SaveReceipt, SeedNode};
use crate::visibility::{ToggleOutcome, VisibilitySet};

use super::handle::NodeActions;
use super::notice::Notice;
use super::SessionError;

/// An interactive mind map session.
///
/// Owns the store, the visibility set, the mode and the cached projection.
/// Every operation follows the same order: mutate the store, then the
/// visibility set if needed, then rebuild the projection.
///
/// ## Mode transitions
///
/// | From | To | Via |
/// |------|----|-----|
/// | view | edit | [`enter_edit`](Self::enter_edit) |
/// | edit | view | [`cancel_edit`](Self::cancel_edit) (no layout) |
/// | edit | view | [`finish_save`](Self::finish_save) after a successful save (layout) |
#[derive(Debug)]
pub struct MindMap {
    store: GraphStore,
    hidden: VisibilitySet,
    mode: Mode,
    layout: LayoutAdapter,
    config: MindMapConfig,
    rename_target: Option<NodeId>,
    save_in_flight: bool,
    notices: Vec<Notice>,
    view: ViewProjection,
    binder: Option<Weak<Mutex<MindMap>>>,
}

impl MindMap {
    /// Start a session from a seed using the built-in layout engine.
    pub fn new(seed: &SeedNode, config: MindMapConfig) -> Result<Self, SessionError> {
        let layout = LayoutAdapter::tidy(config.layout.clone());
        Self::with_layout(seed, config, layout)
    }

    /// Start a session from a seed with a custom layout adapter.
    ///
    /// The seed is flattened, laid out once, and projected.
    pub fn with_layout(
        seed: &SeedNode,
        config: MindMapConfig,
        layout: LayoutAdapter,
    ) -> Result<Self, SessionError> {
        let mut store = GraphStore::from_seed(seed, &config.placement)?;
        layout.apply(&mut store)?;

        let mut map = Self {
            store,
            hidden: VisibilitySet::new(),
            mode: Mode::View,
            layout,
            config,
            rename_target: None,
            save_in_flight: false,
            notices: Vec::new(),
            view: ViewProjection::default(),
            binder: None,
        };
        map.recompute_view();

        tracing::info!(
            nodes = map.store.num_nodes(),
            edges = map.store.num_edges(),
            "mind map session started"
        );
        Ok(map)
    }

    /// The full model.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Currently hidden ids.
    pub fn hidden(&self) -> &VisibilitySet {
        &self.hidden
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Session configuration.
    pub fn config(&self) -> &MindMapConfig {
        &self.config
    }

    /// The current projection.
    pub fn view(&self) -> &ViewProjection {
        &self.view
    }

    /// Node awaiting its first rename, if any.
    pub fn rename_target(&self) -> Option<&NodeId> {
        self.rename_target.as_ref()
    }

    /// Whether a save is waiting on its backend.
    pub fn is_save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    /// Pending notices.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Drain pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Collapse or expand a node.
    pub fn toggle_collapse(&mut self, node_id: &NodeId) -> ToggleOutcome {
        let outcome = self.hidden.toggle_collapse(&self.store, node_id);
        if outcome != ToggleOutcome::Unchanged {
            self.recompute_view();
        }
        outcome
    }

    /// Add a placeholder child; the new node becomes the rename target.
    pub fn add_child(&mut self, parent_id: &NodeId) -> Option<NodeId> {
        let id = self.store.add_child(parent_id, &self.config.placement)?;
        self.rename_target = Some(id.clone());
        self.recompute_view();
        Some(id)
    }

    /// Delete a node and its subtree.
    ///
    /// Deleting the root is refused with a warning notice and leaves the
    /// session untouched.
    pub fn delete_subtree(&mut self, node_id: &NodeId) -> Result<DeleteOutcome, SessionError> {
        let outcome = match self.store.delete_subtree(node_id, &mut self.hidden) {
            Ok(outcome) => outcome,
            Err(GraphError::RootDeletion) => {
                tracing::warn!(node = %node_id, "refused to delete the root node");
                self.notices.push(Notice::warning("Cannot delete the root node."));
                return Err(GraphError::RootDeletion.into());
            }
        };

        if self
            .rename_target
            .as_ref()
            .is_some_and(|target| outcome.removed_nodes.contains(target))
        {
            self.rename_target = None;
        }
        if !outcome.is_empty() {
            self.recompute_view();
        }
        Ok(outcome)
    }

    /// Rename a node. Ends a pending inline rename of that node either way.
    pub fn relabel(&mut self, node_id: &NodeId, new_label: &str) -> bool {
        let changed = self.store.relabel(node_id, new_label);
        let ended_rename = self.rename_target.as_ref() == Some(node_id);
        if ended_rename {
            self.rename_target = None;
        }
        if changed || ended_rename {
            self.recompute_view();
        }
        changed
    }

    /// Switch mode. `View` from `Edit` cancels without a layout pass.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), SessionError> {
        match (self.mode, mode) {
            (current, requested) if current == requested => Ok(()),
            (_, Mode::Edit) => {
                self.enter_edit();
                Ok(())
            }
            (_, Mode::View) => self.cancel_edit(),
        }
    }

    /// `view → edit`, unconditionally.
    pub fn enter_edit(&mut self) {
        if self.mode != Mode::Edit {
            self.mode = Mode::Edit;
            tracing::debug!("entered edit mode");
            self.recompute_view();
        }
    }

    /// `edit → view` without saving or re-flowing. Local edits are kept.
    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        if self.mode != Mode::Edit {
            return Err(SessionError::NotEditing);
        }
        if self.save_in_flight {
            return Err(SessionError::SaveInProgress);
        }
        self.mode = Mode::View;
        self.rename_target = None;
        tracing::debug!("cancelled edit mode");
        self.recompute_view();
        Ok(())
    }

    /// Lay out the full node set and refresh the projection.
    pub fn relayout(&mut self) -> Result<LayoutStats, SessionError> {
        let stats = self.layout.apply(&mut self.store)?;
        self.recompute_view();
        Ok(stats)
    }

    /// Payload describing the full model.
    pub fn save_payload(&self) -> SavePayload {
        self.store.to_payload()
    }

    /// Start a save: checks the mode, marks a save in flight and returns the
    /// payload to hand to the backend.
    pub fn begin_save(&mut self) -> Result<SavePayload, SessionError> {
        if self.mode != Mode::Edit {
            return Err(SessionError::NotEditing);
        }
        if self.save_in_flight {
            tracing::warn!("save requested while another save is in flight");
            return Err(SessionError::SaveInProgress);
        }
        self.save_in_flight = true;
        let payload = self.save_payload();
        tracing::info!(
            nodes = payload.nodes.len(),
            edges = payload.edges.len(),
            "save started"
        );
        Ok(payload)
    }

    /// Complete a save with the backend's answer.
    ///
    /// On success the full set is re-laid out and the session returns to
    /// view mode. On failure an error notice is queued and the session stays
    /// in edit mode with every local edit intact.
    ///
    /// If the model changed after `payload` was taken, the backend holds an
    /// older copy: the receipt is still returned, but the session stays in
    /// edit mode without a re-flow and queues an info notice so the newer
    /// edits can be saved.
    pub fn finish_save(
        &mut self,
        payload: &SavePayload,
        result: Result<(), SaveError>,
    ) -> Result<SaveReceipt, SessionError> {
        self.save_in_flight = false;

        if let Err(e) = result {
            tracing::warn!(error = %e, "save failed, staying in edit mode");
            self.notices.push(Notice::error(format!("Error saving mind map: {}", e)));
            return Err(e.into());
        }

        let receipt = SaveReceipt::for_payload(payload);
        if self.save_payload().fingerprint() != receipt.fingerprint {
            tracing::info!(
                fingerprint = %receipt.fingerprint,
                "saved an older snapshot, staying in edit mode"
            );
            self.notices
                .push(Notice::info("Saved. Changes made during the save are not saved yet."));
            self.recompute_view();
            return Ok(receipt);
        }

        if let Err(e) = self.layout.apply(&mut self.store) {
            tracing::warn!(error = %e, "layout after save failed, staying in edit mode");
            self.notices.push(Notice::error(format!("Saved, but layout failed: {}", e)));
            self.recompute_view();
            return Err(e.into());
        }

        self.mode = Mode::View;
        self.rename_target = None;
        self.recompute_view();

        tracing::info!(
            fingerprint = %receipt.fingerprint,
            nodes = receipt.node_count,
            edges = receipt.edge_count,
            "save committed"
        );
        Ok(receipt)
    }

    /// Clear the in-flight flag of a save that was abandoned mid-flight.
    pub(crate) fn abort_save(&mut self) {
        if self.save_in_flight {
            tracing::warn!("save abandoned before the backend answered");
            self.save_in_flight = false;
        }
    }

    /// Rebuild the projection from the current store, visibility and mode.
    pub fn recompute_view(&mut self) {
        let mut view = project(self.store.nodes(), self.store.edges(), &self.hidden, self.mode);
        if let (Mode::Edit, Some(target)) = (self.mode, &self.rename_target) {
            view.mark_editing(target);
        }
        if let Some(session) = &self.binder {
            view.bind(|id| NodeActions::new(id.clone(), session.clone()));
        }
        self.view = view;
    }

    pub(crate) fn set_binder(&mut self, binder: Weak<Mutex<MindMap>>) {
        self.binder = Some(binder);
        self.recompute_view();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> MindMap {
        let seed = SeedNode::branch(
            "root",
            "Root",
            vec![SeedNode::branch("A", "A", vec![SeedNode::leaf("B", "B")])],
        );
        MindMap::new(&seed, MindMapConfig::default()).unwrap()
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_startup_lays_out_and_projects() {
        let map = chain();
        assert_eq!(map.mode(), Mode::View);
        assert_eq!(map.view().nodes.len(), 3);
        // Layout moved B one rank to the right of A.
        let a = map.store().get_node(&id("A")).unwrap().position;
        let b = map.store().get_node(&id("B")).unwrap().position;
        assert_eq!(b.x - a.x, 272.0);
    }

    #[test]
    fn test_toggle_refreshes_view() {
        let mut map = chain();
        map.toggle_collapse(&id("A"));
        assert!(!map.view().is_visible(&id("B")));
        assert!(map.view().node(&id("A")).unwrap().is_collapsed);

        map.toggle_collapse(&id("A"));
        assert!(map.view().is_visible(&id("B")));
    }

    #[test]
    fn test_add_child_marks_rename_target_in_edit_mode() {
        let mut map = chain();
        map.enter_edit();
        let new_id = map.add_child(&id("A")).unwrap();

        assert_eq!(map.rename_target(), Some(&new_id));
        let node = map.view().node(&new_id).unwrap();
        assert!(node.editing);
        assert_eq!(node.node.label, "New Topic");

        map.relabel(&new_id, "");
        assert_eq!(map.rename_target(), None);
        assert_eq!(map.store().get_node(&new_id).unwrap().label, "New Topic");
        assert!(!map.view().node(&new_id).unwrap().editing);
    }

    #[test]
    fn test_delete_root_queues_notice() {
        let mut map = chain();
        let err = map.delete_subtree(&NodeId::root()).unwrap_err();

        assert!(matches!(err, SessionError::Graph(GraphError::RootDeletion)));
        assert_eq!(map.store().num_nodes(), 3);
        let notices = map.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0], Notice::warning("Cannot delete the root node."));
        assert!(map.notices().is_empty());
    }

    #[test]
    fn test_delete_clears_hidden_and_rename_target() {
        let mut map = chain();
        map.enter_edit();
        let new_id = map.add_child(&id("B")).unwrap();
        map.toggle_collapse(&id("A"));
        assert!(map.hidden().contains(&new_id));

        map.delete_subtree(&id("A")).unwrap();

        assert!(map.hidden().is_empty());
        assert_eq!(map.rename_target(), None);
        assert_eq!(map.view().node_ids(), vec![&NodeId::root()]);
    }

    #[test]
    fn test_mode_transitions() {
        let mut map = chain();
        assert!(matches!(map.cancel_edit(), Err(SessionError::NotEditing)));
        assert!(map.set_mode(Mode::View).is_ok());

        map.set_mode(Mode::Edit).unwrap();
        assert_eq!(map.mode(), Mode::Edit);
        assert!(map.view().nodes.iter().all(|n| n.mode == Mode::Edit));

        map.set_mode(Mode::View).unwrap();
        assert_eq!(map.mode(), Mode::View);
    }

    #[test]
    fn test_cancel_keeps_edits_without_layout() {
        let mut map = chain();
        map.enter_edit();
        let new_id = map.add_child(&id("A")).unwrap();
        let placed = map.store().get_node(&new_id).unwrap().position;

        map.cancel_edit().unwrap();

        assert!(map.store().contains(&new_id));
        assert_eq!(map.store().get_node(&new_id).unwrap().position, placed);
    }

    #[test]
    fn test_save_lifecycle() {
        let mut map = chain();
        assert!(matches!(map.begin_save(), Err(SessionError::NotEditing)));

        map.enter_edit();
        let payload = map.begin_save().unwrap();
        assert!(map.is_save_in_flight());
        assert!(matches!(map.begin_save(), Err(SessionError::SaveInProgress)));
        assert!(matches!(map.cancel_edit(), Err(SessionError::SaveInProgress)));

        let receipt = map.finish_save(&payload, Ok(())).unwrap();
        assert_eq!(receipt.node_count, 3);
        assert_eq!(map.mode(), Mode::View);
        assert!(!map.is_save_in_flight());
    }

    #[test]
    fn test_edits_during_save_keep_edit_mode() {
        let mut map = chain();
        map.enter_edit();
        let payload = map.begin_save().unwrap();
        let late = map.add_child(&id("B")).unwrap();
        let placed = map.store().get_node(&late).unwrap().position;

        let receipt = map.finish_save(&payload, Ok(())).unwrap();

        assert_eq!(receipt.node_count, 3);
        assert_eq!(map.mode(), Mode::Edit);
        assert!(!map.is_save_in_flight());
        assert_eq!(map.store().get_node(&late).unwrap().position, placed);
        assert_eq!(map.take_notices()[0].level, crate::session::NoticeLevel::Info);

        // Saving again commits the newer model.
        let payload = map.begin_save().unwrap();
        let receipt = map.finish_save(&payload, Ok(())).unwrap();
        assert_eq!(receipt.node_count, 4);
        assert_eq!(map.mode(), Mode::View);
    }

    #[test]
    fn test_failed_save_stays_in_edit() {
        let mut map = chain();
        map.enter_edit();
        let new_id = map.add_child(&id("root")).unwrap();
        let payload = map.begin_save().unwrap();

        let err = map
            .finish_save(&payload, Err(SaveError::Rejected("offline".to_string())))
            .unwrap_err();

        assert!(matches!(err, SessionError::Save(_)));
        assert_eq!(map.mode(), Mode::Edit);
        assert!(map.store().contains(&new_id));
        assert_eq!(map.take_notices()[0].level, crate::session::NoticeLevel::Error);
    }
}
