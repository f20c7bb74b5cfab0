//! Shared session handle and per-node bound actions.
//!
//! The rendering layer holds a [`MindMapHandle`] and receives
//! [`NodeActions`] on every visible node. Both route into the same
//! `parking_lot::Mutex`, so one callback runs to completion before the next
//! one starts.
//!
//! Actions hold a `Weak` reference: a projection outliving its session turns
//! every action into a no-op instead of keeping the session alive.
//!
//! Do not invoke actions while holding [`MindMapHandle::lock`]; the lock is
//! not reentrant.

use parking_lot::{Mutex, MutexGuard};
use std::fmt;
use std::sync::{Arc, Weak};

use crate::persist::SaveBackend;
use crate::projector::ViewProjection;
use crate::store::DeleteOutcome;
use crate::types::{Mode, NodeId, SaveReceipt};
use crate::visibility::ToggleOutcome;

use super::notice::Notice;
use super::state::MindMap;
use super::SessionError;

/// Cloneable, thread-safe handle to a running session.
#[derive(Debug, Clone)]
pub struct MindMapHandle {
    inner: Arc<Mutex<MindMap>>,
}

impl MindMapHandle {
    /// Share a session and bind per-node actions into its projection.
    pub fn new(map: MindMap) -> Self {
        let inner = Arc::new(Mutex::new(map));
        inner.lock().set_binder(Arc::downgrade(&inner));
        Self { inner }
    }

    /// Lock the session for direct access.
    pub fn lock(&self) -> MutexGuard<'_, MindMap> {
        self.inner.lock()
    }

    /// Snapshot of the current projection.
    pub fn view(&self) -> ViewProjection {
        self.inner.lock().view().clone()
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.inner.lock().mode()
    }

    /// Drain pending notices.
    pub fn take_notices(&self) -> Vec<Notice> {
        self.inner.lock().take_notices()
    }

    /// Collapse or expand a node. Unknown ids are ignored.
    pub fn on_toggle_collapse(&self, node_id: &str) {
        self.inner.lock().toggle_collapse(&NodeId::from(node_id));
    }

    /// Add a placeholder child. Unknown parents are ignored.
    pub fn on_add_node(&self, parent_id: &str) {
        self.inner.lock().add_child(&NodeId::from(parent_id));
    }

    /// Delete a subtree. A root deletion only queues a notice.
    pub fn on_delete_node(&self, node_id: &str) {
        // Refusals surface through the notice queue.
        let _ = self.inner.lock().delete_subtree(&NodeId::from(node_id));
    }

    /// Commit an inline rename. Empty labels are ignored.
    pub fn on_label_change(&self, node_id: &str, new_label: &str) {
        self.inner.lock().relabel(&NodeId::from(node_id), new_label);
    }

    /// Mode control surface; accepts `"view"` or `"edit"`.
    pub fn set_mode(&self, mode: &str) -> Result<(), SessionError> {
        match Mode::from_str(mode) {
            Some(mode) => self.inner.lock().set_mode(mode),
            None => {
                tracing::warn!(mode, "ignoring unknown mode");
                Ok(())
            }
        }
    }

    /// Enter edit mode.
    pub fn enter_edit(&self) {
        self.inner.lock().enter_edit();
    }

    /// Leave edit mode without saving.
    pub fn cancel_edit(&self) -> Result<(), SessionError> {
        self.inner.lock().cancel_edit()
    }

    /// Save through `backend` and, on success, re-flow and return to view.
    ///
    /// The session lock is released while the backend runs, so callbacks
    /// keep working during the save. A second save started meanwhile fails
    /// with [`SessionError::SaveInProgress`]. Edits that land during the
    /// save are not part of it; the session then stays in edit mode (see
    /// [`MindMap::finish_save`]).
    pub async fn save<B>(&self, backend: &B) -> Result<SaveReceipt, SessionError>
    where
        B: SaveBackend + ?Sized,
    {
        let payload = self.inner.lock().begin_save()?;

        let mut guard = InFlight {
            session: &self.inner,
            armed: true,
        };
        let result = backend.save(&payload).await;
        guard.armed = false;

        self.inner.lock().finish_save(&payload, result)
    }
}

/// Clears the in-flight flag if a save future is dropped mid-await.
struct InFlight<'a> {
    session: &'a Mutex<MindMap>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.session.lock().abort_save();
        }
    }
}

/// Mutation callbacks bound to one visible node.
#[derive(Clone)]
pub struct NodeActions {
    node_id: NodeId,
    session: Weak<Mutex<MindMap>>,
}

impl NodeActions {
    pub(crate) fn new(node_id: NodeId, session: Weak<Mutex<MindMap>>) -> Self {
        Self { node_id, session }
    }

    /// The node these actions target.
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Whether the owning session is still alive.
    pub fn is_live(&self) -> bool {
        self.session.strong_count() > 0
    }

    fn with_session<T>(&self, default: T, f: impl FnOnce(&mut MindMap) -> T) -> T {
        match self.session.upgrade() {
            Some(session) => f(&mut session.lock()),
            None => {
                tracing::debug!(node = %self.node_id, "session gone, action ignored");
                default
            }
        }
    }

    /// Collapse or expand this node.
    pub fn toggle_collapse(&self) -> ToggleOutcome {
        self.with_session(ToggleOutcome::Unchanged, |map| {
            map.toggle_collapse(&self.node_id)
        })
    }

    /// Add a placeholder child under this node.
    pub fn add_child(&self) -> Option<NodeId> {
        self.with_session(None, |map| map.add_child(&self.node_id))
    }

    /// Delete this node and its subtree.
    pub fn delete(&self) -> Result<DeleteOutcome, SessionError> {
        self.with_session(Ok(DeleteOutcome::default()), |map| {
            map.delete_subtree(&self.node_id)
        })
    }

    /// Rename this node.
    pub fn relabel(&self, new_label: &str) -> bool {
        self.with_session(false, |map| map.relabel(&self.node_id, new_label))
    }
}

impl fmt::Debug for NodeActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeActions")
            .field("node_id", &self.node_id)
            .field("live", &self.is_live())
            .finish()
    }
}

impl PartialEq for NodeActions {
    fn eq(&self, other: &Self) -> bool {
        self.node_id == other.node_id && Weak::ptr_eq(&self.session, &other.session)
    }
}
